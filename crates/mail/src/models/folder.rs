//! Folder classification and the tab selector used to pick a folder

use serde::{Deserialize, Serialize};
use std::fmt;

/// The mailbox partition a mail is classified into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Folder {
    Inbox,
    Sent,
    Read,
    Starred,
    Spam,
    Archive,
    Trash,
}

impl Folder {
    pub const ALL: [Folder; 7] = [
        Folder::Inbox,
        Folder::Sent,
        Folder::Read,
        Folder::Starred,
        Folder::Spam,
        Folder::Archive,
        Folder::Trash,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Folder::Inbox => "inbox",
            Folder::Sent => "sent",
            Folder::Read => "read",
            Folder::Starred => "starred",
            Folder::Spam => "spam",
            Folder::Archive => "archive",
            Folder::Trash => "trash",
        }
    }

    /// Human readable name for headers and logs
    pub fn label(&self) -> &'static str {
        match self {
            Folder::Inbox => "Inbox",
            Folder::Sent => "Sent",
            Folder::Read => "Read",
            Folder::Starred => "Starred",
            Folder::Spam => "Spam",
            Folder::Archive => "Archive",
            Folder::Trash => "Trash",
        }
    }

    /// Parse a folder from its lowercase name
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|f| f.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for Folder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Folder selector shown as a tab.
///
/// Discriminants are the stable tab indexes UI collaborators pass around.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tab {
    #[default]
    Inbox = 0,
    Starred = 1,
    Sent = 2,
    Read = 3,
    Spam = 4,
    Archive = 5,
    Trash = 6,
}

impl Tab {
    pub const ALL: [Tab; 7] = [
        Tab::Inbox,
        Tab::Starred,
        Tab::Sent,
        Tab::Read,
        Tab::Spam,
        Tab::Archive,
        Tab::Trash,
    ];

    pub fn index(&self) -> u32 {
        *self as u32
    }

    /// Resolve a raw tab index; `None` for indexes outside the set
    pub fn from_index(index: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.index() == index)
    }

    /// The folder whose contents this tab displays
    pub fn folder(&self) -> Folder {
        match self {
            Tab::Inbox => Folder::Inbox,
            Tab::Starred => Folder::Starred,
            Tab::Sent => Folder::Sent,
            Tab::Read => Folder::Read,
            Tab::Spam => Folder::Spam,
            Tab::Archive => Folder::Archive,
            Tab::Trash => Folder::Trash,
        }
    }

    /// Parse a tab by folder name or numeric index
    pub fn parse(s: &str) -> Option<Self> {
        if let Ok(index) = s.trim().parse::<u32>() {
            return Self::from_index(index);
        }
        Folder::parse(s).map(Tab::from)
    }
}

impl From<Folder> for Tab {
    fn from(folder: Folder) -> Self {
        match folder {
            Folder::Inbox => Tab::Inbox,
            Folder::Starred => Tab::Starred,
            Folder::Sent => Tab::Sent,
            Folder::Read => Tab::Read,
            Folder::Spam => Tab::Spam,
            Folder::Archive => Tab::Archive,
            Folder::Trash => Tab::Trash,
        }
    }
}

impl fmt::Display for Tab {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.folder().label())
    }
}
