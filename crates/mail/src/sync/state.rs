//! View state shared by the sync loops and UI collaborators

use std::collections::BTreeSet;

use crate::error::MailError;
use crate::models::{Folder, Mail, MailId, Tab};

/// Everything the mailbox view displays.
///
/// Owned by the manager. Each loop writes only its own slice: the refresh
/// loop owns `mails`, the search loop owns `filtered_mails`, the thread loop
/// owns `thread_mails`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub active_tab: Tab,

    /// Contents of the active folder
    pub mails: Vec<Mail>,
    /// Bumped every time `mails` is replaced
    pub mails_version: u64,

    pub search_text: String,
    /// Search results; only meaningful while `searching`
    pub filtered_mails: Vec<Mail>,
    pub searching: bool,

    pub selected_ids: BTreeSet<MailId>,
    pub selecting: bool,

    pub active_mail: Option<Mail>,
    /// Latest snapshot of the open thread
    pub thread_mails: Vec<Mail>,
    /// Bumped every time `thread_mails` is replaced
    pub thread_version: u64,

    pub composing: bool,
    pub replying: bool,
    pub forwarding: bool,
    /// Target folder of a pending bulk move
    pub bulk_action: Option<Folder>,

    /// Folder fetch for a new activation in progress
    pub refreshing: bool,
    /// Search debounce or fetch in progress
    pub search_pending: bool,

    pub refresh_error: Option<MailError>,
    pub search_error: Option<MailError>,
    pub thread_error: Option<MailError>,
}

impl ViewState {
    pub fn new(active_tab: Tab) -> Self {
        Self {
            active_tab,
            ..Default::default()
        }
    }

    pub fn loading(&self) -> bool {
        self.refreshing || self.search_pending
    }

    /// The list the mailbox should render right now
    pub fn visible_mails(&self) -> &[Mail] {
        if self.searching {
            &self.filtered_mails
        } else {
            &self.mails
        }
    }

    /// Ids of the active folder's mails
    pub fn mail_ids(&self) -> Vec<MailId> {
        self.mails.iter().map(|m| m.id).collect()
    }

    pub fn is_selected(&self, id: MailId) -> bool {
        self.selected_ids.contains(&id)
    }

    /// Replace the folder contents unless they are equal. Returns whether
    /// anything changed.
    pub(crate) fn replace_mails(&mut self, mails: Vec<Mail>) -> bool {
        if self.mails == mails {
            return false;
        }
        self.mails = mails;
        self.mails_version += 1;
        true
    }

    /// Replace the thread snapshot unless it is equal
    pub(crate) fn replace_thread(&mut self, mails: Vec<Mail>) -> bool {
        if self.thread_mails == mails {
            return false;
        }
        self.thread_mails = mails;
        self.thread_version += 1;
        true
    }

    /// Clear everything derived from the previous folder
    pub(crate) fn reset_for_folder_switch(&mut self) {
        self.selecting = false;
        self.active_mail = None;
        self.replying = false;
        self.forwarding = false;
        self.selected_ids.clear();
        self.thread_mails.clear();
        self.thread_error = None;
    }
}
