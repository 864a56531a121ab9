//! Folder dispatch table
//!
//! Maps a [`Tab`] to the backend capability that fetches its folder. The
//! mapping is an exhaustive `match`, so a selector without a fetcher does
//! not compile. Raw indexes from outside the closed set resolve to a
//! fetcher that yields nothing.

use futures::future::BoxFuture;
use std::sync::Arc;

use crate::backend::MailBackend;
use crate::error::MailResult;
use crate::models::{Mail, Tab};

/// A folder fetch capability
pub type Fetcher = for<'a> fn(&'a dyn MailBackend) -> BoxFuture<'a, MailResult<Vec<Mail>>>;

fn fetch_inbox(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_inbox()
}

fn fetch_sent(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_sent()
}

fn fetch_read(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_read()
}

fn fetch_spam(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_spam()
}

fn fetch_starred(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_starred()
}

fn fetch_archive(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_archive()
}

fn fetch_trash(backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    backend.get_trash()
}

fn fetch_nothing(_backend: &dyn MailBackend) -> BoxFuture<'_, MailResult<Vec<Mail>>> {
    Box::pin(async { Ok(Vec::new()) })
}

/// Fetcher for a tab
pub fn capability(tab: Tab) -> Fetcher {
    match tab {
        Tab::Inbox => fetch_inbox,
        Tab::Starred => fetch_starred,
        Tab::Sent => fetch_sent,
        Tab::Read => fetch_read,
        Tab::Spam => fetch_spam,
        Tab::Archive => fetch_archive,
        Tab::Trash => fetch_trash,
    }
}

/// Fetcher for a raw tab index; unknown indexes yield an empty folder
pub fn capability_for_index(index: u32) -> Fetcher {
    Tab::from_index(index).map_or(fetch_nothing as Fetcher, capability)
}

/// Dispatch table bound to one backend
#[derive(Clone)]
pub struct FolderDispatch {
    backend: Arc<dyn MailBackend>,
}

impl FolderDispatch {
    pub fn new(backend: Arc<dyn MailBackend>) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &Arc<dyn MailBackend> {
        &self.backend
    }

    /// Fetch the current contents of a tab's folder
    pub async fn fetch(&self, tab: Tab) -> MailResult<Vec<Mail>> {
        capability(tab)(self.backend.as_ref()).await
    }

    /// Fetch by raw tab index
    pub async fn fetch_index(&self, index: u32) -> MailResult<Vec<Mail>> {
        capability_for_index(index)(self.backend.as_ref()).await
    }
}
