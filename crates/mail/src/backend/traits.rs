//! Backend trait definitions

use async_trait::async_trait;

use crate::error::MailResult;
use crate::models::{EncryptedBody, Folder, Mail, MailId, ThreadId};

/// A mail about to be sent; the body is already encrypted by the caller
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub body: EncryptedBody,
}

impl OutgoingMail {
    pub fn new(to: impl Into<String>, body: EncryptedBody) -> Self {
        Self {
            to: to.into(),
            body,
        }
    }
}

/// Per-account remote mail store.
///
/// Folder getters return the whole folder; order is the backend's to define.
/// Mutations are eventually reflected by the next fetch of the affected
/// folders.
#[async_trait]
pub trait MailBackend: Send + Sync {
    async fn get_inbox(&self) -> MailResult<Vec<Mail>>;

    async fn get_sent(&self) -> MailResult<Vec<Mail>>;

    async fn get_read(&self) -> MailResult<Vec<Mail>>;

    async fn get_spam(&self) -> MailResult<Vec<Mail>>;

    async fn get_starred(&self) -> MailResult<Vec<Mail>>;

    async fn get_archive(&self) -> MailResult<Vec<Mail>>;

    async fn get_trash(&self) -> MailResult<Vec<Mail>>;

    /// Fetch a conversation.
    ///
    /// `known` is the last snapshot the caller holds and `is_first_call`
    /// tells a full fetch apart from an incremental one. An empty result
    /// means the thread is gone or inaccessible.
    async fn get_thread(
        &self,
        thread_id: &ThreadId,
        known: &[Mail],
        is_first_call: bool,
    ) -> MailResult<Vec<Mail>>;

    /// Send a new mail, starting a new thread
    async fn send_mail(&self, mail: OutgoingMail) -> MailResult<MailId>;

    /// Reply within the thread of `parent`
    async fn reply(&self, parent: MailId, mail: OutgoingMail) -> MailResult<MailId>;

    /// Forward `original` to a new recipient
    async fn forward(&self, original: MailId, mail: OutgoingMail) -> MailResult<MailId>;

    /// Reclassify mails into `target`
    async fn move_mails(&self, ids: &[MailId], target: Folder) -> MailResult<()>;
}
