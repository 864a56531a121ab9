//! Mail model: one immutable snapshot of an encrypted message

use super::{Folder, ThreadId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a mail, stable across refreshes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MailId(pub u64);

impl MailId {
    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn get(&self) -> u64 {
        self.0
    }
}

impl From<u64> for MailId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl fmt::Display for MailId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ciphertext of a mail body.
///
/// The manager never looks inside; decryption is left to the key holder.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedBody(pub Vec<u8>);

impl EncryptedBody {
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(bytes.into())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Ciphertext is noise in logs
impl fmt::Debug for EncryptedBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EncryptedBody({} bytes)", self.0.len())
    }
}

/// A single mail as returned by the backend.
///
/// Equality is structural, which is what change suppression relies on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    pub id: MailId,
    /// Sender address
    pub from: String,
    /// Recipient address
    pub to: String,
    /// Conversation this mail belongs to; `None` or empty for standalone mail
    pub thread_id: Option<ThreadId>,
    /// Folder classification assigned by the backend
    pub folder: Folder,
    /// Display timestamp
    pub sent_at: DateTime<Utc>,
    pub body: EncryptedBody,
}

impl Mail {
    /// Create a new mail builder
    pub fn builder(id: impl Into<MailId>) -> MailBuilder {
        MailBuilder::new(id.into())
    }

    /// Thread identifier, only if it is present and non-empty
    pub fn thread(&self) -> Option<&ThreadId> {
        self.thread_id.as_ref().filter(|t| !t.is_empty())
    }
}

/// Builder for creating Mail instances
pub struct MailBuilder {
    id: MailId,
    from: String,
    to: String,
    thread_id: Option<ThreadId>,
    folder: Folder,
    sent_at: Option<DateTime<Utc>>,
    body: EncryptedBody,
}

impl MailBuilder {
    fn new(id: MailId) -> Self {
        Self {
            id,
            from: String::new(),
            to: String::new(),
            thread_id: None,
            folder: Folder::Inbox,
            sent_at: None,
            body: EncryptedBody::default(),
        }
    }

    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = from.into();
        self
    }

    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = to.into();
        self
    }

    pub fn thread_id(mut self, thread_id: impl Into<ThreadId>) -> Self {
        self.thread_id = Some(thread_id.into());
        self
    }

    pub fn folder(mut self, folder: Folder) -> Self {
        self.folder = folder;
        self
    }

    pub fn sent_at(mut self, sent_at: DateTime<Utc>) -> Self {
        self.sent_at = Some(sent_at);
        self
    }

    pub fn body(mut self, body: EncryptedBody) -> Self {
        self.body = body;
        self
    }

    pub fn build(self) -> Mail {
        Mail {
            id: self.id,
            from: self.from,
            to: self.to,
            thread_id: self.thread_id,
            folder: self.folder,
            sent_at: self.sent_at.unwrap_or_else(Utc::now),
            body: self.body,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thread_ignores_empty_id() {
        let mail = Mail::builder(1).thread_id("").build();
        assert!(mail.thread().is_none());

        let mail = Mail::builder(2).thread_id("t-9").build();
        assert_eq!(mail.thread().map(|t| t.as_str()), Some("t-9"));

        let mail = Mail::builder(3).build();
        assert!(mail.thread().is_none());
    }

    #[test]
    fn test_equality_is_structural() {
        let at = Utc::now();
        let a = Mail::builder(1).from("0xa").to("0xb").sent_at(at).build();
        let b = Mail::builder(1).from("0xa").to("0xb").sent_at(at).build();
        assert_eq!(a, b);

        let c = Mail::builder(1)
            .from("0xa")
            .to("0xb")
            .sent_at(at)
            .folder(Folder::Read)
            .build();
        assert_ne!(a, c);
    }

    #[test]
    fn test_body_debug_hides_ciphertext() {
        let body = EncryptedBody::new(vec![0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(format!("{:?}", body), "EncryptedBody(4 bytes)");
    }
}
