//! Domain models for mailbox entities

mod account;
mod folder;
mod mail;
mod thread;

pub use account::Account;
pub use folder::{Folder, Tab};
pub use mail::{EncryptedBody, Mail, MailBuilder, MailId};
pub use thread::ThreadId;
