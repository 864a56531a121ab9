//! Mail crate - synchronization core for the Zmail encrypted mailbox
//!
//! This crate provides:
//! - Domain models (Mail, Folder, Tab, Account)
//! - The backend contract for the encrypted mail store, plus an in-memory backend
//! - A folder dispatch table mapping tabs to fetch capabilities
//! - The sync manager: periodic refresh, debounced search, thread following
//! - Query helpers turning view state into render-ready rows
//!
//! Encryption, wallet connection and rendering live outside this crate.

pub mod backend;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod models;
pub mod query;
pub mod sync;

pub use backend::{InMemoryBackend, MailBackend, OutgoingMail};
pub use config::SyncConfig;
pub use dispatch::{Fetcher, FolderDispatch, capability, capability_for_index};
pub use error::{MailError, MailResult};
pub use models::{Account, EncryptedBody, Folder, Mail, MailBuilder, MailId, Tab, ThreadId};
pub use query::{ENCRYPTED_PLACEHOLDER, ListContent, MailRow, list_content};
pub use sync::{MailSyncManager, SyncTiming, ViewState, filter_by_counterparty};
