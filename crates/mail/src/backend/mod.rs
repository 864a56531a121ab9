//! Backend contract for the encrypted mail store
//!
//! The manager only depends on [`MailBackend`]. [`InMemoryBackend`] is a
//! complete in-process implementation used by the driver binary and tests.

mod memory;
mod traits;

pub use memory::InMemoryBackend;
pub use traits::{MailBackend, OutgoingMail};
