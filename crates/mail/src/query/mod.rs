//! Query API for UI consumption
//!
//! Turns view state into render-ready rows.

mod rows;

pub use rows::{ENCRYPTED_PLACEHOLDER, ListContent, MailRow, list_content};
