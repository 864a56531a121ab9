//! Account model representing the connected wallet address

use serde::{Deserialize, Serialize};

use super::Mail;

/// The wallet address the mailbox belongs to.
///
/// Addresses are hex strings whose case carries no meaning, so every
/// comparison is case-insensitive.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub address: String,
}

impl Account {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
        }
    }

    pub fn is_connected(&self) -> bool {
        !self.address.is_empty()
    }

    /// Whether `owner` is this account
    pub fn is_me(&self, owner: &str) -> bool {
        owner.eq_ignore_ascii_case(&self.address)
    }

    /// The other party of a mail: the recipient if we sent it, else the sender
    pub fn counterparty<'a>(&self, mail: &'a Mail) -> &'a str {
        if self.is_me(&mail.from) {
            &mail.to
        } else {
            &mail.from
        }
    }

    /// Compact form for headers, e.g. `0x12...cdef`
    pub fn short(&self) -> String {
        self.abbreviate(4)
    }

    /// Longer form for account details, keeping ten characters on each end
    pub fn medium(&self) -> String {
        self.abbreviate(10)
    }

    fn abbreviate(&self, keep: usize) -> String {
        if !self.is_connected() {
            return "Not connected".to_string();
        }
        let chars: Vec<char> = self.address.chars().collect();
        if chars.len() <= keep * 2 {
            return self.address.clone();
        }
        let head: String = chars[..keep].iter().collect();
        let tail: String = chars[chars.len() - keep..].iter().collect();
        format!("{}...{}", head, tail)
    }
}
