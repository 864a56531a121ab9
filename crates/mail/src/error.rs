//! Error types for backend calls
//!
//! Every backend capability returns a typed [`MailError`]. The sync loops
//! store the last error in the view state, so errors are cheap to clone.

use thiserror::Error;

pub type MailResult<T> = Result<T, MailError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    /// The backend could not be reached (network or chain call failure)
    #[error("Backend unavailable: {message}")]
    Unavailable { message: String },

    #[error("Not found: {message}")]
    NotFound { message: String },

    /// The backend refused a mutation
    #[error("Rejected: {message}")]
    Rejected { message: String },

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },
}

impl MailError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        Self::Rejected {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
        }
    }

    /// Whether the next scheduled tick may succeed where this call failed
    pub fn is_retryable(&self) -> bool {
        matches!(self, MailError::Unavailable { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        let err = MailError::unavailable("rpc timeout");
        assert_eq!(err.to_string(), "Backend unavailable: rpc timeout");
    }

    #[test]
    fn test_retryable() {
        assert!(MailError::unavailable("x").is_retryable());
        assert!(!MailError::rejected("x").is_retryable());
        assert!(!MailError::not_found("x").is_retryable());
        assert!(!MailError::invalid_input("x").is_retryable());
    }
}
