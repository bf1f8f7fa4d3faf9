//! Error taxonomy shared by every ledger operation.

use crate::domain::commands::ValidationError;

/// Failure of a ledger operation. None of these are fatal: the affected
/// cache keeps its last-known-good contents.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    /// A required field was missing; the remote store was never contacted
    #[error("Please fill all required fields: {0}")]
    Validation(#[from] ValidationError),

    /// The remote store answered with a non-success status
    #[error("{operation} failed with status {status}: {message}")]
    Request {
        operation: String,
        status: u16,
        message: String,
    },

    /// The call could not complete (unreachable, timed out, unreadable body)
    #[error("{operation} could not reach the remote store: {message}")]
    Transport { operation: String, message: String },
}

impl LedgerError {
    pub fn request(operation: impl Into<String>, status: u16, message: impl Into<String>) -> Self {
        Self::Request {
            operation: operation.into(),
            status,
            message: message.into(),
        }
    }

    pub fn transport(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            operation: operation.into(),
            message: message.into(),
        }
    }

    /// Remote failures can be re-submitted by the user; validation failures
    /// need the form fixed first.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, Self::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
