//! Client error types.

use thiserror::Error;

use crate::context::ContextError;

/// Result type for client calls.
pub type ClientResult<T> = Result<T, ClientError>;

/// Errors a client surfaces for a transaction call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ClientError {
    /// Conflict with a concurrent transaction; the whole transaction must be retried.
    #[error("transaction has been aborted, please retry")]
    Aborted,

    /// Transaction was already committed or discarded.
    #[error("transaction has already been committed or discarded")]
    Finished,

    /// Write attempted on a read-only transaction.
    #[error("readonly transaction cannot run mutations or be committed")]
    ReadOnly,

    /// The bound context was cancelled or expired.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Anything else reported by the driver or the server.
    #[error("client error: {0}")]
    Other(String),
}

impl ClientError {
    /// Check if the transaction can be retried from scratch.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClientError::Aborted)
    }

    /// Create a driver error from any message.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}
