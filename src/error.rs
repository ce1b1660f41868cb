//! Crate-level error type.

use thiserror::Error;

use crate::client::ClientError;
use crate::mutation::UniqueError;
use crate::schema::SchemaError;

/// Result type for transaction helpers.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by transaction helpers.
///
/// Client errors pass through untouched so callers can match on what the
/// driver reported.
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Unique(#[from] UniqueError),

    #[error("node not found")]
    NodeNotFound,

    #[error("{node_type} node has no uid, update requires one")]
    MissingUid { node_type: String },

    #[error("invalid data: {0}")]
    InvalidData(String),
}

impl Error {
    /// Check if the whole transaction can be retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::Client(e) if e.is_retryable())
    }

    /// The client error, when this error came from the client.
    pub fn as_client(&self) -> Option<&ClientError> {
        match self {
            Error::Client(e) => Some(e),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextError;

    #[test]
    fn test_client_errors_pass_through() {
        let err = Error::from(ClientError::Aborted);
        assert!(err.is_retryable());
        assert_eq!(err.to_string(), ClientError::Aborted.to_string());
        assert_eq!(err.as_client(), Some(&ClientError::Aborted));

        let err = Error::from(ClientError::Context(ContextError::DeadlineExceeded));
        assert!(!err.is_retryable());
        assert_eq!(err.to_string(), "context deadline exceeded");
    }

    #[test]
    fn test_not_found_has_no_client_error() {
        assert!(Error::NodeNotFound.as_client().is_none());
        assert!(!Error::NodeNotFound.is_retryable());
    }
}
