//! Context error types.

use thiserror::Error;

/// Why a context is done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ContextError {
    /// Cancelled through its [`CancelHandle`](super::CancelHandle).
    #[error("context canceled")]
    Canceled,

    /// The deadline passed.
    #[error("context deadline exceeded")]
    DeadlineExceeded,
}
