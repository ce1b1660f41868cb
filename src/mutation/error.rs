//! Constraint error types.

use thiserror::Error;

/// A unique field value that already exists.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{node_type} with {field} = {value} already exists{}", existing_display(.uid))]
pub struct UniqueError {
    /// Node type being written.
    pub node_type: String,
    /// Unique predicate.
    pub field: String,
    /// Offending value, rendered as JSON.
    pub value: String,
    /// UID of the node already holding the value; `None` when the clash is
    /// inside the batch being written.
    pub uid: Option<String>,
}

fn existing_display(uid: &Option<String>) -> String {
    match uid {
        Some(uid) => format!(" (uid {})", uid),
        None => " in this batch".to_string(),
    }
}
