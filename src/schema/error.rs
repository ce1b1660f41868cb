//! Schema error types.

use thiserror::Error;

/// Errors found while validating a node schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    #[error("node type name is empty")]
    EmptyTypeName,

    #[error("invalid character '{char}' at position {position} in type name {name}")]
    InvalidTypeName {
        name: String,
        char: char,
        position: usize,
    },

    #[error("invalid predicate name: {0:?}")]
    InvalidPredicate(String),

    #[error("predicate {0} is managed by the database and cannot be declared")]
    ReservedPredicate(String),

    #[error("duplicate predicate: {0}")]
    DuplicatePredicate(String),
}
