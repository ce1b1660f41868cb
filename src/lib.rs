//! graphkit - typed transactions over a graph database client
//!
//! This crate couples a graph database transaction with a cancellation /
//! deadline [`Context`] and adds schema-driven helpers that turn Rust values
//! into mutations and queries. The database itself is reached through the
//! [`Client`] and [`Txn`] traits, which a driver implements.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use graphkit::{new_txn_context, Context, MutateOptions};
//!
//! let ctx = Context::background().with_timeout(Duration::from_secs(5));
//! let mut tx = new_txn_context(ctx, &client);
//!
//! let mut user = User::new("Alice", "alice@example.com");
//! tx.create(&mut user, &MutateOptions::default())?;
//! assert!(user.uid.is_some());
//!
//! let same: User = tx.get::<User>().uid(user.uid.as_deref().unwrap()).node()?;
//! tx.commit()?;
//! ```

pub mod client;
pub mod context;
pub mod error;
pub mod mutation;
pub mod query;
pub mod schema;
pub mod txn;

#[cfg(test)]
mod test_support;

pub use client::{Client, ClientError, Mutation, Response, Txn};
pub use context::{CancelHandle, Context, ContextError};
pub use error::{Error, Result};
pub use mutation::{MutateOptions, UniqueError};
pub use query::{Deleter, Order, Query};
pub use schema::{FieldSchema, Node, NodeSchema, SchemaError};
pub use txn::{
    new_read_only_txn, new_read_only_txn_context, new_txn, new_txn_context, TxnContext,
};
