//! The graph database client seam.
//!
//! This crate never talks to a database itself. Everything goes through the
//! [`Client`] and [`Txn`] traits, which a concrete driver implements. Every
//! transaction call receives the [`Context`] the caller bound, and the driver
//! is expected to honour its deadline and cancellation.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────┐        ┌──────────────────────────┐
//! │        TxnContext        │ ─────> │  Txn (driver-provided)   │
//! │ query / mutate / commit  │        │  network, isolation, ... │
//! └──────────────────────────┘        └──────────────────────────┘
//!                                                   ▲
//!                                     ┌─────────────┴────────────┐
//!                                     │  Client::new_txn / ro    │
//!                                     └──────────────────────────┘
//! ```

mod error;
mod recording;
mod types;

use std::collections::HashMap;

use crate::context::Context;

pub use error::{ClientError, ClientResult};
pub use recording::{Operation, RecordedCall, RecordingClient, RecordingTxn};
pub use types::{Mutation, Response};

/// A database client able to open transactions.
pub trait Client {
    /// Transaction handle produced by this client.
    type Txn: Txn;

    /// Open a read-write transaction.
    fn new_txn(&self) -> Self::Txn;

    /// Open a read-only transaction.
    fn new_read_only_txn(&self) -> Self::Txn;
}

impl<C: Client + ?Sized> Client for &C {
    type Txn = C::Txn;

    fn new_txn(&self) -> Self::Txn {
        (**self).new_txn()
    }

    fn new_read_only_txn(&self) -> Self::Txn {
        (**self).new_read_only_txn()
    }
}

/// A single database transaction.
///
/// Implementations decide what happens on misuse (committing twice,
/// mutating a read-only transaction); this crate forwards their errors
/// unmodified.
pub trait Txn {
    /// Run a query with named variables (`$name` → value).
    fn query_with_vars(
        &mut self,
        ctx: &Context,
        query: &str,
        vars: &HashMap<String, String>,
    ) -> ClientResult<Response>;

    /// Run a query without variables.
    fn query(&mut self, ctx: &Context, query: &str) -> ClientResult<Response> {
        self.query_with_vars(ctx, query, &HashMap::new())
    }

    /// Apply a mutation. The response maps blank node names to assigned UIDs.
    fn mutate(&mut self, ctx: &Context, mutation: &Mutation) -> ClientResult<Response>;

    /// Commit the transaction.
    fn commit(&mut self, ctx: &Context) -> ClientResult<()>;

    /// Discard the transaction.
    fn discard(&mut self, ctx: &Context) -> ClientResult<()>;
}
