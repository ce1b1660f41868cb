//! Transactions coupled with a context.
//!
//! A [`TxnContext`] owns one client transaction and the [`Context`] every call
//! on it uses. It is meant for one owner calling it sequentially; `&mut self`
//! on every delegating method enforces that.
//!
//! # Usage
//!
//! ```ignore
//! use graphkit::{new_txn, MutateOptions};
//!
//! let mut tx = new_txn(&client);
//! let mut user = User::new("Alice", "alice@example.com");
//! tx.create(&mut user, &MutateOptions::default())?;
//! tx.commit()?;
//! ```

mod factory;

use log::debug;

use crate::client::Txn;
use crate::context::Context;
use crate::error::Result;
use crate::mutation::{self, MutateOptions};
use crate::query::{Deleter, Query};
use crate::schema::Node;

pub use factory::{new_read_only_txn, new_read_only_txn_context, new_txn, new_txn_context};

/// A client transaction bound to a context.
pub struct TxnContext<T: Txn> {
    txn: T,
    ctx: Context,
}

impl<T: Txn> TxnContext<T> {
    /// Wrap an already-open transaction.
    pub fn from_parts(txn: T, ctx: Context) -> Self {
        Self { txn, ctx }
    }

    /// Commit the transaction with the bound context.
    pub fn commit(&mut self) -> Result<()> {
        debug!("committing transaction");
        Ok(self.txn.commit(&self.ctx)?)
    }

    /// Discard the transaction with the bound context.
    pub fn discard(&mut self) -> Result<()> {
        debug!("discarding transaction");
        Ok(self.txn.discard(&self.ctx)?)
    }

    /// The underlying client transaction.
    pub fn txn(&self) -> &T {
        &self.txn
    }

    /// Mutable access to the underlying client transaction.
    pub fn txn_mut(&mut self) -> &mut T {
        &mut self.txn
    }

    /// Replace the bound context; later calls use it.
    pub fn with_context(&mut self, ctx: Context) {
        self.ctx = ctx;
    }

    /// The bound context.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Split into the transaction and its context.
    pub fn into_parts(self) -> (T, Context) {
        (self.txn, self.ctx)
    }

    /// Set a node, injecting its type, and write back its assigned UID.
    pub fn mutate<N: Node>(&mut self, node: &mut N, opts: &MutateOptions) -> Result<()> {
        self.mutate_many(std::slice::from_mut(node), opts)
    }

    /// Set several nodes of one type in a single mutation.
    pub fn mutate_many<N: Node>(&mut self, nodes: &mut [N], opts: &MutateOptions) -> Result<()> {
        mutation::mutate(&self.ctx, &mut self.txn, nodes, opts)
    }

    /// Create a node after checking its unique fields.
    pub fn create<N: Node>(&mut self, node: &mut N, opts: &MutateOptions) -> Result<()> {
        self.create_many(std::slice::from_mut(node), opts)
    }

    /// Create several nodes after checking their unique fields.
    pub fn create_many<N: Node>(&mut self, nodes: &mut [N], opts: &MutateOptions) -> Result<()> {
        mutation::mutate_with_constraints(&self.ctx, &mut self.txn, nodes, false, opts)
    }

    /// Update a node by UID after checking its unique fields.
    pub fn update<N: Node>(&mut self, node: &mut N, opts: &MutateOptions) -> Result<()> {
        self.update_many(std::slice::from_mut(node), opts)
    }

    /// Update several nodes by UID after checking their unique fields.
    pub fn update_many<N: Node>(&mut self, nodes: &mut [N], opts: &MutateOptions) -> Result<()> {
        mutation::mutate_with_constraints(&self.ctx, &mut self.txn, nodes, true, opts)
    }

    /// Prepare a delete of `N` nodes selected by a query.
    pub fn delete<N: Node>(&mut self, opts: MutateOptions) -> Deleter<'_, T, N> {
        Deleter::new(self.ctx.clone(), &mut self.txn, opts)
    }

    /// Prepare a read of `N` nodes.
    pub fn get<N: Node>(&mut self) -> Query<'_, T, N> {
        Query::new(self.ctx.clone(), &mut self.txn)
    }
}
