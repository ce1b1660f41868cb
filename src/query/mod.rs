//! Read and delete-by-query helpers.
//!
//! [`Query`] and [`Deleter`] borrow the transaction of the `TxnContext` that
//! created them and carry a clone of its context, so they cannot outlive it.
//!
//! # Usage
//!
//! ```ignore
//! let users: Vec<User> = tx
//!     .get::<User>()
//!     .filter("has(email)")
//!     .order_asc("name")
//!     .first(10)
//!     .nodes()?;
//!
//! let deleted = tx
//!     .delete::<User>(MutateOptions::new().commit_now(true))
//!     .filter("eq(name, \"Alice\")")
//!     .nodes()?;
//! ```

mod delete;
mod dql;

use std::collections::HashMap;
use std::marker::PhantomData;

use log::trace;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

use crate::client::Txn;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::schema::Node;

pub use delete::Deleter;
pub use dql::Order;

use dql::{QueryBlock, Selection, COUNT_BLOCK};

/// A read of `N` nodes bound to one transaction and context.
pub struct Query<'a, T: Txn + ?Sized, N: Node> {
    ctx: Context,
    txn: &'a mut T,
    block: QueryBlock,
    _node: PhantomData<fn() -> N>,
}

impl<'a, T: Txn + ?Sized, N: Node> Query<'a, T, N> {
    pub(crate) fn new(ctx: Context, txn: &'a mut T) -> Self {
        Self {
            ctx,
            txn,
            block: QueryBlock::new(N::schema().type_name),
            _node: PhantomData,
        }
    }

    /// Context the query runs with.
    pub fn context(&self) -> &Context {
        &self.ctx
    }

    /// Transaction the query runs in.
    pub fn txn(&self) -> &T {
        &*self.txn
    }

    /// Name of the result block (default `data`).
    pub fn name(mut self, name: &str) -> Self {
        self.block.name = name.to_string();
        self
    }

    /// Root the read at `uid(...)`.
    ///
    /// The text is inserted as given, so a comma-separated list such as
    /// `"0x1, 0x2"` selects several nodes.
    pub fn uid(mut self, uid: &str) -> Self {
        self.block.uid = Some(uid.to_string());
        self
    }

    /// DQL filter expression, without `@filter(...)`.
    pub fn filter(mut self, filter: &str) -> Self {
        self.block.filter = Some(filter.to_string());
        self
    }

    /// Limit the number of results.
    pub fn first(mut self, n: i64) -> Self {
        self.block.first = Some(n);
        self
    }

    /// Skip results.
    pub fn offset(mut self, n: i64) -> Self {
        self.block.offset = Some(n);
        self
    }

    /// Start after the given UID.
    pub fn after(mut self, uid: &str) -> Self {
        self.block.after = Some(uid.to_string());
        self
    }

    /// Sort ascending by a predicate.
    pub fn order_asc(mut self, predicate: &str) -> Self {
        self.block.order.push((Order::Asc, predicate.to_string()));
        self
    }

    /// Sort descending by a predicate.
    pub fn order_desc(mut self, predicate: &str) -> Self {
        self.block.order.push((Order::Desc, predicate.to_string()));
        self
    }

    /// Declare query variables, e.g. `vars("byName($name: string)", map)`.
    pub fn vars(mut self, func_def: &str, vars: HashMap<String, String>) -> Self {
        self.block.func_def = Some(func_def.to_string());
        self.block.vars = vars;
        self
    }

    /// Expand edges `depth` levels deep.
    pub fn all(mut self, depth: usize) -> Self {
        self.block.selection = Selection::Expand { depth };
        self
    }

    /// Replace the selection with a custom block body.
    pub fn query(mut self, body: &str) -> Self {
        self.block.selection = Selection::Custom(body.to_string());
        self
    }

    /// The DQL this query sends.
    pub fn to_dql(&self) -> String {
        self.block.render()
    }

    /// First matching node, or [`Error::NodeNotFound`].
    pub fn node(self) -> Result<N> {
        self.nodes()?.into_iter().next().ok_or(Error::NodeNotFound)
    }

    /// All matching nodes.
    pub fn nodes(mut self) -> Result<Vec<N>> {
        let dql = self.block.render();
        let mut data = self.run(&dql)?;
        take_block(&mut data, &self.block.name)
    }

    /// Matching nodes plus the total count ignoring paging.
    pub fn nodes_and_count(mut self) -> Result<(Vec<N>, u64)> {
        let dql = self.block.render_with_count();
        let mut data = self.run(&dql)?;

        #[derive(Deserialize)]
        struct Total {
            total: u64,
        }
        let count = take_block::<Total>(&mut data, COUNT_BLOCK)?
            .first()
            .map_or(0, |t| t.total);
        let nodes = take_block(&mut data, &self.block.name)?;
        Ok((nodes, count))
    }

    pub(crate) fn block_name(&self) -> &str {
        &self.block.name
    }

    pub(crate) fn block_mut(&mut self) -> &mut QueryBlock {
        &mut self.block
    }

    /// Send `dql` with the declared variables and parse the response.
    pub(crate) fn run(&mut self, dql: &str) -> Result<Value> {
        trace!("query: {}", dql);
        let resp = self.txn.query_with_vars(&self.ctx, dql, &self.block.vars)?;
        if resp.json.is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        Ok(serde_json::from_slice(&resp.json)?)
    }

    pub(crate) fn txn_mut(&mut self) -> &mut T {
        &mut *self.txn
    }
}

/// Deserialize and remove one result block; missing blocks are empty.
pub(crate) fn take_block<D: DeserializeOwned>(data: &mut Value, name: &str) -> Result<Vec<D>> {
    match data.get_mut(name).map(Value::take) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(block) => Ok(serde_json::from_value(block)?),
    }
}
