//! Delete-by-query.

use std::collections::HashMap;

use log::debug;
use serde::Deserialize;
use serde_json::{json, Value};

use super::dql::Selection;
use super::{take_block, Query};
use crate::client::{Mutation, Txn};
use crate::context::Context;
use crate::error::{Error, Result};
use crate::mutation::MutateOptions;
use crate::schema::Node;

#[derive(Debug, Deserialize)]
struct UidOnly {
    uid: String,
}

/// Deletes the `N` nodes matched by a query.
///
/// Nothing is sent until [`node`](Deleter::node) or [`nodes`](Deleter::nodes)
/// is called.
pub struct Deleter<'a, T: Txn + ?Sized, N: Node> {
    query: Query<'a, T, N>,
    opts: MutateOptions,
}

impl<'a, T: Txn + ?Sized, N: Node> Deleter<'a, T, N> {
    pub(crate) fn new(ctx: Context, txn: &'a mut T, opts: MutateOptions) -> Self {
        let mut query = Query::new(ctx, txn);
        query.block_mut().selection = Selection::Uids;
        Self { query, opts }
    }

    /// Context the delete runs with.
    pub fn context(&self) -> &Context {
        self.query.context()
    }

    /// Transaction the delete runs in.
    pub fn txn(&self) -> &T {
        self.query.txn()
    }

    /// Options applied to the delete mutation.
    pub fn options(&self) -> &MutateOptions {
        &self.opts
    }

    /// Root the selection at `uid(...)`.
    ///
    /// The text is inserted as given, so a comma-separated list deletes every
    /// listed node of type `N`. Use [`node`](Deleter::node) to delete at most one.
    pub fn uid(mut self, uid: &str) -> Self {
        self.query = self.query.uid(uid);
        self
    }

    /// DQL filter expression, without `@filter(...)`.
    pub fn filter(mut self, filter: &str) -> Self {
        self.query = self.query.filter(filter);
        self
    }

    /// Limit the number of deleted nodes.
    pub fn first(mut self, n: i64) -> Self {
        self.query = self.query.first(n);
        self
    }

    /// Skip matches.
    pub fn offset(mut self, n: i64) -> Self {
        self.query = self.query.offset(n);
        self
    }

    /// Start after the given UID.
    pub fn after(mut self, uid: &str) -> Self {
        self.query = self.query.after(uid);
        self
    }

    /// Sort ascending by a predicate.
    pub fn order_asc(mut self, predicate: &str) -> Self {
        self.query = self.query.order_asc(predicate);
        self
    }

    /// Sort descending by a predicate.
    pub fn order_desc(mut self, predicate: &str) -> Self {
        self.query = self.query.order_desc(predicate);
        self
    }

    /// Declare query variables, e.g. `vars("byName($name: string)", map)`.
    pub fn vars(mut self, func_def: &str, vars: HashMap<String, String>) -> Self {
        self.query = self.query.vars(func_def, vars);
        self
    }

    /// The DQL used to select the nodes to delete.
    pub fn to_dql(&self) -> String {
        self.query.to_dql()
    }

    /// Delete the first match and return its UID, or [`Error::NodeNotFound`].
    pub fn node(self) -> Result<String> {
        let mut deleted = self.first(1).nodes()?;
        if deleted.is_empty() {
            return Err(Error::NodeNotFound);
        }
        Ok(deleted.swap_remove(0))
    }

    /// Delete every match and return the deleted UIDs.
    pub fn nodes(mut self) -> Result<Vec<String>> {
        let dql = self.to_dql();
        let mut data = self.query.run(&dql)?;
        let name = self.query.block_name().to_string();
        let uids: Vec<String> = take_block::<UidOnly>(&mut data, &name)?
            .into_iter()
            .map(|n| n.uid)
            .collect();

        if uids.is_empty() {
            debug!("delete matched no {} nodes", N::schema().type_name);
            return Ok(uids);
        }

        let payload: Vec<Value> = uids.iter().map(|uid| json!({ "uid": uid })).collect();
        let mutation =
            Mutation::delete(serde_json::to_vec(&payload)?).commit_now(self.opts.commit_now);
        debug!(
            "deleting {} {} node(s) (commit_now: {})",
            uids.len(),
            N::schema().type_name,
            self.opts.commit_now
        );

        let ctx = self.query.context().clone();
        self.query.txn_mut().mutate(&ctx, &mutation)?;
        Ok(uids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Client, ClientError, Operation, RecordingClient};
    use crate::test_support::User;

    #[test]
    fn test_deletes_matched_uids() {
        let client = RecordingClient::new();
        client.push_query_json(&json!({"data": [{"uid": "0x1"}, {"uid": "0x2"}]}));
        let mut txn = client.new_txn();
        let opts = MutateOptions::new().commit_now(true);

        let deleted = Deleter::<_, User>::new(Context::background(), &mut txn, opts)
            .filter("has(email)")
            .nodes()
            .unwrap();
        assert_eq!(deleted, vec!["0x1", "0x2"]);

        let calls = client.calls();
        assert_eq!(calls.len(), 2);
        match &calls[0].op {
            Operation::Query { query, .. } => {
                assert!(query.contains("data(func: type(User)) @filter(has(email)) {\n\t\tuid\n\t}"));
                assert!(!query.contains("expand"));
            }
            other => panic!("expected query, got {:?}", other),
        }
        match &calls[1].op {
            Operation::Mutate(m) => {
                assert!(m.commit_now);
                assert!(m.set_json.is_none());
                assert_eq!(
                    m.delete_value().unwrap().unwrap(),
                    json!([{"uid": "0x1"}, {"uid": "0x2"}])
                );
            }
            other => panic!("expected mutation, got {:?}", other),
        }
    }

    #[test]
    fn test_no_match_sends_no_mutation() {
        let client = RecordingClient::new();
        let mut txn = client.new_txn();

        let deleted = Deleter::<_, User>::new(Context::background(), &mut txn, MutateOptions::default())
            .nodes()
            .unwrap();
        assert!(deleted.is_empty());
        assert!(client.mutations().is_empty());
    }

    #[test]
    fn test_node_limits_to_first() {
        let client = RecordingClient::new();
        client.push_query_json(&json!({"data": [{"uid": "0x9"}]}));
        let mut txn = client.new_txn();

        let uid = Deleter::<_, User>::new(Context::background(), &mut txn, MutateOptions::default())
            .order_desc("name")
            .node()
            .unwrap();
        assert_eq!(uid, "0x9");
        assert!(client.queries()[0].contains("first: 1, orderdesc: name"));
    }

    #[test]
    fn test_uid_list_deletes_each_listed_node() {
        let client = RecordingClient::new();
        client.push_query_json(&json!({"data": [{"uid": "0x1"}, {"uid": "0x2"}]}));
        let mut txn = client.new_txn();

        let deleted = Deleter::<_, User>::new(Context::background(), &mut txn, MutateOptions::default())
            .uid("0x1, 0x2")
            .nodes()
            .unwrap();
        assert_eq!(deleted, vec!["0x1", "0x2"]);
        assert!(client.queries()[0].contains("data(func: uid(0x1, 0x2)) @filter(type(User))"));
        assert_eq!(
            client.mutations()[0].delete_value().unwrap().unwrap(),
            json!([{"uid": "0x1"}, {"uid": "0x2"}])
        );
    }

    #[test]
    fn test_node_not_found() {
        let client = RecordingClient::new();
        let mut txn = client.new_txn();

        let err = Deleter::<_, User>::new(Context::background(), &mut txn, MutateOptions::default())
            .uid("0x404")
            .node()
            .unwrap_err();
        assert!(matches!(err, Error::NodeNotFound));
    }

    #[test]
    fn test_read_only_error_passes_through() {
        let client = RecordingClient::new();
        client.push_query_json(&json!({"data": [{"uid": "0x1"}]}));
        let mut txn = client.new_read_only_txn();

        let err = Deleter::<_, User>::new(Context::background(), &mut txn, MutateOptions::default())
            .nodes()
            .unwrap_err();
        assert!(matches!(err, Error::Client(ClientError::ReadOnly)));
    }
}
