//! Typed mutations.
//!
//! Turns [`Node`] values into set mutations and writes assigned UIDs back:
//!
//! 1. derive a [`MutateType`] from the node schema (validated) and give every
//!    node without a UID a blank node name,
//! 2. serialize the nodes with `uid` and `dgraph.type` injected,
//! 3. send one [`Mutation`], then copy the assigned UIDs back into the nodes.
//!
//! `create`/`update` run uniqueness checks between steps 1 and 2; see
//! [`mutate_with_constraints`].

mod constraints;
mod error;
mod mutate_type;
mod options;

use log::debug;

use crate::client::{Mutation, Txn};
use crate::context::Context;
use crate::error::Result;
use crate::schema::Node;

pub use constraints::mutate_with_constraints;
pub use error::UniqueError;
pub use mutate_type::MutateType;
pub use options::MutateOptions;

/// Set `nodes` in one mutation and write assigned UIDs back.
///
/// No client call is made when the type descriptor cannot be derived.
pub fn mutate<T, N>(ctx: &Context, txn: &mut T, nodes: &mut [N], opts: &MutateOptions) -> Result<()>
where
    T: Txn + ?Sized,
    N: Node,
{
    let mtype = MutateType::new(nodes)?;
    send(ctx, txn, &mtype, nodes, opts)
}

/// Serialize, send and write back; shared with the constraint-checked path.
pub(crate) fn send<T, N>(
    ctx: &Context,
    txn: &mut T,
    mtype: &MutateType,
    nodes: &mut [N],
    opts: &MutateOptions,
) -> Result<()>
where
    T: Txn + ?Sized,
    N: Node,
{
    if nodes.is_empty() {
        return Ok(());
    }

    let payload = mtype.payload(nodes, opts)?;
    let mutation = Mutation::set(payload).commit_now(opts.commit_now);
    debug!(
        "mutating {} {} node(s) (commit_now: {})",
        nodes.len(),
        mtype.type_name(),
        opts.commit_now
    );

    let resp = txn.mutate(ctx, &mutation)?;
    mtype.save_uids(nodes, &resp.uids);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::{Client, ClientError, RecordingClient};
    use crate::error::Error;
    use crate::test_support::{init_logger, Broken, User};

    #[test]
    fn test_mutate_writes_back_uids() {
        init_logger();
        let client = RecordingClient::new();
        let mut txn = client.new_txn();
        let mut users = vec![User::new("Alice", "a@x.io"), User::new("Bob", "b@x.io")];

        mutate(&Context::background(), &mut txn, &mut users, &MutateOptions::default()).unwrap();

        assert_eq!(users[0].uid.as_deref(), Some("0x1"));
        assert_eq!(users[1].uid.as_deref(), Some("0x2"));
        assert_eq!(client.mutations().len(), 1);
        assert!(client.queries().is_empty());
    }

    #[test]
    fn test_mutate_payload_shape() {
        let client = RecordingClient::new();
        let mut txn = client.new_txn();
        let mut users = vec![User::new("Alice", "").with_uid("0x7")];
        let opts = MutateOptions::new().commit_now(true);

        mutate(&Context::background(), &mut txn, &mut users, &opts).unwrap();

        let mutation = &client.mutations()[0];
        assert!(mutation.commit_now);
        let sent = mutation.set_value().unwrap().unwrap();
        assert_eq!(
            sent,
            serde_json::json!([{"uid": "0x7", "name": "Alice", "dgraph.type": "User"}])
        );
        assert_eq!(users[0].uid.as_deref(), Some("0x7"));
    }

    #[test]
    fn test_invalid_schema_skips_client() {
        let client = RecordingClient::new();
        let mut txn = client.new_txn();
        let mut nodes = vec![Broken::default()];

        let err = mutate(&Context::background(), &mut txn, &mut nodes, &MutateOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Schema(_)));
        assert!(client.calls().is_empty());
    }

    #[test]
    fn test_client_error_passes_through() {
        let client = RecordingClient::new();
        client.push_mutate_error(ClientError::Aborted);
        let mut txn = client.new_txn();
        let mut users = vec![User::new("Alice", "a@x.io")];

        let err = mutate(&Context::background(), &mut txn, &mut users, &MutateOptions::default())
            .unwrap_err();
        assert!(matches!(err, Error::Client(ClientError::Aborted)));
        assert!(users[0].uid.is_none());
    }

    #[test]
    fn test_empty_batch_is_noop() {
        let client = RecordingClient::new();
        let mut txn = client.new_txn();
        let mut users: Vec<User> = Vec::new();

        mutate(&Context::background(), &mut txn, &mut users, &MutateOptions::default()).unwrap();
        assert!(client.calls().is_empty());
    }
}
