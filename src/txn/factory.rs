//! Constructors binding a fresh client transaction to a context.

use log::debug;

use super::TxnContext;
use crate::client::Client;
use crate::context::Context;

/// Open a read-write transaction bound to `ctx`.
pub fn new_txn_context<C: Client + ?Sized>(ctx: Context, client: &C) -> TxnContext<C::Txn> {
    debug!("opening read-write transaction");
    TxnContext::from_parts(client.new_txn(), ctx)
}

/// Open a read-write transaction bound to a background context.
pub fn new_txn<C: Client + ?Sized>(client: &C) -> TxnContext<C::Txn> {
    new_txn_context(Context::background(), client)
}

/// Open a read-only transaction bound to `ctx`.
pub fn new_read_only_txn_context<C: Client + ?Sized>(
    ctx: Context,
    client: &C,
) -> TxnContext<C::Txn> {
    debug!("opening read-only transaction");
    TxnContext::from_parts(client.new_read_only_txn(), ctx)
}

/// Open a read-only transaction bound to a background context.
pub fn new_read_only_txn<C: Client + ?Sized>(client: &C) -> TxnContext<C::Txn> {
    new_read_only_txn_context(Context::background(), client)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::client::RecordingClient;

    #[test]
    fn test_default_context_is_background() {
        let client = RecordingClient::new();

        let tx = new_txn(&client);
        assert!(!tx.context().is_cancellable());
        assert!(tx.context().deadline().is_none());
        assert!(!tx.txn().is_read_only());

        let ro = new_read_only_txn(&client);
        assert!(!ro.context().is_cancellable());
        assert!(ro.txn().is_read_only());
    }

    #[test]
    fn test_context_is_bound() {
        let client = RecordingClient::new();
        let ctx = Context::background().with_timeout(Duration::from_secs(10));

        let tx = new_txn_context(ctx.clone(), &client);
        assert_eq!(tx.context(), &ctx);

        let ro = new_read_only_txn_context(ctx.clone(), &client);
        assert_eq!(ro.context(), &ctx);
        assert!(ro.txn().is_read_only());
    }

    #[test]
    fn test_each_call_opens_a_transaction() {
        let client = RecordingClient::new();
        let a = new_txn(&client);
        let b = new_read_only_txn(&client);

        assert_eq!(client.txns_opened(), 2);
        assert_ne!(a.txn().id(), b.txn().id());
    }
}
