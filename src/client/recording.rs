//! In-process client double that records every call made against it.
//!
//! `RecordingClient` stands in for a real driver in tests. It keeps a log
//! of every transaction call together with the context it received,
//! replays scripted query responses and errors, assigns `0x..` UIDs to blank
//! nodes in set mutations, and reports the misuse a real client would
//! (committing twice, writing through a read-only transaction, expired
//! contexts).

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;

use super::error::{ClientError, ClientResult};
use super::types::{Mutation, Response};
use super::{Client, Txn};
use crate::context::Context;

/// One transaction call.
#[derive(Debug, Clone, PartialEq)]
pub enum Operation {
    /// `query_with_vars`
    Query {
        query: String,
        vars: HashMap<String, String>,
    },
    /// `mutate`
    Mutate(Mutation),
    /// `commit`
    Commit,
    /// `discard`
    Discard,
}

/// A recorded call and the context it was made with.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    /// Sequence number of the transaction, starting at 1.
    pub txn_id: usize,
    /// Whether the transaction was opened read-only.
    pub read_only: bool,
    /// Context passed by the caller.
    pub context: Context,
    /// What was called.
    pub op: Operation,
}

#[derive(Default)]
struct RecorderState {
    calls: Vec<RecordedCall>,
    query_responses: VecDeque<ClientResult<Response>>,
    mutate_errors: VecDeque<ClientError>,
    commit_errors: VecDeque<ClientError>,
    txns_opened: usize,
    last_uid: u64,
}

impl RecorderState {
    /// Replace every `_:name` uid in a set payload with a fresh UID.
    fn assign_uids(&mut self, value: &Value, uids: &mut HashMap<String, String>) {
        match value {
            Value::Array(items) => {
                for item in items {
                    self.assign_uids(item, uids);
                }
            }
            Value::Object(obj) => {
                if let Some(Value::String(uid)) = obj.get("uid") {
                    if let Some(blank) = uid.strip_prefix("_:") {
                        if !uids.contains_key(blank) {
                            self.last_uid += 1;
                            uids.insert(blank.to_string(), format!("{:#x}", self.last_uid));
                        }
                    }
                }
                for child in obj.values() {
                    self.assign_uids(child, uids);
                }
            }
            _ => {}
        }
    }
}

/// A client double recording every transaction call.
///
/// Clones share the same log and scripts.
#[derive(Clone, Default)]
pub struct RecordingClient {
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingClient {
    /// Create a client with an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a JSON body returned by the next unscripted query.
    pub fn push_query_json(&self, json: &Value) {
        let body = json.to_string().into_bytes();
        self.state
            .lock()
            .query_responses
            .push_back(Ok(Response::with_json(body)));
    }

    /// Queue an error returned by the next query.
    pub fn push_query_error(&self, err: ClientError) {
        self.state.lock().query_responses.push_back(Err(err));
    }

    /// Queue an error returned by the next mutation.
    pub fn push_mutate_error(&self, err: ClientError) {
        self.state.lock().mutate_errors.push_back(err);
    }

    /// Queue an error returned by the next commit.
    pub fn push_commit_error(&self, err: ClientError) {
        self.state.lock().commit_errors.push_back(err);
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.lock().calls.clone()
    }

    /// Every mutation made so far, in order.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match &call.op {
                Operation::Mutate(m) => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Every query text issued so far, in order.
    pub fn queries(&self) -> Vec<String> {
        self.state
            .lock()
            .calls
            .iter()
            .filter_map(|call| match &call.op {
                Operation::Query { query, .. } => Some(query.clone()),
                _ => None,
            })
            .collect()
    }

    /// Number of transactions opened.
    pub fn txns_opened(&self) -> usize {
        self.state.lock().txns_opened
    }

    fn open(&self, read_only: bool) -> RecordingTxn {
        let mut state = self.state.lock();
        state.txns_opened += 1;
        RecordingTxn {
            id: state.txns_opened,
            read_only,
            finished: false,
            state: self.state.clone(),
        }
    }
}

impl Client for RecordingClient {
    type Txn = RecordingTxn;

    fn new_txn(&self) -> Self::Txn {
        self.open(false)
    }

    fn new_read_only_txn(&self) -> Self::Txn {
        self.open(true)
    }
}

/// Transaction handed out by [`RecordingClient`].
pub struct RecordingTxn {
    id: usize,
    read_only: bool,
    finished: bool,
    state: Arc<Mutex<RecorderState>>,
}

impl RecordingTxn {
    /// Sequence number of this transaction.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Whether this transaction was opened read-only.
    pub fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Whether this transaction was committed or discarded.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    fn record(&self, ctx: &Context, op: Operation) {
        self.state.lock().calls.push(RecordedCall {
            txn_id: self.id,
            read_only: self.read_only,
            context: ctx.clone(),
            op,
        });
    }
}

impl Txn for RecordingTxn {
    fn query_with_vars(
        &mut self,
        ctx: &Context,
        query: &str,
        vars: &HashMap<String, String>,
    ) -> ClientResult<Response> {
        self.record(
            ctx,
            Operation::Query {
                query: query.to_string(),
                vars: vars.clone(),
            },
        );
        ctx.check()?;
        if self.finished {
            return Err(ClientError::Finished);
        }

        self.state
            .lock()
            .query_responses
            .pop_front()
            .unwrap_or_else(|| Ok(Response::with_json(b"{}".to_vec())))
    }

    fn mutate(&mut self, ctx: &Context, mutation: &Mutation) -> ClientResult<Response> {
        self.record(ctx, Operation::Mutate(mutation.clone()));
        ctx.check()?;
        if self.finished {
            return Err(ClientError::Finished);
        }
        if self.read_only {
            return Err(ClientError::ReadOnly);
        }

        let mut state = self.state.lock();
        if let Some(err) = state.mutate_errors.pop_front() {
            return Err(err);
        }

        let mut uids = HashMap::new();
        if let Some(parsed) = mutation.set_value() {
            let value = parsed.map_err(|e| ClientError::other(e.to_string()))?;
            state.assign_uids(&value, &mut uids);
        }
        if mutation.commit_now {
            self.finished = true;
        }
        Ok(Response::with_uids(uids))
    }

    fn commit(&mut self, ctx: &Context) -> ClientResult<()> {
        self.record(ctx, Operation::Commit);
        if self.finished {
            return Err(ClientError::Finished);
        }
        if self.read_only {
            return Err(ClientError::ReadOnly);
        }
        ctx.check()?;

        self.finished = true;
        match self.state.lock().commit_errors.pop_front() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn discard(&mut self, ctx: &Context) -> ClientResult<()> {
        self.record(ctx, Operation::Discard);
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        ctx.check()?;
        Ok(())
    }
}
