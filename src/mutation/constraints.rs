//! Uniqueness-checked mutations used by `create` and `update`.
//!
//! Create and update share this routine; the `update` flag only changes
//! two things:
//! - every node must already carry a UID,
//! - a match on the node's own UID is not a conflict.

use std::collections::HashMap;

use log::{debug, trace};
use serde::Deserialize;
use serde_json::Value;

use super::error::UniqueError;
use super::mutate_type::MutateType;
use super::options::MutateOptions;
use crate::client::Txn;
use crate::context::Context;
use crate::error::{Error, Result};
use crate::schema::Node;

/// Result block name of the lookup query.
const EXISTS_BLOCK: &str = "exists";

#[derive(Debug, Deserialize)]
struct UidOnly {
    uid: String,
}

/// One unique value to look up.
struct Candidate<'a> {
    index: usize,
    field: &'a str,
    value: Value,
}

/// Write `nodes` after checking their unique fields.
///
/// With `update` set, every node must carry a UID. Checks are skipped when
/// `opts.disable_constraints` is set.
pub fn mutate_with_constraints<T, N>(
    ctx: &Context,
    txn: &mut T,
    nodes: &mut [N],
    update: bool,
    opts: &MutateOptions,
) -> Result<()>
where
    T: Txn + ?Sized,
    N: Node,
{
    let mtype = MutateType::new(nodes)?;

    if update {
        if let Some(i) = (0..nodes.len()).find(|&i| mtype.blank(i).is_some()) {
            debug!("update of {} node at index {} without uid", mtype.type_name(), i);
            return Err(Error::MissingUid {
                node_type: mtype.type_name().to_string(),
            });
        }
    }

    if !opts.disable_constraints {
        let candidates = collect_candidates(&mtype, nodes)?;
        check_batch(&mtype, &candidates)?;
        for candidate in &candidates {
            let own_uid = if update { nodes[candidate.index].uid() } else { None };
            check_existing(ctx, txn, &mtype, candidate, own_uid)?;
        }
    }

    super::send(ctx, txn, &mtype, nodes, opts)
}

/// Non-empty values of every unique field, in batch order.
fn collect_candidates<'a, N: Node>(mtype: &'a MutateType, nodes: &[N]) -> Result<Vec<Candidate<'a>>> {
    let mut candidates = Vec::new();
    for (index, node) in nodes.iter().enumerate() {
        let obj = match serde_json::to_value(node)? {
            Value::Object(obj) => obj,
            _ => {
                return Err(Error::InvalidData(format!(
                    "{} must serialize to a JSON object",
                    mtype.type_name()
                )))
            }
        };

        for field in mtype.schema().unique_fields() {
            let value = match obj.get(&field.predicate) {
                None => {
                    debug!(
                        "unique predicate {} missing from serialized {} node at index {}, not checked",
                        field.predicate,
                        mtype.type_name(),
                        index
                    );
                    continue;
                }
                Some(Value::Null) => continue,
                Some(Value::String(s)) if s.is_empty() => continue,
                Some(Value::Array(_) | Value::Object(_)) => {
                    return Err(Error::InvalidData(format!(
                        "unique field {}.{} must hold a scalar value",
                        mtype.type_name(),
                        field.predicate
                    )))
                }
                Some(v) => v.clone(),
            };
            candidates.push(Candidate {
                index,
                field: &field.predicate,
                value,
            });
        }
    }
    Ok(candidates)
}

/// Reject values repeated inside the batch itself.
fn check_batch(mtype: &MutateType, candidates: &[Candidate<'_>]) -> Result<()> {
    let mut seen: HashMap<(&str, String), usize> = HashMap::new();
    for candidate in candidates {
        let key = (candidate.field, candidate.value.to_string());
        if let Some(first) = seen.insert(key, candidate.index) {
            if first != candidate.index {
                return Err(unique_error(mtype, candidate, None).into());
            }
        }
    }
    Ok(())
}

/// Look the value up in the database.
fn check_existing<T: Txn + ?Sized>(
    ctx: &Context,
    txn: &mut T,
    mtype: &MutateType,
    candidate: &Candidate<'_>,
    own_uid: Option<&str>,
) -> Result<()> {
    let (var_type, var_value) = query_var(&candidate.value);
    let query = format!(
        "query {block}($value: {var_type}) {{\n\t{block}(func: eq(<{pred}>, $value)) @filter(type({ty})) {{\n\t\tuid\n\t}}\n}}",
        block = EXISTS_BLOCK,
        var_type = var_type,
        pred = candidate.field,
        ty = mtype.type_name(),
    );
    trace!("unique check query: {}", query);

    let mut vars = HashMap::new();
    vars.insert("$value".to_string(), var_value);
    let resp = txn.query_with_vars(ctx, &query, &vars)?;

    let mut found: HashMap<String, Vec<UidOnly>> = if resp.json.is_empty() {
        HashMap::new()
    } else {
        serde_json::from_slice(&resp.json)?
    };
    let existing = found.remove(EXISTS_BLOCK).unwrap_or_default();

    match existing.into_iter().find(|n| Some(n.uid.as_str()) != own_uid) {
        Some(clash) => Err(unique_error(mtype, candidate, Some(clash.uid)).into()),
        None => Ok(()),
    }
}

/// DQL variable type and textual value for a scalar.
fn query_var(value: &Value) -> (&'static str, String) {
    match value {
        Value::String(s) => ("string", s.clone()),
        Value::Bool(b) => ("bool", b.to_string()),
        Value::Number(n) if n.is_f64() => ("float", n.to_string()),
        Value::Number(n) => ("int", n.to_string()),
        other => ("string", other.to_string()),
    }
}

fn unique_error(mtype: &MutateType, candidate: &Candidate<'_>, uid: Option<String>) -> UniqueError {
    UniqueError {
        node_type: mtype.type_name().to_string(),
        field: candidate.field.to_string(),
        value: candidate.value.to_string(),
        uid,
    }
}
