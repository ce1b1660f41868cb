//! Type descriptor for one batch of nodes.

use std::collections::HashMap;

use log::warn;
use serde_json::{Map, Value};
use ulid::Ulid;

use super::options::MutateOptions;
use crate::error::{Error, Result};
use crate::schema::{Node, NodeSchema};

/// Key of the injected type label.
pub(crate) const TYPE_PREDICATE: &str = "dgraph.type";

/// Schema of a batch plus the blank node name given to each node that has
/// no UID yet.
#[derive(Debug, Clone)]
pub struct MutateType {
    schema: NodeSchema,
    /// One entry per node, in batch order.
    blanks: Vec<Option<String>>,
}

impl MutateType {
    /// Validate the schema of `N` and name the new nodes.
    pub fn new<N: Node>(nodes: &[N]) -> Result<Self> {
        let schema = N::schema();
        schema.validate()?;

        let prefix = schema.type_name.to_lowercase();
        let blanks = nodes
            .iter()
            .map(|node| match node.uid() {
                Some(uid) if !uid.is_empty() => None,
                _ => Some(format!("{}_{}", prefix, Ulid::new().to_string().to_lowercase())),
            })
            .collect();

        Ok(Self { schema, blanks })
    }

    /// The validated schema.
    pub fn schema(&self) -> &NodeSchema {
        &self.schema
    }

    /// The node type label.
    pub fn type_name(&self) -> &str {
        &self.schema.type_name
    }

    /// Blank node name of the node at `index`, if it is new.
    pub fn blank(&self, index: usize) -> Option<&str> {
        self.blanks.get(index).and_then(|b| b.as_deref())
    }

    /// Serialize one node to a JSON object with `uid` and the type injected.
    pub fn node_value<N: Node>(
        &self,
        index: usize,
        node: &N,
        opts: &MutateOptions,
    ) -> Result<Map<String, Value>> {
        let mut obj = match serde_json::to_value(node)? {
            Value::Object(obj) => obj,
            other => {
                return Err(Error::InvalidData(format!(
                    "{} must serialize to a JSON object, got {}",
                    self.type_name(),
                    json_kind(&other)
                )))
            }
        };

        let uid = match (self.blank(index), node.uid()) {
            (Some(blank), _) => format!("_:{}", blank),
            (None, Some(uid)) if !uid.is_empty() => uid.to_string(),
            (None, _) => {
                return Err(Error::InvalidData(format!(
                    "{} node at index {} has neither a uid nor a blank name",
                    self.type_name(),
                    index
                )))
            }
        };
        obj.insert("uid".to_string(), Value::String(uid));
        if !opts.disable_type_inject {
            obj.insert(
                TYPE_PREDICATE.to_string(),
                Value::String(self.schema.type_name.clone()),
            );
        }
        Ok(obj)
    }

    /// The set payload for the whole batch, as a JSON array.
    pub fn payload<N: Node>(&self, nodes: &[N], opts: &MutateOptions) -> Result<Vec<u8>> {
        let values = nodes
            .iter()
            .enumerate()
            .map(|(i, node)| self.node_value(i, node, opts).map(Value::Object))
            .collect::<Result<Vec<_>>>()?;
        Ok(serde_json::to_vec(&Value::Array(values))?)
    }

    /// Copy UIDs assigned to blank nodes back into `nodes`.
    pub fn save_uids<N: Node>(&self, nodes: &mut [N], assigned: &HashMap<String, String>) {
        for (node, blank) in nodes.iter_mut().zip(&self.blanks) {
            let Some(blank) = blank else { continue };
            match assigned.get(blank) {
                Some(uid) => node.set_uid(uid.clone()),
                None => warn!("no uid assigned for {} node _:{}", self.type_name(), blank),
            }
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
