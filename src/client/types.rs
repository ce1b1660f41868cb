//! Request and response values exchanged with a client.

use std::collections::HashMap;

/// A write request: JSON to set and/or delete.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mutation {
    /// JSON object(s) to set.
    pub set_json: Option<Vec<u8>>,
    /// JSON object(s) to delete.
    pub delete_json: Option<Vec<u8>>,
    /// Commit the transaction together with this mutation.
    pub commit_now: bool,
}

impl Mutation {
    /// A mutation setting the given JSON.
    pub fn set(json: Vec<u8>) -> Self {
        Self {
            set_json: Some(json),
            ..Default::default()
        }
    }

    /// A mutation deleting the given JSON.
    pub fn delete(json: Vec<u8>) -> Self {
        Self {
            delete_json: Some(json),
            ..Default::default()
        }
    }

    /// Set the commit_now flag.
    pub fn commit_now(mut self, value: bool) -> Self {
        self.commit_now = value;
        self
    }

    /// Parse the set payload, if any.
    pub fn set_value(&self) -> Option<serde_json::Result<serde_json::Value>> {
        self.set_json.as_deref().map(serde_json::from_slice)
    }

    /// Parse the delete payload, if any.
    pub fn delete_value(&self) -> Option<serde_json::Result<serde_json::Value>> {
        self.delete_json.as_deref().map(serde_json::from_slice)
    }
}

/// A client response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Response {
    /// Query result as JSON; empty for most mutations.
    pub json: Vec<u8>,
    /// Blank node name (without the `_:` prefix) to assigned UID.
    pub uids: HashMap<String, String>,
}

impl Response {
    /// A response carrying query JSON.
    pub fn with_json(json: Vec<u8>) -> Self {
        Self {
            json,
            uids: HashMap::new(),
        }
    }

    /// A response carrying assigned UIDs.
    pub fn with_uids(uids: HashMap<String, String>) -> Self {
        Self {
            json: Vec::new(),
            uids,
        }
    }
}
