//! Node descriptors.
//!
//! A stored value declares its node type and constraints through an explicit
//! [`NodeSchema`] instead of being inspected at runtime. The type name becomes
//! the `dgraph.type` label, and fields flagged `unique` are checked by
//! `create`/`update`.
//!
//! # Usage
//!
//! ```ignore
//! #[derive(Serialize, Deserialize)]
//! struct User {
//!     #[serde(skip_serializing_if = "Option::is_none")]
//!     uid: Option<String>,
//!     name: String,
//!     email: String,
//! }
//!
//! impl Node for User {
//!     fn schema() -> NodeSchema {
//!         NodeSchema::new("User")
//!             .field(FieldSchema::new("name"))
//!             .field(FieldSchema::new("email").unique())
//!     }
//!     fn uid(&self) -> Option<&str> { self.uid.as_deref() }
//!     fn set_uid(&mut self, uid: String) { self.uid = Some(uid) }
//! }
//! ```

mod error;
mod types;

use serde::de::DeserializeOwned;
use serde::Serialize;

pub use error::SchemaError;
pub use types::{FieldSchema, NodeSchema};

/// A value stored as a graph node.
pub trait Node: Serialize + DeserializeOwned {
    /// Type label and field constraints.
    fn schema() -> NodeSchema;

    /// The node's UID, once it has one.
    fn uid(&self) -> Option<&str>;

    /// Write back a UID assigned by the database.
    fn set_uid(&mut self, uid: String);
}
