//! Shared node types for unit tests.

use serde::{Deserialize, Serialize};

use crate::schema::{FieldSchema, Node, NodeSchema};

pub(crate) fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub(crate) struct User {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
    pub name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub email: String,
}

impl User {
    pub fn new(name: &str, email: &str) -> Self {
        Self {
            uid: None,
            name: name.to_string(),
            email: email.to_string(),
        }
    }

    pub fn with_uid(mut self, uid: &str) -> Self {
        self.uid = Some(uid.to_string());
        self
    }
}

impl Node for User {
    fn schema() -> NodeSchema {
        NodeSchema::new("User")
            .field(FieldSchema::new("name"))
            .field(FieldSchema::new("email").unique())
    }

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }
}

/// A node whose schema never validates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub(crate) struct Broken {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uid: Option<String>,
}

impl Node for Broken {
    fn schema() -> NodeSchema {
        NodeSchema::new("")
    }

    fn uid(&self) -> Option<&str> {
        self.uid.as_deref()
    }

    fn set_uid(&mut self, uid: String) {
        self.uid = Some(uid);
    }
}

/// Serializes to a bare string instead of an object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Tag(pub String);

impl Node for Tag {
    fn schema() -> NodeSchema {
        NodeSchema::new("Tag")
    }

    fn uid(&self) -> Option<&str> {
        None
    }

    fn set_uid(&mut self, _uid: String) {}
}
