//! Node and field descriptors.

use std::collections::HashSet;
use std::fmt;

use super::error::SchemaError;

/// Predicates the database manages on every node.
const RESERVED: &[&str] = &["uid", "dgraph.type"];

/// Characters that would break out of a DQL predicate reference.
const PREDICATE_FORBIDDEN: &[char] = &[
    '{', '}', '(', ')', '<', '>', '"', '\'', '@', ',', ':', '$', '#', '\\',
];

/// One predicate of a node type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSchema {
    /// Predicate name as stored in the database.
    pub predicate: String,
    /// Values must be unique among nodes of the same type.
    pub unique: bool,
}

impl FieldSchema {
    /// Create a field for the given predicate.
    pub fn new(predicate: impl Into<String>) -> Self {
        Self {
            predicate: predicate.into(),
            unique: false,
        }
    }

    /// Mark the field unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    fn validate(&self) -> Result<(), SchemaError> {
        let pred = self.predicate.as_str();
        if pred.is_empty()
            || pred
                .chars()
                .any(|c| c.is_whitespace() || c.is_control() || PREDICATE_FORBIDDEN.contains(&c))
        {
            return Err(SchemaError::InvalidPredicate(pred.to_string()));
        }
        if RESERVED.contains(&pred) {
            return Err(SchemaError::ReservedPredicate(pred.to_string()));
        }
        Ok(())
    }
}

/// Type label and fields of a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSchema {
    /// Node type, injected as `dgraph.type`.
    pub type_name: String,
    /// Declared fields.
    pub fields: Vec<FieldSchema>,
}

impl NodeSchema {
    /// Create a schema with no declared fields.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
        }
    }

    /// Add a field.
    pub fn field(mut self, field: FieldSchema) -> Self {
        self.fields.push(field);
        self
    }

    /// Get a field by predicate.
    pub fn get_field(&self, predicate: &str) -> Option<&FieldSchema> {
        self.fields.iter().find(|f| f.predicate == predicate)
    }

    /// Fields carrying a uniqueness constraint.
    pub fn unique_fields(&self) -> impl Iterator<Item = &FieldSchema> {
        self.fields.iter().filter(|f| f.unique)
    }

    /// Check the type name and every field.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let name = self.type_name.as_str();
        let first = name.chars().next().ok_or(SchemaError::EmptyTypeName)?;
        if !first.is_ascii_alphabetic() && first != '_' {
            return Err(SchemaError::InvalidTypeName {
                name: name.to_string(),
                char: first,
                position: 0,
            });
        }
        for (i, c) in name.chars().enumerate() {
            if !c.is_ascii_alphanumeric() && c != '_' && c != '.' {
                return Err(SchemaError::InvalidTypeName {
                    name: name.to_string(),
                    char: c,
                    position: i,
                });
            }
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            field.validate()?;
            if !seen.insert(field.predicate.as_str()) {
                return Err(SchemaError::DuplicatePredicate(field.predicate.clone()));
            }
        }

        Ok(())
    }
}

impl fmt::Display for NodeSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "type {} {{", self.type_name)?;
        for field in &self.fields {
            write!(f, " {}", field.predicate)?;
            if field.unique {
                write!(f, " @unique")?;
            }
        }
        write!(f, " }}")
    }
}
