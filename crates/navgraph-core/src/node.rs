//! Node types

use crate::record::FieldValue;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Unique identifier for a node
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Deterministic id for records that carry no identifier of their own
    pub fn synthesize(type_name: &str, name: &str, origin: &str) -> Self {
        Self(format!("{}:{}@{}", type_name, name, origin))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::borrow::Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Node type, the schema's type name
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeType(pub String);

impl NodeType {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NodeType {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for NodeType {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl std::fmt::Display for NodeType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A resolved configuration object
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Unique identifier
    pub id: NodeId,

    /// Schema type name
    #[serde(rename = "type")]
    pub node_type: NodeType,

    /// Display name (empty when the schema maps none)
    pub name: String,

    /// Canonical field name -> value
    #[serde(default)]
    pub attributes: BTreeMap<String, FieldValue>,

    /// Provenance of the record this node came from
    pub origin: String,
}

impl Node {
    pub fn new(
        id: impl Into<NodeId>,
        node_type: impl Into<NodeType>,
        name: impl Into<String>,
        origin: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            node_type: node_type.into(),
            name: name.into(),
            attributes: BTreeMap::new(),
            origin: origin.into(),
        }
    }

    pub fn with_attribute(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.attributes.insert(field.into(), value.into());
        self
    }

    pub fn attribute(&self, field: &str) -> Option<&FieldValue> {
        self.attributes.get(field)
    }

    /// Check if node is of a given type
    pub fn is_type(&self, type_name: &str) -> bool {
        self.node_type.as_str() == type_name
    }
}
