//! Raw input records and field values

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A field value: a single string or a list of strings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Iterate over the non-empty values in source order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        let items: Vec<&str> = match self {
            Self::Text(s) => vec![s.as_str()],
            Self::List(items) => items.iter().map(String::as_str).collect(),
        };
        items.into_iter().filter(|s| !s.trim().is_empty())
    }

    /// First non-empty value, if any
    pub fn first(&self) -> Option<&str> {
        self.values().next()
    }

    pub fn is_empty(&self) -> bool {
        self.first().is_none()
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{}", s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::List(items)
    }
}

impl From<Vec<&str>> for FieldValue {
    fn from(items: Vec<&str>) -> Self {
        Self::List(items.into_iter().map(String::from).collect())
    }
}

/// One record as acquired from its source, before schema translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawRecord {
    /// Schema type name
    pub source_type: String,

    /// Provenance (file path or text block label), diagnostics only
    pub origin: String,

    /// Source field name -> value. Absent fields are simply missing.
    #[serde(default)]
    pub raw_fields: BTreeMap<String, FieldValue>,
}

impl RawRecord {
    pub fn new(source_type: impl Into<String>, origin: impl Into<String>) -> Self {
        Self {
            source_type: source_type.into(),
            origin: origin.into(),
            raw_fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.raw_fields.insert(field.into(), value.into());
        self
    }

    pub fn field(&self, field: &str) -> Option<&FieldValue> {
        self.raw_fields.get(field)
    }
}
