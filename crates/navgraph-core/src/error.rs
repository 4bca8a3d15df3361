//! Error types for Navgraph Core

use thiserror::Error;

/// Result type alias using Navgraph's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Navgraph error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    #[error("Node not found: {0}")]
    NodeNotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<crate::limits::ValidationError> for Error {
    fn from(err: crate::limits::ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

/// Problems with the schema set. Any of these aborts a build.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    #[error("Duplicate type name: {0}")]
    DuplicateType(String),

    #[error("Invalid type name: {0}")]
    InvalidTypeName(String),

    #[error("Invalid matcher '{matcher}' on type '{type_name}': {reason}")]
    InvalidMatcher {
        type_name: String,
        matcher: String,
        reason: String,
    },

    #[error("Matcher '{matcher}' on type '{type_name}' has no named capture group")]
    MissingCapture { type_name: String, matcher: String },

    #[error("Field '{field}' on type '{type_name}' refers to unknown type '{target}'")]
    UnknownTargetType {
        type_name: String,
        field: String,
        target: String,
    },

    #[error("Field '{field}' is not mapped on type '{type_name}'")]
    UnknownField { type_name: String, field: String },

    #[error("Matcher '{matcher}' on type '{type_name}' writes to field '{field}', which is already mapped")]
    FieldCollision {
        type_name: String,
        matcher: String,
        field: String,
    },
}

/// Per-record failures. The record is dropped and the build carries on.
#[derive(Error, Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecordError {
    #[error("Record of type '{type_name}' from {origin} has neither an identifier nor a name")]
    MissingIdentifier { type_name: String, origin: String },

    #[error("Record from {origin} has unknown type '{type_name}'")]
    UnknownType { type_name: String, origin: String },
}

impl RecordError {
    pub fn origin(&self) -> &str {
        match self {
            Self::MissingIdentifier { origin, .. } | Self::UnknownType { origin, .. } => origin,
        }
    }
}
