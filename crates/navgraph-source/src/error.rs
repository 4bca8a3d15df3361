//! Source error types

use navgraph_core::SchemaError;
use thiserror::Error;

/// Result type alias for source operations
pub type SourceResult<T> = std::result::Result<T, SourceError>;

/// Source-specific error types
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid source glob: {0}")]
    Glob(#[from] glob::PatternError),

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Source task failed: {0}")]
    Join(#[from] tokio::task::JoinError),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
}
