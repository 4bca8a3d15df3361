//! Navgraph Source - Schema and record acquisition
//!
//! This crate loads schema files and reads raw records from disk (or
//! memory) for the graph builder.

pub mod error;
pub mod file;
pub mod memory;
pub mod schema_file;
pub mod traits;

pub use error::{SourceError, SourceResult};
pub use file::{extract_path, FileSource};
pub use memory::MemorySource;
pub use schema_file::{load_schema, SchemaFile, SchemaFormat};
pub use traits::RecordSource;
