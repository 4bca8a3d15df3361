//! Navgraph Core - Configuration graph engine
//!
//! This crate turns heterogeneous configuration records into a typed,
//! directed graph. Record types are described by schemas; references
//! between records come from declared reference fields and from pattern
//! matchers run over free-text fields. Once built, a [`Graph`] is
//! immutable and can be searched and traversed in either direction.

pub mod builder;
pub mod diagnostics;
pub mod edge;
pub mod error;
pub mod graph;
pub mod limits;
pub mod node;
pub mod query;
pub mod record;
pub mod resolver;
pub mod schema;
pub mod text;
pub mod traversal;

pub use builder::{BuildOutput, GraphBuilder, Resolved};
pub use diagnostics::{Diagnostics, DiagnosticsSummary, DuplicateIdWarning, UnresolvedReferenceWarning};
pub use edge::{Direction, Edge, EdgeKind};
pub use error::{Error, RecordError, Result, SchemaError};
pub use graph::{normalize_name, Graph, RelationCount};
pub use node::{Node, NodeId, NodeType};
pub use query::{FindQuery, MatchField, SearchMode};
pub use record::{FieldValue, RawRecord};
pub use resolver::{resolve, PendingRef};
pub use schema::{
    CompiledMatcher, EntityTypeSchema, Matcher, RecordFormat, ReferenceField, SchemaRegistry,
};
pub use text::{extract, IgnoredMatch, TextExtraction};
pub use traversal::{
    traverse, Depth, Subgraph, TraversalEngine, TraversalQuery, TraversalStats, VisitedNode,
};
