//! Record source trait definitions

use crate::error::SourceResult;
use async_trait::async_trait;
use navgraph_core::{EntityTypeSchema, RawRecord, SchemaRegistry};

/// Trait for record source implementations
///
/// A source hands back raw records for a schema; it never interprets
/// references. Records for one type come back in a stable order.
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Load every record of one type
    async fn load(&self, schema: &EntityTypeSchema) -> SourceResult<Vec<RawRecord>>;

    /// Load records for every registered type, in registry order
    async fn load_all(&self, registry: &SchemaRegistry) -> SourceResult<Vec<RawRecord>> {
        let mut records = Vec::new();
        for schema in registry.iter() {
            records.extend(self.load(schema).await?);
        }
        Ok(records)
    }
}
