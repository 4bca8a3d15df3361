//! In-memory record source for testing

use crate::error::SourceResult;
use crate::traits::RecordSource;
use async_trait::async_trait;
use navgraph_core::{EntityTypeSchema, RawRecord};

/// In-memory record source
///
/// Useful for testing and for callers that acquire records themselves.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    records: Vec<RawRecord>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(mut self, record: RawRecord) -> Self {
        self.records.push(record);
        self
    }

    pub fn push(&mut self, record: RawRecord) {
        self.records.push(record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl From<Vec<RawRecord>> for MemorySource {
    fn from(records: Vec<RawRecord>) -> Self {
        Self { records }
    }
}

#[async_trait]
impl RecordSource for MemorySource {
    async fn load(&self, schema: &EntityTypeSchema) -> SourceResult<Vec<RawRecord>> {
        Ok(self
            .records
            .iter()
            .filter(|r| r.source_type == schema.type_name)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgraph_core::SchemaRegistry;

    #[tokio::test]
    async fn test_memory_source_filters_by_type() {
        let source = MemorySource::new()
            .with_record(RawRecord::new("template", "t1").with_field("id", "T1"))
            .with_record(RawRecord::new("formflow", "f1").with_field("id", "F1"))
            .with_record(RawRecord::new("template", "t2").with_field("id", "T2"));

        let records = source.load(&EntityTypeSchema::new("template")).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].origin, "t2");
    }

    #[tokio::test]
    async fn test_load_all_in_registry_order() {
        let registry = SchemaRegistry::new(vec![
            EntityTypeSchema::new("formflow"),
            EntityTypeSchema::new("template"),
        ])
        .unwrap();
        let source = MemorySource::from(vec![
            RawRecord::new("template", "t1"),
            RawRecord::new("formflow", "f1"),
            RawRecord::new("widget", "w1"),
        ]);

        let records = source.load_all(&registry).await.unwrap();
        let origins: Vec<_> = records.iter().map(|r| r.origin.as_str()).collect();
        assert_eq!(origins, vec!["f1", "t1"]);
    }
}
