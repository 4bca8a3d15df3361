//! File-backed record source
//!
//! Each type's `source` glob is expanded under the data root. YAML and
//! JSON files hold one record (a mapping) or several (a list of mappings);
//! text files are one record whose whole content is the type's text field.
//! A file that cannot be read or parsed is logged and skipped.

use crate::error::SourceResult;
use crate::traits::RecordSource;
use async_trait::async_trait;
use navgraph_core::{EntityTypeSchema, FieldValue, RawRecord, RecordFormat, SchemaRegistry};
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::task::JoinSet;

/// Record source reading files below a root directory
#[derive(Debug, Clone)]
pub struct FileSource {
    root: PathBuf,
}

impl FileSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Files matching a type's glob, sorted for a stable load order
    fn matching_files(&self, pattern: &str) -> SourceResult<Vec<PathBuf>> {
        let full = self.root.join(pattern);
        let mut files: Vec<PathBuf> = glob::glob(&full.to_string_lossy())?
            .filter_map(|entry| match entry {
                Ok(path) if path.is_file() => Some(path),
                Ok(_) => None,
                Err(e) => {
                    tracing::warn!("Skipping unreadable path: {}", e);
                    None
                }
            })
            .collect();
        files.sort();
        Ok(files)
    }

    /// Origin label: the path relative to the root, with forward slashes
    fn origin_of(&self, path: &Path) -> String {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        relative
            .components()
            .map(|c| c.as_os_str().to_string_lossy())
            .collect::<Vec<_>>()
            .join("/")
    }

    async fn load_file(&self, schema: &EntityTypeSchema, path: &Path) -> SourceResult<Vec<RawRecord>> {
        let content = tokio::fs::read_to_string(path).await?;
        let origin = self.origin_of(path);
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        let mut records = match schema.format {
            RecordFormat::Text => vec![text_record(schema, &origin, content)],
            RecordFormat::Yaml => {
                let value: Value = serde_yaml::from_str(&content)?;
                structured_records(schema, &origin, value)
            }
            RecordFormat::Json => {
                let value: Value = serde_json::from_str(&content)?;
                structured_records(schema, &origin, value)
            }
        };

        if schema.name_from_file {
            for record in &mut records {
                apply_name_fallback(schema, record, &stem);
            }
        }
        Ok(records)
    }
}

fn text_record(schema: &EntityTypeSchema, origin: &str, content: String) -> RawRecord {
    let key = schema
        .source_field(&schema.text_field)
        .unwrap_or(schema.text_field.as_str())
        .to_string();
    RawRecord::new(schema.type_name.as_str(), origin).with_field(key, content)
}

/// One record per mapping; a top-level list yields one record per element
fn structured_records(schema: &EntityTypeSchema, origin: &str, value: Value) -> Vec<RawRecord> {
    match &value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .filter(|(_, item)| item.is_object())
            .map(|(i, item)| record_from_value(schema, &format!("{}#{}", origin, i), item))
            .collect(),
        Value::Object(_) => vec![record_from_value(schema, origin, &value)],
        _ => {
            tracing::warn!("Skipping {}: expected a mapping or a list of mappings", origin);
            Vec::new()
        }
    }
}

fn record_from_value(schema: &EntityTypeSchema, origin: &str, value: &Value) -> RawRecord {
    let mut record = RawRecord::new(schema.type_name.as_str(), origin);
    for source in schema.field_map.values() {
        if let Some(field) = extract_path(value, source) {
            record.raw_fields.insert(source.clone(), field);
        }
    }
    record
}

fn apply_name_fallback(schema: &EntityTypeSchema, record: &mut RawRecord, stem: &str) {
    let Some(source) = schema.source_field(&schema.name_field) else {
        tracing::debug!(
            "Type {} uses name_from_file but maps no name field",
            schema.type_name
        );
        return;
    };
    let has_name = record.field(source).is_some_and(|v| !v.is_empty());
    if !has_name && !stem.is_empty() {
        record
            .raw_fields
            .insert(source.to_string(), FieldValue::from(stem));
    }
}

/// Values at a dotted path
///
/// A path segment that lands on a list continues into every element, and
/// the result is then a list. Scalars are stringified; nulls and nested
/// mappings at the end of the path are ignored.
pub fn extract_path(value: &Value, path: &str) -> Option<FieldValue> {
    let mut out = Vec::new();
    let mut through_list = false;
    collect(value, path, &mut out, &mut through_list);

    if out.is_empty() {
        None
    } else if !through_list && out.len() == 1 {
        out.pop().map(FieldValue::Text)
    } else {
        Some(FieldValue::List(out))
    }
}

fn collect(value: &Value, path: &str, out: &mut Vec<String>, through_list: &mut bool) {
    if let Value::Array(items) = value {
        *through_list = true;
        for item in items {
            collect(item, path, out, through_list);
        }
        return;
    }

    if path.is_empty() {
        match value {
            Value::String(s) => out.push(s.clone()),
            Value::Number(n) => out.push(n.to_string()),
            Value::Bool(b) => out.push(b.to_string()),
            _ => {}
        }
        return;
    }

    let Value::Object(map) = value else {
        return;
    };
    // Keys containing dots are matched whole before splitting
    if let Some(inner) = map.get(path) {
        collect(inner, "", out, through_list);
        return;
    }
    let (head, rest) = path.split_once('.').unwrap_or((path, ""));
    if let Some(inner) = map.get(head) {
        collect(inner, rest, out, through_list);
    }
}

#[async_trait]
impl RecordSource for FileSource {
    async fn load(&self, schema: &EntityTypeSchema) -> SourceResult<Vec<RawRecord>> {
        let Some(pattern) = &schema.source else {
            tracing::debug!("Type {} has no source glob", schema.type_name);
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for path in self.matching_files(pattern)? {
            match self.load_file(schema, &path).await {
                Ok(found) => records.extend(found),
                Err(e) => tracing::warn!("Skipping {}: {}", path.display(), e),
            }
        }

        tracing::debug!("Loaded {} {} records", records.len(), schema.type_name);
        Ok(records)
    }

    /// Types load concurrently; results are reassembled in registry order
    async fn load_all(&self, registry: &SchemaRegistry) -> SourceResult<Vec<RawRecord>> {
        let mut tasks = JoinSet::new();
        for (i, schema) in registry.iter().enumerate() {
            let source = self.clone();
            let schema = schema.clone();
            tasks.spawn(async move { (i, source.load(&schema).await) });
        }

        let mut batches = Vec::with_capacity(registry.len());
        while let Some(joined) = tasks.join_next().await {
            let (i, loaded) = joined?;
            batches.push((i, loaded?));
        }
        batches.sort_by_key(|(i, _)| *i);

        Ok(batches.into_iter().flat_map(|(_, records)| records).collect())
    }
}
