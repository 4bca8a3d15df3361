//! Entity type schemas and the registry that validates them
//!
//! A schema says where records of one type come from, how their source
//! fields map onto canonical names, which canonical fields reference other
//! nodes, and which regular expressions pull references out of free text.

use crate::error::SchemaError;
use crate::limits::{self, MAX_REGEX_SIZE};
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Capture group name that marks a match as ignorable rather than a reference
pub const IGNORE_CAPTURE: &str = "ignore";

/// Format of the files a type is loaded from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordFormat {
    #[default]
    Yaml,
    Json,
    /// Whole file is one free-text block
    Text,
}

/// A canonical field whose values identify other nodes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferenceField {
    /// Canonical field name
    pub field: String,

    /// Expected type of the referenced node
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,

    /// Draw the edge from the referenced node to this one
    #[serde(default)]
    pub reversed: bool,

    /// Drop the reference instead of keeping a dangling edge
    #[serde(default)]
    pub skip_unresolved: bool,
}

impl ReferenceField {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            target_type: None,
            reversed: false,
            skip_unresolved: false,
        }
    }

    pub fn targeting(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }

    pub fn reversed(mut self) -> Self {
        self.reversed = true;
        self
    }

    pub fn skip_unresolved(mut self) -> Self {
        self.skip_unresolved = true;
        self
    }
}

/// A named regular expression that infers references from free text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Matcher {
    /// Matcher name, used as the edge relation
    pub name: String,

    /// Regular expression with at least one named capture group
    pub pattern: String,

    /// Canonical field that collects the captured names
    pub field: String,

    /// Type of the node the captured name refers to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<String>,
}

impl Matcher {
    pub fn new(
        name: impl Into<String>,
        pattern: impl Into<String>,
        field: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            pattern: pattern.into(),
            field: field.into(),
            target_type: None,
        }
    }

    pub fn targeting(mut self, target_type: impl Into<String>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }
}

fn default_id_field() -> String {
    "id".to_string()
}

fn default_name_field() -> String {
    "name".to_string()
}

fn default_text_field() -> String {
    "text".to_string()
}

/// Description of one object type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityTypeSchema {
    /// Unique type name (e.g. "formflow")
    #[serde(rename = "name")]
    pub type_name: String,

    /// Glob of source files, relative to the data root
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(default)]
    pub format: RecordFormat,

    /// Canonical field holding the identifier
    #[serde(default = "default_id_field")]
    pub id_field: String,

    /// Canonical field holding the display name
    #[serde(default = "default_name_field")]
    pub name_field: String,

    /// Use the file stem when the name field is absent
    #[serde(default)]
    pub name_from_file: bool,

    /// Canonical field holding free text for matchers
    #[serde(default = "default_text_field")]
    pub text_field: String,

    /// Canonical field name -> source field name
    #[serde(default, rename = "fields")]
    pub field_map: BTreeMap<String, String>,

    #[serde(default, rename = "references")]
    pub reference_fields: Vec<ReferenceField>,

    #[serde(default)]
    pub matchers: Vec<Matcher>,

    /// Attributes shown in summaries (all when empty)
    #[serde(default)]
    pub display: Vec<String>,
}

impl EntityTypeSchema {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            source: None,
            format: RecordFormat::default(),
            id_field: default_id_field(),
            name_field: default_name_field(),
            name_from_file: false,
            text_field: default_text_field(),
            field_map: BTreeMap::new(),
            reference_fields: Vec::new(),
            matchers: Vec::new(),
            display: Vec::new(),
        }
    }

    pub fn with_source(mut self, source: impl Into<String>, format: RecordFormat) -> Self {
        self.source = Some(source.into());
        self.format = format;
        self
    }

    pub fn with_field(mut self, canonical: impl Into<String>, source: impl Into<String>) -> Self {
        self.field_map.insert(canonical.into(), source.into());
        self
    }

    pub fn with_reference(mut self, reference: ReferenceField) -> Self {
        self.reference_fields.push(reference);
        self
    }

    pub fn with_matcher(mut self, matcher: Matcher) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn with_display(mut self, fields: &[&str]) -> Self {
        self.display = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Source field mapped to a canonical field
    pub fn source_field(&self, canonical: &str) -> Option<&str> {
        self.field_map.get(canonical).map(String::as_str)
    }

    pub fn has_matchers(&self) -> bool {
        !self.matchers.is_empty()
    }
}

/// A matcher with its pattern compiled
#[derive(Debug, Clone)]
pub struct CompiledMatcher {
    pub name: String,
    pub field: String,
    pub target_type: Option<String>,
    pub regex: Regex,
}

impl CompiledMatcher {
    fn compile(type_name: &str, matcher: &Matcher) -> Result<Self, SchemaError> {
        let regex = RegexBuilder::new(&matcher.pattern)
            .multi_line(true)
            .size_limit(MAX_REGEX_SIZE)
            .build()
            .map_err(|e| SchemaError::InvalidMatcher {
                type_name: type_name.to_string(),
                matcher: matcher.name.clone(),
                reason: e.to_string(),
            })?;

        if regex.capture_names().flatten().next().is_none() {
            return Err(SchemaError::MissingCapture {
                type_name: type_name.to_string(),
                matcher: matcher.name.clone(),
            });
        }

        Ok(Self {
            name: matcher.name.clone(),
            field: matcher.field.clone(),
            target_type: matcher.target_type.clone(),
            regex,
        })
    }
}

#[derive(Debug, Clone)]
struct TypeEntry {
    schema: EntityTypeSchema,
    matchers: Vec<CompiledMatcher>,
}

/// Validated set of schemas, indexed by type name
///
/// Declaration order is preserved; builds iterate types in that order.
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    entries: Vec<TypeEntry>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Validate and index a schema set, failing fast on the first problem
    pub fn new(schemas: Vec<EntityTypeSchema>) -> Result<Self, SchemaError> {
        let mut index = HashMap::with_capacity(schemas.len());
        for (i, schema) in schemas.iter().enumerate() {
            limits::validate_type_name(&schema.type_name)
                .map_err(|_| SchemaError::InvalidTypeName(schema.type_name.clone()))?;
            if index.insert(schema.type_name.clone(), i).is_some() {
                return Err(SchemaError::DuplicateType(schema.type_name.clone()));
            }
        }

        let mut entries = Vec::with_capacity(schemas.len());
        for schema in schemas {
            Self::check_fields(&schema, &index)?;
            let matchers = schema
                .matchers
                .iter()
                .map(|m| CompiledMatcher::compile(&schema.type_name, m))
                .collect::<Result<Vec<_>, _>>()?;
            entries.push(TypeEntry { schema, matchers });
        }

        tracing::debug!("Schema registry loaded {} types", entries.len());
        Ok(Self { entries, index })
    }

    fn check_fields(
        schema: &EntityTypeSchema,
        index: &HashMap<String, usize>,
    ) -> Result<(), SchemaError> {
        let unknown_field = |field: &str| SchemaError::UnknownField {
            type_name: schema.type_name.clone(),
            field: field.to_string(),
        };
        let unknown_target = |field: &str, target: &str| SchemaError::UnknownTargetType {
            type_name: schema.type_name.clone(),
            field: field.to_string(),
            target: target.to_string(),
        };

        for reference in &schema.reference_fields {
            if !schema.field_map.contains_key(&reference.field) {
                return Err(unknown_field(&reference.field));
            }
            if let Some(target) = &reference.target_type {
                if !index.contains_key(target) {
                    return Err(unknown_target(&reference.field, target));
                }
            }
        }

        if schema.has_matchers() && !schema.field_map.contains_key(&schema.text_field) {
            return Err(unknown_field(&schema.text_field));
        }
        for matcher in &schema.matchers {
            let reserved = [&schema.id_field, &schema.name_field, &schema.text_field];
            if schema.field_map.contains_key(&matcher.field)
                || reserved.iter().any(|f| **f == matcher.field)
            {
                return Err(SchemaError::FieldCollision {
                    type_name: schema.type_name.clone(),
                    matcher: matcher.name.clone(),
                    field: matcher.field.clone(),
                });
            }
            if let Some(target) = &matcher.target_type {
                if !index.contains_key(target) {
                    return Err(unknown_target(&matcher.field, target));
                }
            }
        }
        Ok(())
    }

    pub fn get(&self, type_name: &str) -> Option<&EntityTypeSchema> {
        self.index.get(type_name).map(|&i| &self.entries[i].schema)
    }

    pub fn contains(&self, type_name: &str) -> bool {
        self.index.contains_key(type_name)
    }

    /// Compiled matchers of a type, in declared order
    pub fn matchers(&self, type_name: &str) -> &[CompiledMatcher] {
        self.index
            .get(type_name)
            .map(|&i| self.entries[i].matchers.as_slice())
            .unwrap_or(&[])
    }

    /// Schemas in declaration order
    pub fn iter(&self) -> impl Iterator<Item = &EntityTypeSchema> {
        self.entries.iter().map(|e| &e.schema)
    }

    pub fn type_names(&self) -> Vec<&str> {
        self.iter().map(|s| s.type_name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formflow() -> EntityTypeSchema {
        EntityTypeSchema::new("formflow")
            .with_field("id", "VM_PK")
            .with_field("name", "VM_Name")
            .with_field("image", "VM_Image")
            .with_reference(ReferenceField::new("image").targeting("image"))
    }

    #[test]
    fn test_registry_indexes_types() {
        let registry =
            SchemaRegistry::new(vec![formflow(), EntityTypeSchema::new("image")]).unwrap();
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.type_names(), vec!["formflow", "image"]);
        assert_eq!(
            registry.get("formflow").and_then(|s| s.source_field("image")),
            Some("VM_Image")
        );
        assert!(registry.matchers("formflow").is_empty());
    }

    #[test]
    fn test_duplicate_type_rejected() {
        let err = SchemaRegistry::new(vec![
            EntityTypeSchema::new("image"),
            EntityTypeSchema::new("image"),
        ])
        .unwrap_err();
        assert_eq!(err, SchemaError::DuplicateType("image".into()));
    }

    #[test]
    fn test_unknown_target_type_rejected() {
        let err = SchemaRegistry::new(vec![formflow()]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownTargetType { target, .. } if target == "image"));
    }

    #[test]
    fn test_reference_field_must_be_mapped() {
        let schema = EntityTypeSchema::new("module").with_reference(ReferenceField::new("template"));
        let err = SchemaRegistry::new(vec![schema]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { field, .. } if field == "template"));
    }

    #[test]
    fn test_invalid_matcher_rejected() {
        let schema = EntityTypeSchema::new("test")
            .with_field("text", "body")
            .with_matcher(Matcher::new("broken", "I started (?P<formflow>.+", "formflows"));
        let err = SchemaRegistry::new(vec![schema]).unwrap_err();
        assert!(matches!(err, SchemaError::InvalidMatcher { matcher, .. } if matcher == "broken"));
    }

    #[test]
    fn test_matcher_needs_named_group() {
        let schema = EntityTypeSchema::new("test")
            .with_field("text", "body")
            .with_matcher(Matcher::new("plain", "I started activity (.+)", "formflows"));
        let err = SchemaRegistry::new(vec![schema]).unwrap_err();
        assert!(matches!(err, SchemaError::MissingCapture { .. }));
    }

    #[test]
    fn test_matchers_require_text_field() {
        let schema = EntityTypeSchema::new("test")
            .with_matcher(Matcher::new("start", "started (?P<name>.+)", "formflows"));
        let err = SchemaRegistry::new(vec![schema]).unwrap_err();
        assert!(matches!(err, SchemaError::UnknownField { field, .. } if field == "text"));
    }

    #[test]
    fn test_matcher_field_cannot_shadow_mapped_field() {
        let scenario = || {
            EntityTypeSchema::new("test")
                .with_field("name", "title")
                .with_field("text", "body")
                .with_field("owner", "owner")
        };

        for field in ["name", "owner", "text", "id"] {
            let schema = scenario().with_matcher(Matcher::new(
                "starts",
                r"I started activity (?P<formflow>.+)",
                field,
            ));
            let err = SchemaRegistry::new(vec![schema]).unwrap_err();
            assert!(
                matches!(&err, SchemaError::FieldCollision { field: f, matcher, .. } if f == field && matcher == "starts"),
                "{field}: {err}"
            );
        }

        let schema = scenario().with_matcher(Matcher::new(
            "starts",
            r"I started activity (?P<formflow>.+)",
            "formflows",
        ));
        assert!(SchemaRegistry::new(vec![schema]).is_ok());
    }

    #[test]
    fn test_invalid_type_name_rejected() {
        let err = SchemaRegistry::new(vec![EntityTypeSchema::new("form flow")]).unwrap_err();
        assert_eq!(err, SchemaError::InvalidTypeName("form flow".into()));
    }

    #[test]
    fn test_schema_deserializes_with_defaults() {
        let json = r#"{
            "name": "template",
            "source": "Templates/*.yaml",
            "fields": {"id": "VZ_PK", "name": "VZ_FormID"},
            "references": [{"field": "id"}]
        }"#;
        let schema: EntityTypeSchema = serde_json::from_str(json).unwrap();
        assert_eq!(schema.format, RecordFormat::Yaml);
        assert_eq!(schema.id_field, "id");
        assert_eq!(schema.text_field, "text");
        assert!(!schema.reference_fields[0].reversed);
    }
}
