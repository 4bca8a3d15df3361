//! Schema file loading
//!
//! A schema file is a list of `[[types]]` tables in TOML, or the same
//! shape in YAML or JSON, chosen by file extension.

use crate::error::{SourceError, SourceResult};
use navgraph_core::{EntityTypeSchema, SchemaRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// On-disk schema document
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub types: Vec<EntityTypeSchema>,
}

/// Serialization of a schema file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemaFormat {
    Toml,
    Yaml,
    Json,
}

impl SchemaFormat {
    /// Pick a format from the file extension; TOML when there is none
    pub fn from_path(path: &Path) -> SourceResult<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            None | Some("toml") => Ok(Self::Toml),
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some(other) => Err(SourceError::UnsupportedFormat(format!(
                "schema file extension '.{}'",
                other
            ))),
        }
    }
}

impl SchemaFile {
    pub fn parse(text: &str, format: SchemaFormat) -> SourceResult<Self> {
        let file = match format {
            SchemaFormat::Toml => toml::from_str(text)?,
            SchemaFormat::Yaml => serde_yaml::from_str(text)?,
            SchemaFormat::Json => serde_json::from_str(text)?,
        };
        Ok(file)
    }

    /// Validate into a registry
    pub fn into_registry(self) -> SourceResult<SchemaRegistry> {
        Ok(SchemaRegistry::new(self.types)?)
    }
}

/// Read, parse and validate a schema file
pub async fn load_schema(path: &Path) -> SourceResult<SchemaRegistry> {
    let format = SchemaFormat::from_path(path)?;
    let text = tokio::fs::read_to_string(path).await?;
    let registry = SchemaFile::parse(&text, format)?.into_registry()?;
    tracing::debug!(
        "Loaded {} types from schema {}",
        registry.len(),
        path.display()
    );
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use navgraph_core::{RecordFormat, SchemaError};

    const SCHEMA: &str = r#"
[[types]]
name = "formflow"
source = "flows/*.yaml"
display = ["entity"]

[types.fields]
id = "guid"
name = "title"
entity = "owner"
tasks = "tasks.template"

[[types.references]]
field = "tasks"
target_type = "template"

[[types.references]]
field = "entity"
target_type = "entity"
reversed = true

[[types]]
name = "template"
source = "templates/*.txt"
format = "text"
name_from_file = true

[types.fields]
name = "name"
text = "body"

[[types.matchers]]
name = "jump"
pattern = 'jump to (?P<formflow>[\w ]+)'
field = "jump"

[[types]]
name = "entity"
"#;

    #[test]
    fn test_parse_toml_schema() {
        let file = SchemaFile::parse(SCHEMA, SchemaFormat::Toml).unwrap();
        assert_eq!(file.types.len(), 3);

        let formflow = &file.types[0];
        assert_eq!(formflow.source.as_deref(), Some("flows/*.yaml"));
        assert_eq!(formflow.source_field("tasks"), Some("tasks.template"));
        assert!(formflow.reference_fields[1].reversed);
        assert_eq!(formflow.id_field, "id");

        let template = &file.types[1];
        assert_eq!(template.format, RecordFormat::Text);
        assert!(template.name_from_file);
        assert_eq!(template.matchers[0].name, "jump");

        let registry = file.into_registry().unwrap();
        assert_eq!(registry.type_names(), vec!["formflow", "template", "entity"]);
    }

    #[test]
    fn test_parse_yaml_schema() {
        let yaml = r#"
types:
  - name: image
    fields:
      id: guid
      name: title
"#;
        let registry = SchemaFile::parse(yaml, SchemaFormat::Yaml)
            .unwrap()
            .into_registry()
            .unwrap();
        assert_eq!(registry.get("image").unwrap().source_field("id"), Some("guid"));
    }

    #[test]
    fn test_invalid_schema_is_fatal() {
        let toml = r#"
[[types]]
name = "image"

[[types]]
name = "image"
"#;
        let err = SchemaFile::parse(toml, SchemaFormat::Toml)
            .unwrap()
            .into_registry()
            .unwrap_err();
        assert!(matches!(err, SourceError::Schema(SchemaError::DuplicateType(_))));
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(SchemaFormat::from_path(Path::new("s.toml")).unwrap(), SchemaFormat::Toml);
        assert_eq!(SchemaFormat::from_path(Path::new("s.yml")).unwrap(), SchemaFormat::Yaml);
        assert!(SchemaFormat::from_path(Path::new("s.ini")).is_err());
    }

    #[tokio::test]
    async fn test_load_schema_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("schema.toml");
        std::fs::write(&path, SCHEMA).unwrap();

        let registry = load_schema(&path).await.unwrap();
        assert_eq!(registry.len(), 3);
        assert_eq!(registry.matchers("template").len(), 1);
    }
}
