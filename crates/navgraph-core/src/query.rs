//! Query types for finding nodes in the graph

use crate::error::Result;
use crate::limits;
use serde::{Deserialize, Serialize};

/// Match mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Regular expression over the selected field
    #[default]
    Regex,
    /// Exact (normalized) name match
    Exact,
    /// Fuzzy subsequence matching, ranked by score
    Fuzzy,
}

impl std::str::FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "regex" => Ok(Self::Regex),
            "exact" => Ok(Self::Exact),
            "fuzzy" => Ok(Self::Fuzzy),
            _ => Err(format!("unknown search mode: {}", s)),
        }
    }
}

/// What a pattern is matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchField {
    /// The node's display name
    #[default]
    Name,
    /// The one-line summary (type, name, attributes, counts)
    Summary,
}

/// Find query builder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FindQuery {
    /// Pattern to match
    pub pattern: String,

    #[serde(default)]
    pub mode: SearchMode,

    /// Restrict to one node type
    #[serde(default)]
    pub type_filter: Option<String>,

    /// Node types never returned
    #[serde(default)]
    pub exclude_types: Vec<String>,

    #[serde(default)]
    pub field: MatchField,

    #[serde(default = "default_case_insensitive")]
    pub case_insensitive: bool,

    /// Maximum number of results
    #[serde(default)]
    pub limit: Option<usize>,
}

fn default_case_insensitive() -> bool {
    true
}

impl FindQuery {
    pub fn new(pattern: impl Into<String>) -> Self {
        Self {
            pattern: pattern.into(),
            mode: SearchMode::default(),
            type_filter: None,
            exclude_types: Vec::new(),
            field: MatchField::default(),
            case_insensitive: default_case_insensitive(),
            limit: None,
        }
    }

    pub fn with_mode(mut self, mode: SearchMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_type(mut self, type_name: impl Into<String>) -> Self {
        self.type_filter = Some(type_name.into());
        self
    }

    pub fn exclude_types(mut self, types: Vec<String>) -> Self {
        self.exclude_types = types;
        self
    }

    pub fn match_summary(mut self) -> Self {
        self.field = MatchField::Summary;
        self
    }

    pub fn case_sensitive(mut self) -> Self {
        self.case_insensitive = false;
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Check pattern and type filter against input limits
    pub fn validate(&self) -> Result<()> {
        limits::validate_pattern(&self.pattern)?;
        if let Some(type_name) = &self.type_filter {
            limits::validate_type_name(type_name)?;
        }
        Ok(())
    }

    /// Whether a node type passes the type filter and exclusions
    pub fn accepts_type(&self, type_name: &str) -> bool {
        if let Some(wanted) = &self.type_filter {
            if wanted != type_name {
                return false;
            }
        }
        !self.exclude_types.iter().any(|t| t == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let query = FindQuery::new("case");
        assert_eq!(query.mode, SearchMode::Regex);
        assert_eq!(query.field, MatchField::Name);
        assert!(query.case_insensitive);
        assert!(query.limit.is_none());
    }

    #[test]
    fn test_accepts_type() {
        let query = FindQuery::new("x")
            .with_type("template")
            .exclude_types(vec!["image".into()]);
        assert!(query.accepts_type("template"));
        assert!(!query.accepts_type("formflow"));

        let query = FindQuery::new("x").exclude_types(vec!["image".into()]);
        assert!(query.accepts_type("formflow"));
        assert!(!query.accepts_type("image"));
    }

    #[test]
    fn test_validate() {
        assert!(FindQuery::new("^Close").with_type("formflow").validate().is_ok());
        assert!(FindQuery::new("").validate().is_err());
        assert!(FindQuery::new("x".repeat(2000)).validate().is_err());
        assert!(FindQuery::new("x").with_type("form flow").validate().is_err());
    }

    #[test]
    fn test_deserialize_defaults_case_insensitive() {
        let query: FindQuery = serde_json::from_str(r#"{"pattern": "^Close"}"#).unwrap();
        assert!(query.case_insensitive);
        assert_eq!("fuzzy".parse::<SearchMode>(), Ok(SearchMode::Fuzzy));
    }
}
