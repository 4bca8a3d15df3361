//! CLI configuration

use std::path::{Path, PathBuf};

use navgraph_core::Depth;
use serde::{Deserialize, Serialize};

use crate::output::OutputFormat;

/// Default location of the config file
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("navgraph")
        .join("config.toml")
}

/// Persistent CLI defaults; command-line flags take precedence
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema file
    #[serde(skip_serializing_if = "Option::is_none")]
    pub schema: Option<PathBuf>,

    /// Data root that source globs are relative to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Default traversal depth ("all" or a number)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<String>,

    /// Types left out of find and traversal results
    pub ignore_types: Vec<String>,

    /// Default output format
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
}

impl Config {
    /// Load from `path`, falling back to defaults when missing or unreadable
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(_) => {
                tracing::debug!("No config file at {}", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                tracing::warn!("Ignoring invalid config file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn keys() -> &'static [&'static str] {
        &["schema", "root", "depth", "ignore_types", "format"]
    }

    pub fn get(&self, key: &str) -> Option<String> {
        let path = |p: &Option<PathBuf>| p.as_ref().map(|p| p.display().to_string());
        match key {
            "schema" => path(&self.schema),
            "root" => path(&self.root),
            "depth" => self.depth.clone(),
            "ignore_types" if self.ignore_types.is_empty() => None,
            "ignore_types" => Some(self.ignore_types.join(",")),
            "format" => self.format.clone(),
            _ => None,
        }
    }

    /// Set a key from its string form; `ignore_types` takes a comma list
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "schema" => self.schema = Some(PathBuf::from(value)),
            "root" => self.root = Some(PathBuf::from(value)),
            "depth" => {
                value.parse::<Depth>().map_err(anyhow::Error::msg)?;
                self.depth = Some(value.to_string());
            }
            "ignore_types" => {
                self.ignore_types = value
                    .split(',')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(String::from)
                    .collect();
            }
            "format" => {
                value.parse::<OutputFormat>().map_err(anyhow::Error::msg)?;
                self.format = Some(value.to_string());
            }
            _ => anyhow::bail!(
                "Unknown config key: {} (available: {})",
                key,
                Self::keys().join(", ")
            ),
        }
        Ok(())
    }

    /// Configured traversal depth, or the default of 1
    pub fn depth(&self) -> anyhow::Result<Depth> {
        match &self.depth {
            Some(depth) => depth.parse().map_err(anyhow::Error::msg),
            None => Ok(Depth::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_and_get() {
        let mut config = Config::default();
        config.set("depth", "all").unwrap();
        config.set("ignore_types", "image, metadata,").unwrap();
        config.set("format", "json").unwrap();

        assert_eq!(config.get("depth").as_deref(), Some("all"));
        assert_eq!(config.ignore_types, vec!["image", "metadata"]);
        assert_eq!(config.get("ignore_types").as_deref(), Some("image,metadata"));
        assert_eq!(config.depth().unwrap(), Depth::Unbounded);
        assert!(config.get("schema").is_none());
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut config = Config::default();
        assert!(config.set("depth", "deep").is_err());
        assert!(config.set("format", "xml").is_err());
        assert!(config.set("colour", "red").is_err());
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = Config::default();
        config.set("schema", "/data/schema.toml").unwrap();
        config.set("depth", "3").unwrap();
        config.save(&path).unwrap();

        let loaded = Config::load(&path);
        assert_eq!(loaded, config);
        assert_eq!(loaded.depth().unwrap(), Depth::Limited(3));
    }

    #[test]
    fn test_missing_or_invalid_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(Config::load(&dir.path().join("none.toml")), Config::default());

        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "depth = [").unwrap();
        assert_eq!(Config::load(&path), Config::default());
    }
}
