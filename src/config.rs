use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

// ---------------------------------------------------------------------------
// CatalogConfig – how to find one catalog
// ---------------------------------------------------------------------------

/// Settings for one catalog, read-only during ingestion.
///
/// JSON form (all keys but `path` optional):
///
/// ```json
/// {
///   "path": "data/galaxies",
///   "group": "/sample",
///   "position": ["x", "y", "z"],
///   "weight": "w",
///   "selection": "$3 > 0.5",
///   "label": "D"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Container directory.
    pub path: PathBuf,
    #[serde(default = "default_group")]
    pub group: String,
    /// Column names of x, y, z.
    #[serde(default = "default_position")]
    pub position: [String; 3],
    #[serde(default)]
    pub weight: Option<String>,
    /// Passed through to the caller; never evaluated by the loader.
    #[serde(default)]
    pub selection: Option<String>,
    /// Short name used in diagnostics.
    #[serde(default)]
    pub label: Option<String>,
}

fn default_group() -> String {
    "/".to_string()
}

fn default_position() -> [String; 3] {
    ["x", "y", "z"].map(str::to_string)
}

impl CatalogConfig {
    /// Catalog in the root group with position columns `x`, `y`, `z`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            group: default_group(),
            position: default_position(),
            weight: None,
            selection: None,
            label: None,
        }
    }

    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    pub fn with_position(mut self, position: [&str; 3]) -> Self {
        self.position = position.map(str::to_string);
        self
    }

    pub fn with_weight(mut self, weight: impl Into<String>) -> Self {
        self.weight = Some(weight.into());
        self
    }

    pub fn with_selection(mut self, selection: impl Into<String>) -> Self {
        self.selection = Some(selection.into());
        self
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Name for log messages: the label if set, else the path.
    pub fn display_name(&self) -> String {
        match &self.label {
            Some(label) => label.clone(),
            None => self.path.display().to_string(),
        }
    }

    /// Reject empty column names before touching the filesystem.
    pub fn validate(&self) -> Result<(), ConfigError> {
        const ROLES: [&str; 3] = ["x position", "y position", "z position"];
        for (name, role) in self.position.iter().zip(ROLES) {
            if name.is_empty() {
                return Err(ConfigError::EmptyColumnName {
                    path: self.path.clone(),
                    role,
                });
            }
        }
        if self.weight.as_deref() == Some("") {
            return Err(ConfigError::EmptyColumnName {
                path: self.path.clone(),
                role: "weight",
            });
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// RunConfig – a whole ingestion run
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    pub catalogs: Vec<CatalogConfig>,
    /// Worker threads for the parallel merge (0 = all cores).
    #[serde(default)]
    pub threads: usize,
}

impl RunConfig {
    /// Read and validate a JSON run configuration.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: RunConfig =
            serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalogs.is_empty() {
            return Err(ConfigError::NoCatalogs);
        }
        self.catalogs.iter().try_for_each(CatalogConfig::validate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn json_defaults() {
        let config: CatalogConfig = serde_json::from_str(r#"{ "path": "cat" }"#).unwrap();
        assert_eq!(config, CatalogConfig::new("cat"));
        assert_eq!(config.group, "/");
        assert_eq!(config.position, ["x", "y", "z"]);
        assert_eq!(config.display_name(), "cat");
    }

    #[test]
    fn json_full() {
        let config: CatalogConfig = serde_json::from_str(
            r#"{
                "path": "cat",
                "group": "/galaxies",
                "position": ["ra", "dec", "dist"],
                "weight": "w",
                "selection": "$1 > 0",
                "label": "D"
            }"#,
        )
        .unwrap();
        let expected = CatalogConfig::new("cat")
            .with_group("/galaxies")
            .with_position(["ra", "dec", "dist"])
            .with_weight("w")
            .with_selection("$1 > 0")
            .with_label("D");
        assert_eq!(config, expected);
        assert_eq!(config.display_name(), "D");
    }

    #[test]
    fn unknown_keys_rejected() {
        let result = serde_json::from_str::<CatalogConfig>(r#"{ "path": "cat", "pos": [] }"#);
        assert!(result.is_err());
    }

    #[test]
    fn empty_column_names_rejected() {
        let config = CatalogConfig::new("cat").with_position(["x", "", "z"]);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyColumnName { role: "y position", .. })
        ));
        let config = CatalogConfig::new("cat").with_weight("");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyColumnName { role: "weight", .. })
        ));
    }

    #[test]
    fn run_config_from_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("run.json");
        std::fs::write(
            &path,
            r#"{ "threads": 2, "catalogs": [{ "path": "a" }, { "path": "b", "weight": "w" }] }"#,
        )
        .unwrap();
        let run = RunConfig::from_file(&path).unwrap();
        assert_eq!(run.threads, 2);
        assert_eq!(run.catalogs.len(), 2);
        assert_eq!(run.catalogs[1].weight.as_deref(), Some("w"));
    }

    #[test]
    fn run_config_errors() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing.json");
        assert!(matches!(
            RunConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let bad = dir.path().join("bad.json");
        std::fs::write(&bad, "{ not json").unwrap();
        assert!(matches!(
            RunConfig::from_file(&bad),
            Err(ConfigError::Parse { .. })
        ));

        let empty = dir.path().join("empty.json");
        std::fs::write(&empty, r#"{ "catalogs": [] }"#).unwrap();
        assert!(matches!(
            RunConfig::from_file(&empty),
            Err(ConfigError::NoCatalogs)
        ));
    }
}
