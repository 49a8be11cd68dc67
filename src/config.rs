//! YAML project configuration and name-list files.
//!
//! A project file lets a repository pin its diagram settings:
//!
//! ```yaml
//! source: sqlite
//! target: app.db
//! format: markdown
//! section: 2
//! exclude:
//!   - sqlite_*
//!   - schema_migrations
//! ```
//!
//! Command-line flags take precedence over scalar settings and extend the
//! include/exclude lists.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings read from `--config`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectConfig {
    /// Source kind: sqlite, postgres, duckdb, snapshot
    pub source: Option<String>,
    /// Database file, snapshot file, or connection URL
    pub target: Option<String>,
    /// Output format name
    pub format: Option<String>,
    /// User template file
    pub template: Option<PathBuf>,
    /// Render the foreign-key column in diagrams
    pub fk: Option<bool>,
    /// Maximum columns per diagram node
    pub truncate: Option<i64>,
    /// Heading level for document formats
    pub section: Option<i64>,
    pub include: Vec<String>,
    pub exclude: Vec<String>,
}

impl ProjectConfig {
    /// Load configuration from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            Error::config(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
            .map_err(|e| Error::config(format!("invalid config {}: {}", path.display(), e)))
    }

    fn parse(content: &str) -> std::result::Result<Self, serde_yaml_ng::Error> {
        // An empty document deserializes as null
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml_ng::from_str(content)
    }
}

/// Read one table name per line, skipping blank lines.
pub fn read_name_list(path: &Path) -> Result<Vec<String>> {
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!("cannot read name list {}: {}", path.display(), e))
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Flatten repeated `--include a,b --include c` values into names.
pub fn split_names<S: AsRef<str>>(values: &[S]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.as_ref().split(','))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let config = ProjectConfig::parse(
            r#"
source: duckdb
target: warehouse.duckdb
format: d2
fk: true
truncate: 8
section: 3
include:
  - orders
  - order_*
"#,
        )
        .unwrap();

        assert_eq!(config.source.as_deref(), Some("duckdb"));
        assert_eq!(config.target.as_deref(), Some("warehouse.duckdb"));
        assert_eq!(config.fk, Some(true));
        assert_eq!(config.truncate, Some(8));
        assert_eq!(config.section, Some(3));
        assert_eq!(config.include, vec!["orders", "order_*"]);
        assert!(config.exclude.is_empty());
    }

    #[test]
    fn test_empty_config() {
        assert_eq!(ProjectConfig::parse("").unwrap(), ProjectConfig::default());
        assert_eq!(
            ProjectConfig::parse("\n  \n").unwrap(),
            ProjectConfig::default()
        );
    }

    #[test]
    fn test_unknown_key_rejected() {
        assert!(ProjectConfig::parse("colour: blue\n").is_err());
    }

    #[test]
    fn test_load_reports_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.yaml");
        let err = ProjectConfig::load(&path).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("missing.yaml"));
    }

    #[test]
    fn test_read_name_list_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exclude.txt");
        fs::write(&path, "users\n\n  audit_*  \n\n").unwrap();

        assert_eq!(read_name_list(&path).unwrap(), vec!["users", "audit_*"]);
    }

    #[test]
    fn test_split_names() {
        let values = vec!["a,b".to_string(), " c ".to_string(), ",".to_string()];
        assert_eq!(split_names(&values), vec!["a", "b", "c"]);
        assert!(split_names::<&str>(&[]).is_empty());
    }
}
