//! Application configuration
//!
//! Loaded from an optional YAML file; CLI flags override individual fields.
//!
//! ```yaml
//! port: 8080
//! page_size: 50
//! database: gallery.duckdb
//! visibility: visible-only
//! cors: true
//! ```

use crate::error::{Error, Result};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::store::Visibility;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Complete application configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    /// Port the HTTP server listens on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Records per gallery page
    #[serde(default = "default_page_size")]
    pub page_size: usize,

    /// DuckDB database file, or `:memory:`
    #[serde(default = "default_database")]
    pub database: String,

    /// Which generations the gallery lists
    #[serde(default)]
    pub visibility: Visibility,

    /// Allow cross-origin requests
    #[serde(default = "default_cors")]
    pub cors: bool,
}

fn default_port() -> u16 {
    8080
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_database() -> String {
    ":memory:".to_string()
}

fn default_cors() -> bool {
    true
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            page_size: default_page_size(),
            database: default_database(),
            visibility: Visibility::default(),
            cors: default_cors(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::FileNotFound {
                    path: path.display().to_string(),
                }
            } else {
                Error::config(format!(
                    "Failed to read config file '{}': {}",
                    path.display(),
                    e
                ))
            }
        })?;
        Self::from_yaml_str(&content)
    }

    /// Parse configuration from a YAML string
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check field constraints
    pub fn validate(&self) -> Result<()> {
        if self.page_size == 0 {
            return Err(Error::invalid_config("page_size", "must be at least 1"));
        }
        if self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_config(
                "page_size",
                format!("must be at most {MAX_PAGE_SIZE}"),
            ));
        }
        if self.database.trim().is_empty() {
            return Err(Error::invalid_config("database", "must not be empty"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.database, ":memory:");
        assert_eq!(config.visibility, Visibility::VisibleOnly);
        assert!(config.cors);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = AppConfig::from_yaml_str("page_size: 24\nvisibility: all\n").unwrap();
        assert_eq!(
            config,
            AppConfig {
                page_size: 24,
                visibility: Visibility::All,
                ..AppConfig::default()
            }
        );
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let err = AppConfig::from_yaml_str("page_size: 0").unwrap_err();
        assert!(err.to_string().contains("page_size"));
    }

    #[test]
    fn test_oversized_page_size_rejected() {
        let err = AppConfig::from_yaml_str("page_size: 18446744073709551615").unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidConfigValue { ref field, .. } if field == "page_size"
        ));

        let config = AppConfig {
            page_size: MAX_PAGE_SIZE,
            ..AppConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_field_rejected() {
        assert!(AppConfig::from_yaml_str("pagesize: 10").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port: 9000\ndatabase: gallery.duckdb\ncors: false").unwrap();

        let config = AppConfig::load(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.database, "gallery.duckdb");
        assert!(!config.cors);
    }

    #[test]
    fn test_load_missing_file() {
        let err = AppConfig::load("/nonexistent/gallery.yaml").unwrap_err();
        assert!(matches!(err, Error::FileNotFound { .. }));
    }
}
