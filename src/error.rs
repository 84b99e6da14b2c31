//! Error types for the gallery pager
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//! Malformed client input is never an error: it is normalized before it
//! reaches anything that can fail.

use thiserror::Error;

/// The main error type for the gallery pager
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Store Errors
    // ============================================================================
    #[error("Store error: {message}")]
    Store { message: String },

    #[error("Database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("Invalid record '{id}': {message}")]
    InvalidRecord { id: String, message: String },

    // ============================================================================
    // Server Errors
    // ============================================================================
    #[error("Server error: {message}")]
    Server { message: String },

    // ============================================================================
    // I/O Errors
    // ============================================================================
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File not found: {path}")]
    FileNotFound { path: String },
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_config(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a store error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// Create an invalid record error
    pub fn invalid_record(id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidRecord {
            id: id.into(),
            message: message.into(),
        }
    }

    /// Create a server error
    pub fn server(message: impl Into<String>) -> Self {
        Self::Server {
            message: message.into(),
        }
    }
}

/// Result type alias for the gallery pager
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::invalid_config("page_size", "must be at least 1");
        assert_eq!(
            err.to_string(),
            "Invalid config value for 'page_size': must be at least 1"
        );

        let err = Error::store("connection refused");
        assert_eq!(err.to_string(), "Store error: connection refused");
    }

    #[test]
    fn test_invalid_record_display() {
        let err = Error::invalid_record("gen-0001", "width out of range: -1");
        assert_eq!(
            err.to_string(),
            "Invalid record 'gen-0001': width out of range: -1"
        );
    }
}
