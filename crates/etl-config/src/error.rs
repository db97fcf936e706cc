//! Error types for configuration loading.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while locating, reading or parsing a configuration document.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document does not exist in the configuration directory.
    #[error("configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// The document exists but could not be read.
    #[error("failed to read configuration file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or does not match the expected shape.
    #[error("failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The document parsed but carries an unusable value.
    #[error("invalid {field} in {path}: {message}")]
    Invalid {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::NotFound {
            path: PathBuf::from("config/column_rename_config.yaml"),
        };
        assert_eq!(
            err.to_string(),
            "configuration file not found: config/column_rename_config.yaml"
        );
    }
}
