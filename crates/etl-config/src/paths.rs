//! Configuration and log directory resolution.

use std::path::PathBuf;

/// Environment variable for overriding the configuration directory.
pub const CONFIG_DIR_ENV_VAR: &str = "CLIENT_ETL_CONFIG_DIR";

/// Environment variable for overriding the log directory.
pub const LOG_DIR_ENV_VAR: &str = "CLIENT_ETL_LOG_DIR";

/// Get the configuration directory.
///
/// Resolution order:
/// 1. `CLIENT_ETL_CONFIG_DIR` environment variable
/// 2. `config/` directory relative to workspace root
pub fn default_config_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../config")
}

/// Get the log directory.
///
/// Resolution order:
/// 1. `CLIENT_ETL_LOG_DIR` environment variable
/// 2. `logs/` directory relative to workspace root
pub fn default_log_dir() -> PathBuf {
    if let Ok(dir) = std::env::var(LOG_DIR_ENV_VAR) {
        return PathBuf::from(dir);
    }
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../logs")
}
