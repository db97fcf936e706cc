//! Configuration documents for the ETL job.
//!
//! Three YAML documents live in the configuration directory:
//!
//! - `column_selection_config.yaml`: per-dataset column allow-lists
//! - `column_rename_config.yaml`: ordered `original_name -> new_name` pairs
//! - `logging_config.yaml`: log line template, timestamp format and file rotation
//!
//! Documents are read fresh on every call; nothing is cached.

mod error;
mod layout;
mod loader;
mod paths;
mod types;

pub use error::{ConfigError, Result};
pub use layout::{LayoutError, LineField, LineTemplate, LogLayout, Padding, Segment};
pub use loader::{ConfigDocument, ConfigLoader};
pub use paths::{CONFIG_DIR_ENV_VAR, LOG_DIR_ENV_VAR, default_config_dir, default_log_dir};
pub use types::{
    ColumnRenameConfig, ColumnSelectionConfig, DEFAULT_LOGS_FORMATTER, FileHandlerSettings,
    FileMode, LogLevel, LoggingSettings,
};
