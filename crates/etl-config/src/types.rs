//! Typed views of the configuration documents.

use std::fmt;

use chrono::format::{Item, StrftimeItems};
use serde::{Deserialize, Serialize};

use etl_model::{ColumnRename, DatasetKind};

use crate::layout::{LayoutError, LogLayout};

/// Column allow-lists applied when the source files are read.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSelectionConfig {
    #[serde(default)]
    pub clients_columns: Vec<String>,
    #[serde(default)]
    pub financials_columns: Vec<String>,
}

impl ColumnSelectionConfig {
    /// Columns to keep for a dataset, or `None` to keep every column.
    ///
    /// An empty list means the same as an absent key.
    pub fn columns_for(&self, kind: DatasetKind) -> Option<&[String]> {
        let columns = match kind {
            DatasetKind::Clients => &self.clients_columns,
            DatasetKind::Financials => &self.financials_columns,
        };
        if columns.is_empty() {
            None
        } else {
            Some(columns.as_slice())
        }
    }
}

/// Ordered column renames applied to the joined dataset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRenameConfig {
    #[serde(default)]
    pub renamed_columns: Vec<ColumnRename>,
}

/// Minimum severity written to the sinks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    #[default]
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the log file is opened.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FileMode {
    #[default]
    #[serde(rename = "a", alias = "append")]
    Append,
    #[serde(rename = "w", alias = "write")]
    Truncate,
}

/// Size-based rotation of the log file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileHandlerSettings {
    #[serde(default)]
    pub mode: FileMode,
    /// Rotate once the file would grow past this many bytes (0 disables).
    #[serde(default)]
    pub max_bytes: u64,
    /// Number of rotated files kept next to the active one (0 disables).
    #[serde(default)]
    pub backup_count: u32,
}

impl FileHandlerSettings {
    pub fn rotation_enabled(&self) -> bool {
        self.max_bytes > 0 && self.backup_count > 0
    }

    /// Mode actually used to open the file.
    ///
    /// A size-limited file is always appended to, so rotated history is
    /// not lost by a restart.
    pub fn effective_mode(&self) -> FileMode {
        if self.max_bytes > 0 {
            FileMode::Append
        } else {
            self.mode
        }
    }
}

/// Line template used when none is configured.
pub const DEFAULT_LOGS_FORMATTER: &str = "%(asctime)s - %(name)s - %(levelname)s - %(message)s";

fn default_file_name() -> String {
    "client_etl.log".to_string()
}

/// Contents of `logging_config.yaml`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// Line template, or one of `full`, `compact` and `json`.
    pub logs_formatter: String,
    /// strftime pattern for timestamps, rendered in UTC.
    pub time_formatter: String,
    #[serde(default)]
    pub file_handler: FileHandlerSettings,
    #[serde(default)]
    pub level: LogLevel,
    #[serde(default = "default_file_name")]
    pub file_name: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            logs_formatter: DEFAULT_LOGS_FORMATTER.to_string(),
            time_formatter: "%Y-%m-%d %H:%M:%S".to_string(),
            file_handler: FileHandlerSettings::default(),
            level: LogLevel::default(),
            file_name: default_file_name(),
        }
    }
}

impl LoggingSettings {
    pub fn layout(&self) -> std::result::Result<LogLayout, LayoutError> {
        LogLayout::parse(&self.logs_formatter)
    }

    /// Checks the values serde cannot: the line layout, the timestamp
    /// pattern and the file name.
    pub(crate) fn check(&self) -> std::result::Result<(), (&'static str, String)> {
        self.layout()
            .map_err(|e| ("logs_formatter", e.to_string()))?;
        if self.time_formatter.trim().is_empty() {
            return Err(("time_formatter", "pattern is empty".to_string()));
        }
        if StrftimeItems::new(&self.time_formatter).any(|item| matches!(item, Item::Error)) {
            return Err((
                "time_formatter",
                format!("'{}' is not a valid strftime pattern", self.time_formatter),
            ));
        }
        let name = self.file_name.trim();
        if name.is_empty() || name.contains(['/', '\\']) {
            return Err((
                "file_name",
                format!("'{}' must be a plain file name", self.file_name),
            ));
        }
        Ok(())
    }
}
