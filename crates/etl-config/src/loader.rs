use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::{ConfigError, Result};
use crate::paths::default_config_dir;
use crate::types::{ColumnRenameConfig, ColumnSelectionConfig, LoggingSettings};

/// The configuration documents the job knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigDocument {
    ColumnSelection,
    ColumnRename,
    Logging,
}

impl ConfigDocument {
    pub fn file_name(&self) -> &'static str {
        match self {
            ConfigDocument::ColumnSelection => "column_selection_config.yaml",
            ConfigDocument::ColumnRename => "column_rename_config.yaml",
            ConfigDocument::Logging => "logging_config.yaml",
        }
    }
}

/// Reads configuration documents from one directory.
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    dir: PathBuf,
}

impl ConfigLoader {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Loader rooted at [`default_config_dir`].
    pub fn from_default_dir() -> Self {
        Self::new(default_config_dir())
    }

    /// Uses `explicit` when given, otherwise the default directory.
    pub fn resolve(explicit: Option<&Path>) -> Self {
        match explicit {
            Some(dir) => Self::new(dir),
            None => Self::from_default_dir(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, document: ConfigDocument) -> PathBuf {
        self.dir.join(document.file_name())
    }

    /// Reads and deserializes one document.
    ///
    /// An empty file is read as an empty mapping.
    pub fn load<T: DeserializeOwned>(&self, document: ConfigDocument) -> Result<T> {
        let path = self.path_for(document);
        let contents = fs::read_to_string(&path).map_err(|source| {
            if source.kind() == ErrorKind::NotFound {
                ConfigError::NotFound { path: path.clone() }
            } else {
                ConfigError::Read {
                    path: path.clone(),
                    source,
                }
            }
        })?;
        let contents = if contents.trim().is_empty() {
            "{}"
        } else {
            contents.as_str()
        };
        let value = serde_yaml::from_str(contents)
            .map_err(|source| ConfigError::Parse { path: path.clone(), source })?;
        debug!(path = %path.display(), "configuration loaded");
        Ok(value)
    }

    pub fn load_column_selection(&self) -> Result<ColumnSelectionConfig> {
        self.load(ConfigDocument::ColumnSelection)
    }

    pub fn load_column_rename(&self) -> Result<ColumnRenameConfig> {
        self.load(ConfigDocument::ColumnRename)
    }

    pub fn load_logging(&self) -> Result<LoggingSettings> {
        let settings: LoggingSettings = self.load(ConfigDocument::Logging)?;
        settings
            .check()
            .map_err(|(field, message)| ConfigError::Invalid {
                path: self.path_for(ConfigDocument::Logging),
                field,
                message,
            })?;
        Ok(settings)
    }
}
