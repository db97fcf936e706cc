//! Pipeline stages in execution order.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One step of the fixed ETL pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    LoadConfig,
    ReadClients,
    ReadFinancials,
    Filter,
    Join,
    Rename,
    DropKey,
    Write,
}

impl Stage {
    /// All stages, in the order the pipeline runs them.
    pub const ALL: [Stage; 8] = [
        Stage::LoadConfig,
        Stage::ReadClients,
        Stage::ReadFinancials,
        Stage::Filter,
        Stage::Join,
        Stage::Rename,
        Stage::DropKey,
        Stage::Write,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::LoadConfig => "load_config",
            Stage::ReadClients => "read_clients",
            Stage::ReadFinancials => "read_financials",
            Stage::Filter => "filter",
            Stage::Join => "join",
            Stage::Rename => "rename",
            Stage::DropKey => "drop_key",
            Stage::Write => "write",
        }
    }

    /// Whether the stage produces a dataset whose rows can be counted.
    pub fn produces_rows(&self) -> bool {
        !matches!(self, Stage::LoadConfig | Stage::Write)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
