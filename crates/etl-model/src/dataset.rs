//! The two source datasets handled by the pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Column both datasets are joined on.
pub const JOIN_KEY: &str = "id";

/// Column of the clients dataset the country filter applies to.
pub const COUNTRY_COLUMN: &str = "country";

/// Source dataset read by the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    /// Client records (`id`, `country`, contact attributes).
    Clients,
    /// Financial records keyed by client `id`.
    Financials,
}

impl DatasetKind {
    /// Human-readable label used in log lines.
    pub fn label(&self) -> &'static str {
        match self {
            DatasetKind::Clients => "Clients",
            DatasetKind::Financials => "Financials",
        }
    }

    /// Key of the column allow-list in the column selection document.
    pub fn selection_key(&self) -> &'static str {
        match self {
            DatasetKind::Clients => "clients_columns",
            DatasetKind::Financials => "financials_columns",
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
