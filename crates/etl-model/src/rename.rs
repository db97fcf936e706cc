use serde::{Deserialize, Serialize};

/// One `original_name -> new_name` entry of the column rename document.
///
/// Both fields are optional on the wire; incomplete entries are skipped
/// when the renames are applied.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnRename {
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub new_name: Option<String>,
}

impl ColumnRename {
    pub fn new(original_name: impl Into<String>, new_name: impl Into<String>) -> Self {
        Self {
            original_name: Some(original_name.into()),
            new_name: Some(new_name.into()),
        }
    }

    /// Returns both names when the entry is complete and non-empty.
    ///
    /// Names are used verbatim, surrounding whitespace included.
    pub fn pair(&self) -> Option<(&str, &str)> {
        let original = self.original_name.as_deref()?;
        let new = self.new_name.as_deref()?;
        if original.is_empty() || new.is_empty() {
            return None;
        }
        Some((original, new))
    }
}
