use polars::prelude::DataFrame;
use tracing::{debug, warn};

use etl_common::has_column;
use etl_model::ColumnRename;

use crate::error::{Result, TransformError};

/// Applies `renames` in order and returns the renamed frame.
///
/// Entries missing either name are skipped, as are entries whose
/// original column does not exist. Renaming onto a name already present
/// in the frame is an error.
pub fn rename_columns(df: &DataFrame, renames: &[ColumnRename]) -> Result<DataFrame> {
    let mut renamed = df.clone();
    for entry in renames {
        let Some((from, to)) = entry.pair() else {
            debug!(?entry, "skipping incomplete rename entry");
            continue;
        };
        if from == to {
            continue;
        }
        if !has_column(&renamed, from) {
            warn!(from, to, "rename source column not found");
            continue;
        }
        if has_column(&renamed, to) {
            return Err(TransformError::RenameCollision {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        renamed
            .rename(from, to.into())
            .map_err(|e| TransformError::Rename {
                from: from.to_string(),
                to: to.to_string(),
                message: e.to_string(),
            })?;
        debug!(from, to, "column renamed");
    }
    Ok(renamed)
}

/// Removes `column` when the frame has it.
pub fn drop_column_if_present(df: &DataFrame, column: &str) -> Result<DataFrame> {
    if !has_column(df, column) {
        return Ok(df.clone());
    }
    df.drop(column).map_err(|e| TransformError::Drop {
        column: column.to_string(),
        message: e.to_string(),
    })
}
