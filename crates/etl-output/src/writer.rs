use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use polars::prelude::{CsvWriter, DataFrame, SerWriter};
use tracing::{debug, info, warn};

use crate::error::{OutputError, Result};

/// Suffix appended to the target file name while it is being written.
pub const PARTIAL_SUFFIX: &str = ".partial";

/// Temporary sibling of `path` that receives the data before the rename.
pub fn partial_path(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(OsString::from)
        .unwrap_or_default();
    name.push(PARTIAL_SUFFIX);
    path.with_file_name(name)
}

/// Writes `df` to `path` as comma-separated values with a header row.
///
/// Columns are written in frame order. The parent directory must exist.
/// An existing file at `path` is replaced only after the new contents
/// are complete.
pub fn write_dataset(df: &DataFrame, path: &Path) -> Result<()> {
    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    if !parent.is_dir() {
        return Err(OutputError::MissingDirectory {
            path: parent.to_path_buf(),
        });
    }

    let temp_path = partial_path(path);
    if let Err(err) = write_partial(df, &temp_path) {
        discard(&temp_path);
        return Err(err);
    }

    if let Err(source) = fs::rename(&temp_path, path) {
        discard(&temp_path);
        return Err(OutputError::Persist {
            path: path.to_path_buf(),
            source,
        });
    }

    info!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "dataset written"
    );
    Ok(())
}

fn write_partial(df: &DataFrame, temp_path: &Path) -> Result<()> {
    let mut file = File::create(temp_path).map_err(|source| OutputError::Create {
        path: temp_path.to_path_buf(),
        source,
    })?;
    // CsvWriter takes the frame mutably to rechunk it.
    let mut frame = df.clone();
    CsvWriter::new(&mut file)
        .include_header(true)
        .with_separator(b',')
        .finish(&mut frame)
        .map_err(|e| OutputError::Serialize {
            path: temp_path.to_path_buf(),
            message: e.to_string(),
        })?;
    file.sync_all().map_err(|source| OutputError::Create {
        path: temp_path.to_path_buf(),
        source,
    })?;
    debug!(path = %temp_path.display(), "partial output flushed");
    Ok(())
}

fn discard(temp_path: &Path) {
    if temp_path.exists() {
        if let Err(err) = fs::remove_file(temp_path) {
            warn!(path = %temp_path.display(), error = %err, "could not remove partial output");
        }
    }
}
