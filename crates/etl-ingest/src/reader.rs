//! CSV file reading through the Polars CSV reader.

use std::fs::File;
use std::io::{ErrorKind, Read};
use std::path::Path;

use csv::ReaderBuilder;
use polars::prelude::{CsvReadOptions, DataFrame, SerReader};
use tracing::{debug, info};

use crate::error::{IngestError, Result};

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IngestError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IngestError::FileRead {
                path: path.to_path_buf(),
                source: e,
            }
        }
    })
}

/// Detect encoding and validate it's supported (UTF-8 only).
///
/// Checks for UTF-16 BOM markers which are not supported.
pub fn validate_encoding(path: &Path) -> Result<()> {
    let mut file = open(path)?;
    let mut buffer = [0u8; 2];
    let bytes_read = file.read(&mut buffer).map_err(|e| IngestError::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    if bytes_read == 2 {
        if buffer == [0xFF, 0xFE] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 LE",
            });
        }
        if buffer == [0xFE, 0xFF] {
            return Err(IngestError::UnsupportedEncoding {
                path: path.to_path_buf(),
                encoding: "UTF-16 BE",
            });
        }
    }
    Ok(())
}

/// Reads the header row of a CSV file.
pub fn read_csv_headers(path: &Path) -> Result<Vec<String>> {
    let file = open(path)?;
    let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
    let headers = reader.headers().map_err(|e| IngestError::CsvParse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })?;
    let columns: Vec<String> = headers
        .iter()
        .map(|value| value.trim_start_matches('\u{feff}').to_string())
        .collect();
    if columns.iter().all(|column| column.trim().is_empty()) {
        return Err(IngestError::EmptyCsv {
            path: path.to_path_buf(),
        });
    }
    Ok(columns)
}

/// Reads a CSV file into a `DataFrame`.
///
/// `description` labels the dataset in log lines. When `selected_columns`
/// is given, the result holds exactly those columns in that order; every
/// listed column must be present in the header row.
pub fn read_dataset(
    path: &Path,
    description: &str,
    selected_columns: Option<&[String]>,
) -> Result<DataFrame> {
    info!(dataset = %description, path = %path.display(), "reading dataset");

    validate_encoding(path)?;
    let headers = read_csv_headers(path)?;
    if let Some(columns) = selected_columns {
        if let Some(missing) = columns.iter().find(|column| !headers.contains(column)) {
            return Err(IngestError::ColumnNotFound {
                column: missing.clone(),
                path: path.to_path_buf(),
            });
        }
    }

    let df = CsvReadOptions::default()
        .with_has_header(true)
        // Column types are inferred from every row.
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let df = match selected_columns {
        Some(columns) => df.select(columns.iter().map(String::as_str))?,
        None => df,
    };
    debug!(
        dataset = %description,
        columns = df.width(),
        "dataset loaded"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content).unwrap();
        file
    }

    #[test]
    fn test_read_headers() {
        let file = create_temp_csv(b"id,country,email\n1,PL,a@x.pl\n");
        let headers = read_csv_headers(file.path()).unwrap();
        assert_eq!(headers, vec!["id", "country", "email"]);
    }

    #[test]
    fn test_read_headers_with_bom() {
        let file = create_temp_csv("\u{feff}id,country\n1,PL\n".as_bytes());
        let headers = read_csv_headers(file.path()).unwrap();
        assert_eq!(headers, vec!["id", "country"]);
    }

    #[test]
    fn test_read_headers_empty_file() {
        let file = create_temp_csv(b"");
        let result = read_csv_headers(file.path());
        assert!(matches!(result, Err(IngestError::EmptyCsv { .. })));
    }

    #[test]
    fn test_rejects_utf16() {
        let file = create_temp_csv(&[0xFF, 0xFE, b'i', 0, b'd', 0]);
        let result = validate_encoding(file.path());
        assert!(matches!(
            result,
            Err(IngestError::UnsupportedEncoding {
                encoding: "UTF-16 LE",
                ..
            })
        ));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = validate_encoding(&dir.path().join("absent.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
