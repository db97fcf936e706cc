//! Dataset ingestion.
//!
//! Reads a delimited text file with a header row into a Polars
//! `DataFrame`, inferring column types from content and optionally
//! projecting to an ordered column allow-list.
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use etl_ingest::read_dataset;
//!
//! let columns = vec!["id".to_string(), "country".to_string()];
//! let clients = read_dataset(Path::new("data/clients.csv"), "Clients", Some(&columns))?;
//! ```

mod error;
mod reader;

pub use error::{IngestError, Result};
pub use reader::{read_csv_headers, read_dataset, validate_encoding};
