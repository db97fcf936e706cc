//! Shared utilities for the ETL crates.
//!
//! Small helpers over Polars `DataFrame` and `AnyValue` used by the
//! transform stage and the CLI preview.

pub mod polars;

pub use polars::{any_to_string, column_names, column_value_string, format_numeric, has_column};
