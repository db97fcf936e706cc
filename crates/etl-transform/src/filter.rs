use std::collections::BTreeSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};

use etl_common::{any_to_string, has_column};

use crate::error::{Result, TransformError};

/// Keeps the rows whose `column` value is one of `values`.
///
/// Values are compared in their text form, so `"1"` matches an integer
/// `1`. Nulls never match. An empty `values` list keeps no rows; the
/// schema and row order of `df` are preserved either way.
pub fn filter_by_membership(df: &DataFrame, column: &str, values: &[String]) -> Result<DataFrame> {
    if !has_column(df, column) {
        return Err(TransformError::FilterColumnMissing {
            column: column.to_string(),
        });
    }
    let filter_err = |message: String| TransformError::Filter {
        column: column.to_string(),
        message,
    };

    let wanted: BTreeSet<&str> = values.iter().map(String::as_str).collect();
    let source = df.column(column).map_err(|e| filter_err(e.to_string()))?;
    let mut keep = Vec::with_capacity(df.height());
    for idx in 0..df.height() {
        let value = source.get(idx).map_err(|e| filter_err(e.to_string()))?;
        keep.push(!value.is_null() && wanted.contains(any_to_string(value).as_str()));
    }

    let mask = BooleanChunked::from_slice(column.into(), &keep);
    df.filter(&mask).map_err(|e| filter_err(e.to_string()))
}
