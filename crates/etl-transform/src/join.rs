use polars::prelude::{
    DataFrame, IntoLazy, JoinArgs, JoinType, SortMultipleOptions, col,
};

use etl_common::has_column;

use crate::error::{JoinSide, Result, TransformError};

/// Temporary column used to restore the left input's row order.
const LEFT_ORDER_COLUMN: &str = "__etl_left_order";

/// Inner equality join of `left` and `right` on `key`.
///
/// The output holds the left columns followed by the right columns
/// without the right copy of `key`. Rows come out in left order, once
/// per matching right row; rows without a match on the other side are
/// dropped.
pub fn join_on_key(left: &DataFrame, right: &DataFrame, key: &str) -> Result<DataFrame> {
    for (side, frame) in [(JoinSide::Left, left), (JoinSide::Right, right)] {
        if !has_column(frame, key) {
            return Err(TransformError::JoinKeyMissing {
                key: key.to_string(),
                side,
            });
        }
    }
    let join_err = |message: String| TransformError::Join {
        key: key.to_string(),
        message,
    };

    let ordered = left
        .with_row_index(LEFT_ORDER_COLUMN.into(), None)
        .map_err(|e| join_err(e.to_string()))?;
    let joined = ordered
        .lazy()
        .join(
            right.clone().lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Inner),
        )
        .sort_by_exprs(
            [col(LEFT_ORDER_COLUMN)],
            SortMultipleOptions::default().with_maintain_order(true),
        )
        .collect()
        .map_err(|e| join_err(e.to_string()))?;

    joined
        .drop(LEFT_ORDER_COLUMN)
        .map_err(|e| join_err(e.to_string()))
}
