//! Dataset transforms.
//!
//! Every operation borrows its input and returns a new `DataFrame`; the
//! heavy lifting (masking, the equality join, renames) is done by Polars.

pub mod error;
pub mod filter;
pub mod join;
pub mod rename;

pub use error::{JoinSide, Result, TransformError};
pub use filter::filter_by_membership;
pub use join::join_on_key;
pub use rename::{drop_column_if_present, rename_columns};
