use std::fmt;

use thiserror::Error;

/// Side of a join a key was looked up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JoinSide {
    Left,
    Right,
}

impl fmt::Display for JoinSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JoinSide::Left => f.write_str("left"),
            JoinSide::Right => f.write_str("right"),
        }
    }
}

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("filter column '{column}' not found")]
    FilterColumnMissing { column: String },

    #[error("filter on '{column}' failed: {message}")]
    Filter { column: String, message: String },

    #[error("join key '{key}' not found in {side} dataset")]
    JoinKeyMissing { key: String, side: JoinSide },

    #[error("join on '{key}' failed: {message}")]
    Join { key: String, message: String },

    #[error("cannot rename '{from}' to '{to}': a column named '{to}' already exists")]
    RenameCollision { from: String, to: String },

    #[error("rename of '{from}' to '{to}' failed: {message}")]
    Rename {
        from: String,
        to: String,
        message: String,
    },

    #[error("dropping column '{column}' failed: {message}")]
    Drop { column: String, message: String },
}

pub type Result<T> = std::result::Result<T, TransformError>;
