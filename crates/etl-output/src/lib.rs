//! Output of the transformed dataset.
//!
//! Files are written through a sibling `.partial` file that is renamed
//! into place once the CSV has been fully serialized, so a failed run
//! never leaves a truncated result behind.

pub mod error;
pub mod writer;

pub use error::{OutputError, Result};
pub use writer::{PARTIAL_SUFFIX, partial_path, write_dataset};
