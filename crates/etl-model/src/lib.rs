pub mod dataset;
pub mod rename;
pub mod stage;

pub use dataset::{COUNTRY_COLUMN, DatasetKind, JOIN_KEY};
pub use rename::ColumnRename;
pub use stage::Stage;
