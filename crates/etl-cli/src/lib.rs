//! Library half of the `client-etl` binary: logging setup and the
//! pipeline orchestrator.

pub mod logging;
pub mod pipeline;
