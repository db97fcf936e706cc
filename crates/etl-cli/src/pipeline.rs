//! Client financials pipeline with explicit stages.
//!
//! The pipeline runs these stages in order:
//! 1. **LoadConfig**: Read the column selection and column rename documents
//! 2. **ReadClients** / **ReadFinancials**: Load both CSV files
//! 3. **Filter**: Keep clients from the requested countries
//! 4. **Join**: Inner join clients and financials on `id`
//! 5. **Rename**: Apply the configured column renames
//! 6. **DropKey**: Remove the `id` column if it is still present
//! 7. **Write**: Persist the result as CSV
//!
//! The first failure stops the run. It is logged once and returned as a
//! [`PipelineError`] tagged with the stage it happened in.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use polars::prelude::DataFrame;
use thiserror::Error;
use tracing::{error, info, info_span};

use etl_common::column_names;
use etl_config::{ConfigError, ConfigLoader};
use etl_ingest::{IngestError, read_dataset};
use etl_model::{COUNTRY_COLUMN, DatasetKind, JOIN_KEY, Stage};
use etl_output::{OutputError, write_dataset};
use etl_transform::{
    TransformError, drop_column_if_present, filter_by_membership, join_on_key, rename_columns,
};

/// Everything one run needs.
#[derive(Debug, Clone)]
pub struct PipelineInput {
    /// Source of the column selection and column rename documents.
    pub config: ConfigLoader,
    pub clients_file: PathBuf,
    pub financials_file: PathBuf,
    /// Country codes to keep. An empty list keeps no clients.
    pub countries: Vec<String>,
    pub output_file: PathBuf,
    /// Record and log the row count produced by each stage.
    pub record_row_counts: bool,
    /// Number of result rows kept for the preview (0 disables it).
    pub preview_rows: usize,
}

/// Timing (and optionally row count) of one completed stage.
#[derive(Debug, Clone)]
pub struct StageReport {
    pub stage: Stage,
    pub rows: Option<usize>,
    pub duration: Duration,
}

/// Outcome of a successful run.
#[derive(Debug)]
pub struct PipelineReport {
    pub stages: Vec<StageReport>,
    pub output_file: PathBuf,
    /// Columns of the written file, in order.
    pub columns: Vec<String>,
    pub rows: usize,
    /// First rows of the written dataset.
    pub preview: Option<DataFrame>,
}

#[derive(Debug, Error)]
#[error("pipeline failed at stage '{stage}'")]
pub struct PipelineError {
    pub stage: Stage,
    #[source]
    pub kind: PipelineErrorKind,
}

#[derive(Debug, Error)]
pub enum PipelineErrorKind {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Ingest(#[from] IngestError),

    #[error(transparent)]
    Transform(#[from] TransformError),

    #[error(transparent)]
    Output(#[from] OutputError),

    #[error("unexpected failure: {0}")]
    Unexpected(String),
}

/// Runs stages and records what they did.
struct StageRunner {
    record_row_counts: bool,
    stages: Vec<StageReport>,
}

impl StageRunner {
    fn new(record_row_counts: bool) -> Self {
        Self {
            record_row_counts,
            stages: Vec::with_capacity(Stage::ALL.len()),
        }
    }

    fn run<T>(
        &mut self,
        stage: Stage,
        work: impl FnOnce() -> Result<T, PipelineErrorKind>,
    ) -> Result<T, PipelineError> {
        let span = info_span!("stage", stage = %stage);
        let _guard = span.enter();
        let started = Instant::now();
        let outcome = panic::catch_unwind(AssertUnwindSafe(work))
            .unwrap_or_else(|payload| Err(PipelineErrorKind::Unexpected(panic_message(&*payload))));
        let duration = started.elapsed();
        match outcome {
            Ok(value) => {
                info!(elapsed_ms = duration.as_millis() as u64, "stage complete");
                self.stages.push(StageReport {
                    stage,
                    rows: None,
                    duration,
                });
                Ok(value)
            }
            Err(kind) => {
                error!(stage = %stage, error = %kind, "stage failed");
                Err(PipelineError { stage, kind })
            }
        }
    }

    fn run_frame(
        &mut self,
        stage: Stage,
        work: impl FnOnce() -> Result<DataFrame, PipelineErrorKind>,
    ) -> Result<DataFrame, PipelineError> {
        let df = self.run(stage, work)?;
        if self.record_row_counts && stage.produces_rows() {
            let rows = df.height();
            info!(stage = %stage, rows, "row count");
            if let Some(report) = self.stages.last_mut() {
                report.rows = Some(rows);
            }
        }
        Ok(df)
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "stage panicked".to_string()
    }
}

/// Runs the whole pipeline once.
///
/// Configuration documents are read fresh on every call. No output file
/// is produced unless every stage succeeds.
pub fn run_pipeline(input: &PipelineInput) -> Result<PipelineReport, PipelineError> {
    let pipeline_span = info_span!("pipeline", output = %input.output_file.display());
    let _pipeline_guard = pipeline_span.enter();
    info!(
        clients = %input.clients_file.display(),
        financials = %input.financials_file.display(),
        countries = ?input.countries,
        "pipeline started"
    );

    let mut runner = StageRunner::new(input.record_row_counts);

    let (selection, renames) = runner.run(Stage::LoadConfig, || {
        let selection = input.config.load_column_selection()?;
        let renames = input.config.load_column_rename()?;
        Ok((selection, renames))
    })?;

    let clients = runner.run_frame(Stage::ReadClients, || {
        let kind = DatasetKind::Clients;
        Ok(read_dataset(
            &input.clients_file,
            kind.label(),
            selection.columns_for(kind),
        )?)
    })?;
    let financials = runner.run_frame(Stage::ReadFinancials, || {
        let kind = DatasetKind::Financials;
        Ok(read_dataset(
            &input.financials_file,
            kind.label(),
            selection.columns_for(kind),
        )?)
    })?;

    let filtered = runner.run_frame(Stage::Filter, || {
        Ok(filter_by_membership(
            &clients,
            COUNTRY_COLUMN,
            &input.countries,
        )?)
    })?;
    let joined = runner.run_frame(Stage::Join, || {
        Ok(join_on_key(&filtered, &financials, JOIN_KEY)?)
    })?;
    let renamed = runner.run_frame(Stage::Rename, || {
        Ok(rename_columns(&joined, &renames.renamed_columns)?)
    })?;
    let result = runner.run_frame(Stage::DropKey, || {
        Ok(drop_column_if_present(&renamed, JOIN_KEY)?)
    })?;

    runner.run(Stage::Write, || {
        Ok(write_dataset(&result, &input.output_file)?)
    })?;

    let preview = (input.preview_rows > 0).then(|| result.head(Some(input.preview_rows)));
    info!(rows = result.height(), "pipeline finished");
    Ok(PipelineReport {
        stages: runner.stages,
        output_file: input.output_file.clone(),
        columns: column_names(&result),
        rows: result.height(),
        preview,
    })
}
