//! CLI argument definitions for the client financials ETL job.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colorchoice_clap::Color;

#[derive(Parser)]
#[command(
    name = "client-etl",
    version,
    about = "Join client records with their financial details",
    long_about = "Filter client records by country, join them with financial records on `id`,\n\
                  rename columns per configuration and write the result as CSV."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding the YAML configuration documents.
    #[arg(long = "config-dir", value_name = "DIR", global = true)]
    pub config_dir: Option<PathBuf>,

    /// Directory the log file is written to.
    #[arg(long = "log-dir", value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the filter, join, rename and write pipeline.
    Run(RunArgs),

    /// Print the configuration documents as they will be applied.
    Config,
}

#[derive(Parser)]
pub struct RunArgs {
    /// CSV file with client records.
    #[arg(long = "clients-file", value_name = "PATH")]
    pub clients_file: PathBuf,

    /// CSV file with financial records.
    #[arg(long = "financials-file", value_name = "PATH")]
    pub financials_file: PathBuf,

    /// Where the joined CSV is written.
    #[arg(long = "output-file", value_name = "PATH")]
    pub output_file: PathBuf,

    /// Country codes of the clients to keep.
    #[arg(long = "countries", value_name = "CODE", num_args = 1..)]
    pub countries: Vec<String>,

    /// Do not count the rows produced by each stage.
    #[arg(long = "skip-row-counts")]
    pub skip_row_counts: bool,

    /// Number of result rows to print (0 disables the preview).
    #[arg(long = "preview-rows", value_name = "N", default_value_t = 20)]
    pub preview_rows: usize,
}
