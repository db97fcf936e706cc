//! Client financials ETL CLI.

use std::io::{self, IsTerminal};

use anyhow::{Context, Result};
use clap::{ColorChoice, Parser};
use etl_cli::logging::{LogConfig, init_logging};
use etl_config::{ConfigLoader, default_log_dir};

mod cli;
mod commands;
mod summary;

use crate::cli::{Cli, Command};
use crate::commands::{run_etl, show_config};
use crate::summary::print_report;

fn main() {
    let cli = Cli::parse();
    cli.color.write_global();
    let config = ConfigLoader::resolve(cli.config_dir.as_deref());
    if let Err(error) = setup_logging(&cli, &config) {
        eprintln!("error: {error:#}");
        std::process::exit(1);
    }
    let exit_code = match &cli.command {
        Command::Run(args) => match run_etl(args, config) {
            Ok(report) => {
                print_report(&report);
                0
            }
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
        Command::Config => match show_config(&config) {
            Ok(()) => 0,
            Err(error) => {
                eprintln!("error: {error:#}");
                1
            }
        },
    };
    std::process::exit(exit_code);
}

/// Loads the logging document and installs the global subscriber.
fn setup_logging(cli: &Cli, config: &ConfigLoader) -> Result<()> {
    let settings = config
        .load_logging()
        .context("load logging configuration")?;
    let log_dir = cli.log_dir.clone().unwrap_or_else(default_log_dir);
    let with_ansi = match cli.color.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => io::stderr().is_terminal(),
    };
    let log_config = LogConfig::from_settings(&settings, &log_dir)
        .context("build logging configuration")?
        .with_ansi(with_ansi);
    init_logging(&log_config).context("initialize logging")?;
    Ok(())
}
