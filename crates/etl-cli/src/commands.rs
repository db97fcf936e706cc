use anyhow::{Context, Result};
use comfy_table::{Cell, Table};

use etl_cli::pipeline::{PipelineInput, PipelineReport, run_pipeline};
use etl_config::{ConfigDocument, ConfigLoader};
use etl_model::DatasetKind;

use crate::cli::RunArgs;
use crate::summary::{apply_table_style, dim_cell, header_cell};

pub fn run_etl(args: &RunArgs, config: ConfigLoader) -> Result<PipelineReport> {
    let input = PipelineInput {
        config,
        clients_file: args.clients_file.clone(),
        financials_file: args.financials_file.clone(),
        countries: args.countries.clone(),
        output_file: args.output_file.clone(),
        record_row_counts: !args.skip_row_counts,
        preview_rows: args.preview_rows,
    };
    let report = run_pipeline(&input)?;
    Ok(report)
}

pub fn show_config(config: &ConfigLoader) -> Result<()> {
    let selection = config
        .load_column_selection()
        .context("load column selection")?;
    let renames = config.load_column_rename().context("load column renames")?;
    let logging = config.load_logging().context("load logging settings")?;

    println!("Configuration: {}", config.dir().display());

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Dataset"),
        header_cell("Key"),
        header_cell("Columns"),
    ]);
    apply_table_style(&mut table);
    for kind in [DatasetKind::Clients, DatasetKind::Financials] {
        let columns = match selection.columns_for(kind) {
            Some(columns) => Cell::new(columns.join(", ")),
            None => dim_cell("(all columns)"),
        };
        table.add_row(vec![
            Cell::new(kind.label()),
            Cell::new(kind.selection_key()),
            columns,
        ]);
    }
    println!("{}", config.path_for(ConfigDocument::ColumnSelection).display());
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Original"), header_cell("New")]);
    apply_table_style(&mut table);
    for entry in &renames.renamed_columns {
        let cell = |name: &Option<String>| match name {
            Some(name) => Cell::new(name),
            None => dim_cell("-"),
        };
        table.add_row(vec![cell(&entry.original_name), cell(&entry.new_name)]);
    }
    println!("{}", config.path_for(ConfigDocument::ColumnRename).display());
    println!("{table}");

    let mut table = Table::new();
    table.set_header(vec![header_cell("Setting"), header_cell("Value")]);
    apply_table_style(&mut table);
    let handler = logging.file_handler;
    let rows = [
        ("logs_formatter", logging.logs_formatter.clone()),
        ("time_formatter", logging.time_formatter.clone()),
        ("level", logging.level.to_string()),
        ("file_name", logging.file_name.clone()),
        ("file_handler.mode", format!("{:?}", handler.effective_mode()).to_lowercase()),
        ("file_handler.max_bytes", handler.max_bytes.to_string()),
        ("file_handler.backup_count", handler.backup_count.to_string()),
    ];
    for (setting, value) in rows {
        table.add_row(vec![Cell::new(setting), Cell::new(value)]);
    }
    println!("{}", config.path_for(ConfigDocument::Logging).display());
    println!("{table}");
    Ok(())
}
