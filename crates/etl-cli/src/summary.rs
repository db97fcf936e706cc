use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use etl_cli::pipeline::PipelineReport;
use etl_common::column_value_string;

pub fn print_report(report: &PipelineReport) {
    println!("Output: {}", report.output_file.display());
    println!("Rows written: {}", report.rows);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Stage"),
        header_cell("Rows"),
        header_cell("Time"),
    ]);
    apply_table_style(&mut table);
    align_column(&mut table, 1, CellAlignment::Right);
    align_column(&mut table, 2, CellAlignment::Right);
    for stage in &report.stages {
        let rows = match stage.rows {
            Some(rows) => Cell::new(rows),
            None => dim_cell("-"),
        };
        table.add_row(vec![
            Cell::new(stage.stage.as_str()).fg(Color::Blue),
            rows,
            Cell::new(format!("{:.2?}", stage.duration)),
        ]);
    }
    println!("{table}");

    if let Some(preview) = &report.preview {
        print_preview(report, preview);
    }
}

fn print_preview(report: &PipelineReport, preview: &polars::prelude::DataFrame) {
    let mut table = Table::new();
    table.set_header(
        report
            .columns
            .iter()
            .map(|name| header_cell(name))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..preview.height() {
        let row: Vec<Cell> = report
            .columns
            .iter()
            .map(|name| Cell::new(column_value_string(preview, name, idx)))
            .collect();
        table.add_row(row);
    }
    println!();
    println!(
        "Preview ({} of {} rows):",
        preview.height(),
        report.rows
    );
    println!("{table}");
}

pub fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

pub fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

pub fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
