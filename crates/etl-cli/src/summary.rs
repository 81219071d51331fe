use comfy_table::modifiers::{UTF8_ROUND_CORNERS, UTF8_SOLID_INNER_BORDERS};
use comfy_table::presets::{UTF8_FULL, UTF8_FULL_CONDENSED};
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use polars::prelude::{AnyValue, DataFrame};

use etl_common::any_to_string;
use etl_load::{LoadOutcome, TableLoadReport};
use etl_model::tables;

use etl_cli::pipeline::PipelineOutput;

use crate::commands::RunResult;

pub fn print_load_summary(result: &RunResult) {
    let Some(output) = &result.output else {
        eprintln!("No data produced; nothing was loaded.");
        return;
    };
    print_coercion_note(output);

    let mut table = Table::new();
    table.set_header(vec![
        header_cell("Table"),
        header_cell("Key"),
        header_cell("Rows"),
        header_cell("Written"),
        header_cell("Batches"),
        header_cell("Outcome"),
    ]);
    apply_summary_table_style(&mut table);
    align_column(&mut table, 2, CellAlignment::Right);
    align_column(&mut table, 3, CellAlignment::Right);
    align_column(&mut table, 4, CellAlignment::Right);

    let mut total_rows = 0usize;
    let mut total_written = 0usize;
    for report in &result.reports {
        total_rows += report.input_rows;
        total_written += report.outcome.rows_written();
        table.add_row(vec![
            Cell::new(&report.table)
                .fg(Color::Blue)
                .add_attribute(Attribute::Bold),
            key_cell(report.key_column.as_deref()),
            Cell::new(report.input_rows),
            count_cell(report.outcome.rows_written()),
            batches_cell(&report.outcome),
            outcome_cell(&report.outcome),
        ]);
    }
    table.add_row(vec![
        Cell::new("TOTAL")
            .fg(Color::Cyan)
            .add_attribute(Attribute::Bold),
        dim_cell("-"),
        Cell::new(total_rows).add_attribute(Attribute::Bold),
        Cell::new(total_written).add_attribute(Attribute::Bold),
        dim_cell("-"),
        dim_cell("-"),
    ]);
    println!("{table}");

    let failures: Vec<&TableLoadReport> = result
        .reports
        .iter()
        .filter(|report| !report.succeeded())
        .collect();
    if !failures.is_empty() {
        eprintln!("Errors:");
        for report in failures {
            eprintln!("- {}: {}", report.table, report.outcome);
        }
    }
}

pub fn print_preview(output: &PipelineOutput, rows: usize) {
    print_coercion_note(output);
    let sections = [
        (tables::CUSTOMER_DATA, &output.tables.customers),
        (tables::SALES_DATA, &output.tables.sales),
        (tables::SALES_SUMMARY, &output.tables.summary),
    ];
    for (name, df) in sections {
        println!();
        println!(
            "{name}: {} rows (showing {})",
            df.height(),
            df.height().min(rows)
        );
        println!("{}", frame_table(df, rows));
    }
}

fn print_coercion_note(output: &PipelineOutput) {
    for (kind, report) in &output.coercion {
        for gap in &report.gaps {
            eprintln!(
                "note: {kind}.{}: {} values could not be parsed and were treated as missing",
                gap.column, gap.failures
            );
        }
    }
}

fn frame_table(df: &DataFrame, rows: usize) -> Table {
    let mut table = Table::new();
    table.set_header(
        df.get_column_names()
            .into_iter()
            .map(|name| header_cell(name.as_str()))
            .collect::<Vec<_>>(),
    );
    apply_table_style(&mut table);
    for idx in 0..df.height().min(rows) {
        let row = df
            .get_columns()
            .iter()
            .map(|column| match column.get(idx) {
                Ok(AnyValue::Null) | Err(_) => dim_cell("null"),
                Ok(value) => Cell::new(any_to_string(value)),
            })
            .collect::<Vec<_>>();
        table.add_row(row);
    }
    table
}

fn key_cell(key: Option<&str>) -> Cell {
    match key {
        Some(key) => Cell::new(key),
        None => dim_cell("replace"),
    }
}

fn batches_cell(outcome: &LoadOutcome) -> Cell {
    match outcome {
        LoadOutcome::Inserted { batches, .. } | LoadOutcome::Replaced { batches, .. } => {
            Cell::new(batches)
        }
        _ => dim_cell("-"),
    }
}

fn outcome_cell(outcome: &LoadOutcome) -> Cell {
    let cell = Cell::new(outcome.to_string());
    match outcome {
        LoadOutcome::Failed { .. } => cell.fg(Color::Red).add_attribute(Attribute::Bold),
        LoadOutcome::Inserted { .. } | LoadOutcome::Replaced { .. } => cell.fg(Color::Green),
        LoadOutcome::UpToDate | LoadOutcome::SkippedEmpty => cell.fg(Color::DarkGrey),
    }
}

fn count_cell(count: usize) -> Cell {
    if count > 0 {
        Cell::new(count).fg(Color::Green).add_attribute(Attribute::Bold)
    } else {
        dim_cell(count)
    }
}

fn apply_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_width(160);
}

fn apply_summary_table_style(table: &mut Table) {
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .apply_modifier(UTF8_SOLID_INNER_BORDERS)
        .set_content_arrangement(ContentArrangement::DynamicFullWidth)
        .set_width(120);
}

fn align_column(table: &mut Table, index: usize, alignment: CellAlignment) {
    if let Some(column) = table.column_mut(index) {
        column.set_cell_alignment(alignment);
    }
}

fn header_cell(label: &str) -> Cell {
    Cell::new(label)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell<T: ToString>(value: T) -> Cell {
    Cell::new(value).fg(Color::DarkGrey)
}
