//! Loading the three pipeline outputs with per-table failure isolation.

use polars::prelude::DataFrame;
use rusqlite::Connection;
use tracing::{error, info_span};

use etl_model::LoadTarget;
use etl_transform::TransformedTables;

use crate::loader::{LoadOutcome, load_table};

/// Result of loading one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoadReport {
    pub table: String,
    /// Delta key, `None` for replaced tables.
    pub key_column: Option<String>,
    /// Rows in the frame handed to the loader.
    pub input_rows: usize,
    pub outcome: LoadOutcome,
}

impl TableLoadReport {
    pub fn succeeded(&self) -> bool {
        !self.outcome.is_failure()
    }
}

/// Loads one table, capturing a failure in the report instead of returning it.
pub fn load_table_report(
    conn: &mut Connection,
    df: &DataFrame,
    target: &LoadTarget,
    batch_size: usize,
) -> TableLoadReport {
    let span = info_span!("load", table = %target.table, rows = df.height());
    let _guard = span.enter();

    let outcome = load_table(conn, df, target, batch_size).unwrap_or_else(|err| {
        error!(table = %target.table, error = %err, "load failed, transaction rolled back");
        LoadOutcome::Failed {
            error: err.to_string(),
        }
    });
    TableLoadReport {
        table: target.table.clone(),
        key_column: target.key_column.clone(),
        input_rows: df.height(),
        outcome,
    }
}

/// Loads customers, sales and summary, in that order.
///
/// A failed table does not stop the remaining ones; every table gets a report.
pub fn load_outputs(
    conn: &mut Connection,
    tables: &TransformedTables,
    batch_size: usize,
) -> Vec<TableLoadReport> {
    [
        (LoadTarget::customers(), &tables.customers),
        (LoadTarget::sales(), &tables.sales),
        (LoadTarget::summary(), &tables.summary),
    ]
    .iter()
    .map(|(target, df)| load_table_report(conn, df, target, batch_size))
    .collect()
}
