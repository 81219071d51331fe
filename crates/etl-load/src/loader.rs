//! Delta and full-replace loading of one frame into one table.
//!
//! Per call, a table load is in exactly one of these states:
//!
//! - **empty input**: nothing to write, the store is not touched
//! - **keyed**: rows whose key is not yet in the table are inserted
//! - **unkeyed**: the table is dropped, recreated and refilled
//!
//! Writes happen inside a single `rusqlite::Transaction` that is committed
//! only after every batch succeeded. Any error drops the transaction, which
//! rolls back everything written by the attempt.

use std::collections::HashSet;
use std::fmt;

use polars::prelude::DataFrame;
use rusqlite::types::Value;
use rusqlite::{Connection, OptionalExtension, Transaction, params, params_from_iter};
use tracing::{debug, info, warn};

use etl_model::LoadTarget;

use crate::error::Result;
use crate::sql::{
    column_sql_values, create_table_sql, insert_sql, key_text, quote_ident, rows_per_statement,
};

/// What a table load did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    /// Input had no rows.
    SkippedEmpty,
    /// Every keyed row already existed.
    UpToDate,
    /// New keyed rows were appended.
    Inserted { rows: usize, batches: usize },
    /// Table contents were replaced.
    Replaced { rows: usize, batches: usize },
    /// The load was rolled back.
    Failed { error: String },
}

impl LoadOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, LoadOutcome::Failed { .. })
    }

    /// Rows durably written by this load.
    pub fn rows_written(&self) -> usize {
        match self {
            LoadOutcome::Inserted { rows, .. } | LoadOutcome::Replaced { rows, .. } => *rows,
            _ => 0,
        }
    }
}

impl fmt::Display for LoadOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LoadOutcome::SkippedEmpty => f.write_str("skipped (no rows)"),
            LoadOutcome::UpToDate => f.write_str("up to date"),
            LoadOutcome::Inserted { rows, batches } => {
                write!(f, "inserted {rows} rows in {batches} batches")
            }
            LoadOutcome::Replaced { rows, batches } => {
                write!(f, "replaced with {rows} rows in {batches} batches")
            }
            LoadOutcome::Failed { error } => write!(f, "failed: {error}"),
        }
    }
}

/// Loads `df` into `target`, writing at most `batch_size` rows per batch.
///
/// # Errors
///
/// Returns the first database or conversion error. The transaction is rolled
/// back before the error reaches the caller, so the table is left as it was.
pub fn load_table(
    conn: &mut Connection,
    df: &DataFrame,
    target: &LoadTarget,
    batch_size: usize,
) -> Result<LoadOutcome> {
    if df.height() == 0 {
        info!(table = %target.table, "no rows to load");
        return Ok(LoadOutcome::SkippedEmpty);
    }
    let batch_size = batch_size.max(1);
    match target.key_column.as_deref() {
        Some(key) => load_delta(conn, df, &target.table, key, batch_size),
        None => replace_table(conn, df, &target.table, batch_size),
    }
}

fn load_delta(
    conn: &mut Connection,
    df: &DataFrame,
    table: &str,
    key: &str,
    batch_size: usize,
) -> Result<LoadOutcome> {
    let existing = existing_keys(conn, table, key)?;
    let keys = column_sql_values(df.column(key)?)?;

    let mut null_keys = 0usize;
    let mut repeated_keys = 0usize;
    let mut pending = HashSet::new();
    let mut delta = Vec::new();
    for (row, value) in keys.iter().enumerate() {
        let Some(text) = key_text(value) else {
            null_keys += 1;
            continue;
        };
        if existing.contains(&text) {
            continue;
        }
        // First occurrence of a key wins.
        if pending.insert(text) {
            delta.push(row);
        } else {
            repeated_keys += 1;
        }
    }
    if null_keys > 0 {
        warn!(table, key, rows = null_keys, "rows without key excluded from load");
    }
    if repeated_keys > 0 {
        warn!(table, key, rows = repeated_keys, "rows with repeated key excluded from load");
    }
    if delta.is_empty() {
        info!(table, existing = existing.len(), "no new rows");
        return Ok(LoadOutcome::UpToDate);
    }

    let tx = conn.transaction()?;
    tx.execute(&create_table_sql(table, df, Some(key), true)?, [])?;
    let batches = insert_rows(&tx, df, table, &delta, batch_size)?;
    tx.commit()?;

    info!(
        table,
        rows = delta.len(),
        batches,
        skipped = df.height() - delta.len() - null_keys - repeated_keys,
        "delta loaded"
    );
    Ok(LoadOutcome::Inserted {
        rows: delta.len(),
        batches,
    })
}

fn replace_table(
    conn: &mut Connection,
    df: &DataFrame,
    table: &str,
    batch_size: usize,
) -> Result<LoadOutcome> {
    let rows: Vec<usize> = (0..df.height()).collect();

    let tx = conn.transaction()?;
    tx.execute(&format!("DROP TABLE IF EXISTS {}", quote_ident(table)), [])?;
    tx.execute(&create_table_sql(table, df, None, false)?, [])?;
    let batches = insert_rows(&tx, df, table, &rows, batch_size)?;
    tx.commit()?;

    info!(table, rows = rows.len(), batches, "table replaced");
    Ok(LoadOutcome::Replaced {
        rows: rows.len(),
        batches,
    })
}

/// Key values already stored in `table`, empty when the table does not exist.
fn existing_keys(conn: &Connection, table: &str, key: &str) -> Result<HashSet<String>> {
    if !table_exists(conn, table)? {
        debug!(table, "target table does not exist yet");
        return Ok(HashSet::new());
    }
    let sql = format!("SELECT {} FROM {}", quote_ident(key), quote_ident(table));
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| row.get::<_, Value>(0))?;
    let mut keys = HashSet::new();
    for value in rows {
        if let Some(text) = key_text(&value?) {
            keys.insert(text);
        }
    }
    Ok(keys)
}

pub(crate) fn table_exists(conn: &Connection, table: &str) -> Result<bool> {
    let found = conn
        .query_row(
            "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
            params![table],
            |_| Ok(()),
        )
        .optional()?;
    Ok(found.is_some())
}

/// Inserts the selected rows in batches of `batch_size`; returns the batch count.
fn insert_rows(
    tx: &Transaction<'_>,
    df: &DataFrame,
    table: &str,
    rows: &[usize],
    batch_size: usize,
) -> Result<usize> {
    let names: Vec<&str> = df
        .get_columns()
        .iter()
        .map(|column| column.name().as_str())
        .collect();
    let mut cells = Vec::with_capacity(names.len());
    for column in df.get_columns() {
        cells.push(column_sql_values(column)?);
    }

    let per_statement = rows_per_statement(names.len(), batch_size);
    let mut batches = 0;
    for batch in rows.chunks(batch_size) {
        for chunk in batch.chunks(per_statement) {
            let sql = insert_sql(table, &names, chunk.len());
            let values = chunk
                .iter()
                .flat_map(|&row| cells.iter().map(move |column| &column[row]));
            tx.execute(&sql, params_from_iter(values))?;
        }
        batches += 1;
        debug!(table, batch = batches, rows = batch.len(), "batch written");
    }
    Ok(batches)
}
