//! Integration tests for delta loading against in-memory SQLite.

use chrono::NaiveDate;
use polars::prelude::*;
use rusqlite::Connection;

use etl_load::{LoadError, LoadOutcome, load_outputs, load_table, load_table_report};
use etl_model::LoadTarget;
use etl_transform::transform;

fn orders(ids: &[i64]) -> DataFrame {
    let totals: Vec<f64> = ids.iter().map(|id| *id as f64 * 10.0).collect();
    DataFrame::new(vec![
        Column::new("order_id".into(), ids.to_vec()),
        Column::new("total_value".into(), totals),
    ])
    .unwrap()
}

fn row_count(conn: &Connection, table: &str) -> i64 {
    conn.query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| row.get(0))
        .unwrap()
}

#[test]
fn second_identical_load_inserts_nothing() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::sales();
    let df = orders(&[1, 2, 3]);

    let first = load_table(&mut conn, &df, &target, 1000).unwrap();
    let second = load_table(&mut conn, &df, &target, 1000).unwrap();

    assert_eq!(first, LoadOutcome::Inserted { rows: 3, batches: 1 });
    assert_eq!(second, LoadOutcome::UpToDate);
    assert_eq!(row_count(&conn, "sales_data"), 3);
}

#[test]
fn only_unseen_keys_are_appended() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::sales();

    load_table(&mut conn, &orders(&[1, 2]), &target, 1000).unwrap();
    let outcome = load_table(&mut conn, &orders(&[2, 3, 4]), &target, 1000).unwrap();

    assert_eq!(outcome.rows_written(), 2);
    assert_eq!(row_count(&conn, "sales_data"), 4);
}

#[test]
fn repeated_keys_keep_first_occurrence() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::sales();
    let df = orders(&[1, 2, 2, 3]);

    let first = load_table(&mut conn, &df, &target, 1000).unwrap();
    let second = load_table(&mut conn, &df, &target, 1000).unwrap();

    assert_eq!(first, LoadOutcome::Inserted { rows: 3, batches: 1 });
    assert_eq!(second, LoadOutcome::UpToDate);
    assert_eq!(row_count(&conn, "sales_data"), 3);
}

#[test]
fn failing_batch_rolls_back_earlier_batches() {
    let mut conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(
        "CREATE TABLE sales_data (order_id INTEGER PRIMARY KEY, total_value REAL CHECK (total_value < 25));
         INSERT INTO sales_data VALUES (100, 1.0);",
    )
    .unwrap();

    // Order 3 (total 30) violates the check in the third batch of one row each.
    let err = load_table(&mut conn, &orders(&[1, 2, 3]), &LoadTarget::sales(), 1).unwrap_err();

    assert!(matches!(err, LoadError::Database(_)));
    assert_eq!(row_count(&conn, "sales_data"), 1);
}

#[test]
fn replace_overwrites_previous_contents() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::summary();

    load_table(&mut conn, &orders(&[1, 2, 3]), &target, 2).unwrap();
    let outcome = load_table(&mut conn, &orders(&[9]), &target, 2).unwrap();

    assert_eq!(outcome, LoadOutcome::Replaced { rows: 1, batches: 1 });
    assert_eq!(row_count(&conn, "sales_summary"), 1);
}

#[test]
fn empty_summary_keeps_previous_contents() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::summary();
    load_table(&mut conn, &orders(&[1, 2]), &target, 10).unwrap();

    let outcome = load_table(&mut conn, &orders(&[]), &target, 10).unwrap();

    assert_eq!(outcome, LoadOutcome::SkippedEmpty);
    assert_eq!(row_count(&conn, "sales_summary"), 2);
}

#[test]
fn failed_replace_keeps_previous_contents() {
    let mut conn = Connection::open_in_memory().unwrap();
    let target = LoadTarget::summary();
    load_table(&mut conn, &orders(&[1, 2]), &target, 10).unwrap();

    // List columns have no SQLite mapping, so the replace fails after the drop.
    let tags = Series::new("tags".into(), [Series::new("".into(), ["a"])]);
    let unsupported = DataFrame::new(vec![tags.into()]).unwrap();
    let report = load_table_report(&mut conn, &unsupported, &target, 10);

    assert!(!report.succeeded());
    assert_eq!(row_count(&conn, "sales_summary"), 2);
}

#[test]
fn failure_in_one_table_does_not_block_the_others() {
    let mut conn = Connection::open_in_memory().unwrap();
    // An incompatible pre-existing sales table makes the insert fail.
    conn.execute_batch("CREATE TABLE sales_data (order_id INTEGER PRIMARY KEY)")
        .unwrap();

    let customers = DataFrame::new(vec![
        Column::new("customer_id".into(), vec![1i64]),
        Column::new("signup_date".into(), vec!["2024-01-01"]),
        Column::new("customer_name".into(), vec!["Ada"]),
        Column::new("email".into(), vec!["ada@example.com"]),
    ])
    .unwrap();
    let sales = DataFrame::new(vec![
        Column::new("order_id".into(), vec![10i64]),
        Column::new("customer_id".into(), vec![1i64]),
        Column::new("quantity".into(), vec!["2"]),
        Column::new("price".into(), vec!["600"]),
        Column::new("order_date".into(), vec!["2024-02-01"]),
        Column::new("product".into(), vec!["laptop"]),
    ])
    .unwrap();
    let run_time = NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap();
    let tables = transform(&customers, &sales, run_time).unwrap();

    let reports = load_outputs(&mut conn, &tables, 1000);

    let names: Vec<&str> = reports.iter().map(|report| report.table.as_str()).collect();
    assert_eq!(names, ["customer_data", "sales_data", "sales_summary"]);
    assert!(reports[0].succeeded());
    assert!(!reports[1].succeeded());
    assert!(reports[2].succeeded());
    assert_eq!(row_count(&conn, "customer_data"), 1);
    assert_eq!(row_count(&conn, "sales_data"), 0);
    assert_eq!(row_count(&conn, "sales_summary"), 1);

    let signup: String = conn
        .query_row("SELECT signup_date FROM customer_data", [], |row| row.get(0))
        .unwrap();
    assert_eq!(signup, "2024-01-01 00:00:00");
}
