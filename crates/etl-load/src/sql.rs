//! SQL text and value conversion for SQLite targets.

use polars::prelude::{AnyValue, Column, DataFrame, DataType};
use rusqlite::types::Value;

use etl_common::{any_to_datetime, format_datetime, format_numeric};

use crate::error::{LoadError, Result};

/// Upper bound on bound parameters per statement (`SQLITE_MAX_VARIABLE_NUMBER`).
pub(crate) const MAX_BOUND_PARAMETERS: usize = 32_766;

/// Quotes an identifier for use in SQL text.
pub(crate) fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// SQLite column type for a frame column type.
pub(crate) fn sql_type(column: &str, dtype: &DataType) -> Result<&'static str> {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Boolean => Ok("INTEGER"),
        DataType::Float32 | DataType::Float64 => Ok("REAL"),
        DataType::String | DataType::Date | DataType::Datetime(_, _) | DataType::Null => {
            Ok("TEXT")
        }
        other => Err(LoadError::UnsupportedColumnType {
            column: column.to_string(),
            dtype: other.clone(),
        }),
    }
}

/// `CREATE TABLE` statement matching the frame schema.
pub(crate) fn create_table_sql(
    table: &str,
    df: &DataFrame,
    key_column: Option<&str>,
    if_not_exists: bool,
) -> Result<String> {
    let mut definitions = Vec::with_capacity(df.width());
    for column in df.get_columns() {
        let name = column.name().as_str();
        let mut definition = format!("{} {}", quote_ident(name), sql_type(name, column.dtype())?);
        if key_column == Some(name) {
            definition.push_str(" PRIMARY KEY");
        }
        definitions.push(definition);
    }
    Ok(format!(
        "CREATE TABLE {}{} ({})",
        if if_not_exists { "IF NOT EXISTS " } else { "" },
        quote_ident(table),
        definitions.join(", ")
    ))
}

/// Multi-row `INSERT` with `rows` placeholder tuples.
pub(crate) fn insert_sql(table: &str, columns: &[&str], rows: usize) -> String {
    let names = columns
        .iter()
        .map(|name| quote_ident(name))
        .collect::<Vec<_>>()
        .join(", ");
    let tuple = format!("({})", vec!["?"; columns.len()].join(", "));
    let tuples = vec![tuple.as_str(); rows].join(", ");
    format!("INSERT INTO {} ({names}) VALUES {tuples}", quote_ident(table))
}

/// Rows per statement so that `batch_size` rows never exceed the parameter limit.
pub(crate) fn rows_per_statement(column_count: usize, batch_size: usize) -> usize {
    let by_params = MAX_BOUND_PARAMETERS / column_count.max(1);
    batch_size.min(by_params).max(1)
}

/// Converts a cell to an SQLite value.
///
/// Date and time cells are stored as `YYYY-MM-DD HH:MM:SS` text.
pub(crate) fn sql_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(v) => Value::Integer(i64::from(v)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Value::Real(v as f64), Value::Integer),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) if v.is_nan() => Value::Null,
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        temporal @ (AnyValue::Date(_) | AnyValue::Datetime(_, _, _)) => any_to_datetime(temporal)
            .map_or(Value::Null, |at| Value::Text(format_datetime(at))),
        other => Value::Text(other.to_string()),
    }
}

/// All cells of a column as SQLite values.
pub(crate) fn column_sql_values(column: &Column) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(sql_value(column.get(idx)?));
    }
    Ok(values)
}

/// Canonical text of a key value; `None` for null keys.
///
/// Keys read back from the store and keys taken from the frame compare
/// through this form.
pub(crate) fn key_text(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Blob(_) => None,
        Value::Integer(v) => Some(v.to_string()),
        Value::Real(v) => Some(format_numeric(*v)),
        Value::Text(s) => Some(s.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn quotes_embedded_quotes() {
        assert_eq!(quote_ident("sales"), "\"sales\"");
        assert_eq!(quote_ident("odd\"name"), "\"odd\"\"name\"");
    }

    #[test]
    fn create_statement_marks_primary_key() {
        let df = DataFrame::new(vec![
            Column::new("order_id".into(), vec![1i64]),
            Column::new("price".into(), vec![2.5f64]),
            Column::new("product".into(), vec!["pen"]),
        ])
        .unwrap();

        let sql = create_table_sql("sales_data", &df, Some("order_id"), true).unwrap();
        assert_eq!(
            sql,
            "CREATE TABLE IF NOT EXISTS \"sales_data\" (\"order_id\" INTEGER PRIMARY KEY, \
             \"price\" REAL, \"product\" TEXT)"
        );
    }

    #[test]
    fn insert_statement_has_one_tuple_per_row() {
        let sql = insert_sql("t", &["a", "b"], 2);
        assert_eq!(sql, "INSERT INTO \"t\" (\"a\", \"b\") VALUES (?, ?), (?, ?)");
    }

    #[test]
    fn statement_rows_respect_parameter_limit() {
        assert_eq!(rows_per_statement(3, 1000), 1000);
        assert_eq!(rows_per_statement(100, 1000), 327);
        assert_eq!(rows_per_statement(50_000, 1000), 1);
        assert_eq!(rows_per_statement(0, 10), 10);
    }

    #[test]
    fn datetimes_become_iso_text() {
        let millis = 1_706_745_600_000; // 2024-02-01 00:00:00
        let value = AnyValue::Datetime(millis, TimeUnit::Milliseconds, None);
        assert_eq!(
            sql_value(value),
            Value::Text("2024-02-01 00:00:00".to_string())
        );
    }

    #[test]
    fn booleans_and_nan_map_to_storage_classes() {
        assert_eq!(sql_value(AnyValue::Boolean(true)), Value::Integer(1));
        assert_eq!(sql_value(AnyValue::Float64(f64::NAN)), Value::Null);
        assert_eq!(sql_value(AnyValue::Null), Value::Null);
    }

    #[test]
    fn key_text_normalizes_numbers() {
        assert_eq!(key_text(&Value::Integer(7)), Some("7".to_string()));
        assert_eq!(key_text(&Value::Real(7.0)), Some("7".to_string()));
        assert_eq!(key_text(&Value::Real(-0.0)), key_text(&Value::Integer(0)));
        assert_eq!(key_text(&Value::Null), None);
    }

    #[test]
    fn unsupported_types_are_rejected() {
        let err = sql_type("tags", &DataType::List(Box::new(DataType::String))).unwrap_err();
        assert!(matches!(err, LoadError::UnsupportedColumnType { .. }));
    }
}
