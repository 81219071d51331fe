//! DataFrame access helpers shared by the stages.

use chrono::NaiveDateTime;
use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series, TimeUnit};

use etl_common::datetime_to_millis;

use crate::error::{Result, TransformError};

/// Looks up a column, mapping absence to [`TransformError::ColumnNotFound`].
pub(crate) fn require_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Column> {
    df.column(name).map_err(|_| TransformError::ColumnNotFound {
        column: name.to_string(),
    })
}

/// Maps every cell of a column through `convert`.
pub(crate) fn column_values<T, F>(df: &DataFrame, name: &str, convert: F) -> Result<Vec<Option<T>>>
where
    F: Fn(AnyValue<'_>) -> Option<T>,
{
    let column = require_column(df, name)?;
    let mut values = Vec::with_capacity(column.len());
    for idx in 0..column.len() {
        values.push(convert(column.get(idx)?));
    }
    Ok(values)
}

/// Builds a `Datetime(ms)` series from timestamps.
pub(crate) fn datetime_series(name: &str, values: &[Option<NaiveDateTime>]) -> Result<Series> {
    let millis: Vec<Option<i64>> = values
        .iter()
        .map(|value| value.map(datetime_to_millis))
        .collect();
    Ok(Series::new(name.into(), millis)
        .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?)
}

/// Keeps the values whose mask entry is set.
pub(crate) fn retain<T: Clone>(values: &[T], mask: &[bool]) -> Vec<T> {
    values
        .iter()
        .zip(mask)
        .filter(|(_, keep)| **keep)
        .map(|(value, _)| value.clone())
        .collect()
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    #[test]
    fn datetime_series_keeps_missing_entries() {
        let at = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        let series = datetime_series("signup_date", &[Some(at), None]).unwrap();

        assert_eq!(
            series.dtype(),
            &DataType::Datetime(TimeUnit::Milliseconds, None)
        );
        assert_eq!(series.null_count(), 1);
        assert_eq!(
            series.get(0).unwrap(),
            AnyValue::Datetime(datetime_to_millis(at), TimeUnit::Milliseconds, None)
        );
    }
}
