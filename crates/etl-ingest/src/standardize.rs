//! Type standardization with coerce-or-missing semantics.
//!
//! Date columns become `Datetime(ms)` and identifier columns become `Int64`.
//! A cell that cannot be coerced becomes missing and its row survives; the
//! record filter disqualifies it later. Every such cell is counted in a
//! [`CoercionReport`] so the gap is visible instead of silent.

use polars::prelude::*;
use tracing::{debug, warn};

use etl_common::{any_to_datetime, any_to_i64, datetime_to_millis};

use crate::error::{IngestError, Result};

/// Cells of one column that held a value but failed coercion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoercionGap {
    pub column: String,
    pub failures: usize,
}

/// Non-fatal coercion failures of one standardization pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CoercionReport {
    pub gaps: Vec<CoercionGap>,
}

impl CoercionReport {
    pub fn total_failures(&self) -> usize {
        self.gaps.iter().map(|gap| gap.failures).sum()
    }

    pub fn failures_for(&self, column: &str) -> usize {
        self.gaps
            .iter()
            .find(|gap| gap.column == column)
            .map_or(0, |gap| gap.failures)
    }

    fn record(&mut self, column: &str, failures: usize) {
        if failures == 0 {
            return;
        }
        warn!(column, failures, "values could not be coerced and were marked missing");
        self.gaps.push(CoercionGap {
            column: column.to_string(),
            failures,
        });
    }
}

/// A standardized table together with its coercion report.
#[derive(Debug, Clone)]
pub struct Standardized {
    pub frame: DataFrame,
    pub coercion: CoercionReport,
}

/// Coerces `date_columns` to datetimes and `id_columns` to integer identifiers.
///
/// # Errors
///
/// Fails only when a named column is absent from `df`; unparseable cells
/// never fail.
pub fn standardize(
    mut df: DataFrame,
    date_columns: &[&str],
    id_columns: &[&str],
) -> Result<Standardized> {
    let mut coercion = CoercionReport::default();

    for name in date_columns {
        let (series, failures) = coerce_column(&df, name, |value| {
            any_to_datetime(value).map(datetime_to_millis)
        })?;
        let series = series.cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        df.with_column(series)?;
        coercion.record(name, failures);
    }

    for name in id_columns {
        let (series, failures) = coerce_column(&df, name, any_to_i64)?;
        df.with_column(series)?;
        coercion.record(name, failures);
    }

    debug!(
        rows = df.height(),
        coercion_failures = coercion.total_failures(),
        "standardized"
    );
    Ok(Standardized {
        frame: df,
        coercion,
    })
}

/// Maps every cell of `name` through `coerce`, counting present cells that came back missing.
fn coerce_column<F>(df: &DataFrame, name: &str, coerce: F) -> Result<(Series, usize)>
where
    F: Fn(AnyValue<'_>) -> Option<i64>,
{
    let column = df
        .column(name)
        .map_err(|_| IngestError::ColumnNotFound {
            column: name.to_string(),
        })?;
    let series = column.as_materialized_series();

    let mut values: Vec<Option<i64>> = Vec::with_capacity(series.len());
    let mut failures = 0usize;
    for idx in 0..series.len() {
        let value = series.get(idx)?;
        let present = is_present(&value);
        let coerced = coerce(value);
        if present && coerced.is_none() {
            failures += 1;
        }
        values.push(coerced);
    }

    Ok((Series::new(name.into(), values), failures))
}

fn is_present(value: &AnyValue<'_>) -> bool {
    match value {
        AnyValue::Null => false,
        AnyValue::String(s) => !s.trim().is_empty(),
        AnyValue::StringOwned(s) => !s.trim().is_empty(),
        _ => true,
    }
}
