//! Customer filtering and tenure derivation.
//!
//! A customer survives iff both its identifier and its signup date are
//! present. Survivors get `customer_tenure`, the whole days between signup and
//! the run time, and a non-null `Int64` identifier.

use chrono::NaiveDateTime;
use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};
use tracing::info;

use etl_common::{any_to_datetime, any_to_i64};
use etl_model::columns;

use crate::error::Result;
use crate::frame_utils::{column_values, datetime_series, retain};

/// Whole days from `signup` to `run_time`; a signup after `run_time` counts as 0.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use etl_transform::customer_tenure;
///
/// let signup = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap().and_hms_opt(0, 0, 0).unwrap();
/// let now = NaiveDate::from_ymd_opt(2024, 1, 31).unwrap().and_hms_opt(18, 0, 0).unwrap();
/// assert_eq!(customer_tenure(signup, now), 30);
/// assert_eq!(customer_tenure(now, signup), 0);
/// ```
pub fn customer_tenure(signup: NaiveDateTime, run_time: NaiveDateTime) -> i64 {
    (run_time - signup).num_days().max(0)
}

/// Drops customers without identifier or signup date and derives tenure.
pub fn filter_customers(df: &DataFrame, run_time: NaiveDateTime) -> Result<DataFrame> {
    let ids = column_values(df, columns::CUSTOMER_ID, any_to_i64)?;
    let signups = column_values(df, columns::SIGNUP_DATE, any_to_datetime)?;

    let mask: Vec<bool> = ids
        .iter()
        .zip(&signups)
        .map(|(id, signup)| id.is_some() && signup.is_some())
        .collect();

    let kept_ids = retain(&ids, &mask);
    let kept_signups = retain(&signups, &mask);
    let tenure: Vec<Option<i64>> = kept_signups
        .iter()
        .map(|signup| signup.map(|at| customer_tenure(at, run_time)))
        .collect();

    let predicate = BooleanChunked::from_slice("keep".into(), &mask);
    let mut filtered = df.filter(&predicate)?;
    filtered.with_column(Series::new(columns::CUSTOMER_ID.into(), kept_ids))?;
    filtered.with_column(datetime_series(columns::SIGNUP_DATE, &kept_signups)?)?;
    filtered.with_column(Series::new(columns::CUSTOMER_TENURE.into(), tenure))?;

    info!(
        input = df.height(),
        kept = filtered.height(),
        dropped = df.height() - filtered.height(),
        "customers filtered"
    );
    Ok(filtered)
}
