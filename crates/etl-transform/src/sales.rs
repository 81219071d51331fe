//! Sales filtering and order derivations.
//!
//! A sales row survives iff its customer identifier references a customer
//! that itself survived filtering, its quantity is at least 1, and its order
//! date and order id are present. Survivors get:
//!
//! - `total_value` = quantity × price, missing when price is not numeric
//! - `order_type` = "High-Value Order" when total value exceeds 1000, else "Regular Order"

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NamedFrom, NewChunkedArray, Series};
use tracing::info;

use etl_common::{any_to_datetime, any_to_f64, any_to_i64};
use etl_model::{OrderType, columns};

use crate::error::Result;
use crate::frame_utils::{column_values, datetime_series, retain};

/// Order total; missing when either factor is missing.
pub fn order_total(quantity: Option<f64>, price: Option<f64>) -> Option<f64> {
    Some(quantity? * price?)
}

/// Filters `sales` against the already filtered `customers` and derives order fields.
pub fn filter_sales(sales: &DataFrame, customers: &DataFrame) -> Result<DataFrame> {
    let known: HashSet<i64> = column_values(customers, columns::CUSTOMER_ID, any_to_i64)?
        .into_iter()
        .flatten()
        .collect();

    let customer_ids = column_values(sales, columns::CUSTOMER_ID, any_to_i64)?;
    let order_ids = column_values(sales, columns::ORDER_ID, any_to_i64)?;
    let order_dates = column_values(sales, columns::ORDER_DATE, any_to_datetime)?;
    let quantities = column_values(sales, columns::QUANTITY, any_to_f64)?;
    let prices = column_values(sales, columns::PRICE, any_to_f64)?;

    let mask: Vec<bool> = (0..sales.height())
        .map(|idx| {
            customer_ids[idx].is_some_and(|id| known.contains(&id))
                && quantities[idx].is_some_and(|qty| qty >= 1.0)
                && order_dates[idx].is_some()
                && order_ids[idx].is_some()
        })
        .collect();

    let kept_quantities = retain(&quantities, &mask);
    let kept_prices = retain(&prices, &mask);
    let totals: Vec<Option<f64>> = kept_quantities
        .iter()
        .zip(&kept_prices)
        .map(|(qty, price)| order_total(*qty, *price))
        .collect();
    let order_types: Vec<&str> = totals
        .iter()
        .map(|total| OrderType::classify(*total).label())
        .collect();

    let predicate = BooleanChunked::from_slice("keep".into(), &mask);
    let mut filtered = sales.filter(&predicate)?;
    filtered.with_column(Series::new(
        columns::CUSTOMER_ID.into(),
        retain(&customer_ids, &mask),
    ))?;
    filtered.with_column(Series::new(
        columns::ORDER_ID.into(),
        retain(&order_ids, &mask),
    ))?;
    filtered.with_column(datetime_series(
        columns::ORDER_DATE,
        &retain(&order_dates, &mask),
    )?)?;
    filtered.with_column(Series::new(columns::QUANTITY.into(), kept_quantities))?;
    filtered.with_column(Series::new(columns::PRICE.into(), kept_prices))?;
    filtered.with_column(Series::new(columns::TOTAL_VALUE.into(), totals))?;
    filtered.with_column(Series::new(columns::ORDER_TYPE.into(), order_types))?;

    info!(
        input = sales.height(),
        kept = filtered.height(),
        dropped = sales.height() - filtered.height(),
        "sales filtered"
    );
    Ok(filtered)
}
