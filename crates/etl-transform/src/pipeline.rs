//! Filter, merge and aggregate chained in order.

use chrono::NaiveDateTime;
use polars::prelude::DataFrame;
use tracing::info_span;

use crate::customers::filter_customers;
use crate::error::Result;
use crate::merge::merge_customer_attributes;
use crate::sales::filter_sales;
use crate::summary::summarize_by_product;

/// The three output tables of one run.
#[derive(Debug, Clone)]
pub struct TransformedTables {
    /// Filtered customers with tenure.
    pub customers: DataFrame,
    /// Filtered sales with order fields and customer attributes.
    pub sales: DataFrame,
    /// One row per product.
    pub summary: DataFrame,
}

/// Runs the transformation stages on standardized source tables.
pub fn transform(
    customers: &DataFrame,
    sales: &DataFrame,
    run_time: NaiveDateTime,
) -> Result<TransformedTables> {
    let (customers, filtered_sales) = info_span!("filter").in_scope(|| -> Result<_> {
        let customers = filter_customers(customers, run_time)?;
        let sales = filter_sales(sales, &customers)?;
        Ok((customers, sales))
    })?;

    let sales = info_span!("merge")
        .in_scope(|| merge_customer_attributes(&filtered_sales, &customers))?;

    let summary = info_span!("aggregate").in_scope(|| summarize_by_product(&sales))?;

    Ok(TransformedTables {
        customers,
        sales,
        summary,
    })
}
