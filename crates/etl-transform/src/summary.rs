//! Per-product sales summary.

use std::collections::BTreeMap;

use polars::prelude::{Column, DataFrame};
use tracing::info;

use etl_common::{any_to_f64, any_to_i64, any_to_string};
use etl_model::columns;

use crate::error::Result;
use crate::frame_utils::column_values;

#[derive(Debug, Default, Clone, Copy)]
struct ProductTotals {
    total_sales: f64,
    order_count: i64,
}

impl ProductTotals {
    fn add(&mut self, total_value: Option<f64>, has_order: bool) {
        if let Some(value) = total_value {
            self.total_sales += value;
        }
        if has_order {
            self.order_count += 1;
        }
    }
}

/// Groups merged sales by product into `total_sales` and `order_count`.
///
/// Output is sorted by product name. Rows without a product form their own
/// group, emitted last, so the summary always reconciles with its input.
pub fn summarize_by_product(merged: &DataFrame) -> Result<DataFrame> {
    let products = column_values(merged, columns::PRODUCT, |value| {
        let text = any_to_string(value);
        (!text.is_empty()).then_some(text)
    })?;
    let totals = column_values(merged, columns::TOTAL_VALUE, any_to_f64)?;
    let order_ids = column_values(merged, columns::ORDER_ID, any_to_i64)?;

    let mut groups: BTreeMap<String, ProductTotals> = BTreeMap::new();
    let mut unnamed: Option<ProductTotals> = None;
    for ((product, total), order_id) in products.into_iter().zip(totals).zip(order_ids) {
        let entry = match product {
            Some(name) => groups.entry(name).or_default(),
            None => unnamed.get_or_insert_with(ProductTotals::default),
        };
        entry.add(total, order_id.is_some());
    }

    let mut names: Vec<Option<String>> = Vec::with_capacity(groups.len() + 1);
    let mut sales: Vec<f64> = Vec::with_capacity(groups.len() + 1);
    let mut counts: Vec<i64> = Vec::with_capacity(groups.len() + 1);
    let ordered = groups
        .into_iter()
        .map(|(name, totals)| (Some(name), totals))
        .chain(unnamed.map(|totals| (None, totals)));
    for (name, totals) in ordered {
        names.push(name);
        sales.push(totals.total_sales);
        counts.push(totals.order_count);
    }

    let summary = DataFrame::new(vec![
        Column::new(columns::PRODUCT.into(), names),
        Column::new(columns::TOTAL_SALES.into(), sales),
        Column::new(columns::ORDER_COUNT.into(), counts),
    ])?;
    info!(
        input = merged.height(),
        products = summary.height(),
        "sales aggregated"
    );
    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    fn merged() -> DataFrame {
        DataFrame::new(vec![
            Column::new("order_id".into(), vec![1i64, 2, 3, 4, 5]),
            Column::new(
                "product".into(),
                vec![Some("widget"), Some("gadget"), Some("widget"), None, Some("gadget")],
            ),
            Column::new(
                "total_value".into(),
                vec![Some(10.0), Some(2.5), Some(30.0), Some(7.0), None],
            ),
        ])
        .unwrap()
    }

    #[test]
    fn sums_and_counts_per_product() {
        let summary = summarize_by_product(&merged()).unwrap();

        let products = summary.column("product").unwrap().str().unwrap();
        let totals = summary.column("total_sales").unwrap().f64().unwrap();
        let counts = summary.column("order_count").unwrap().i64().unwrap();

        assert_eq!(products.get(0), Some("gadget"));
        assert_eq!(totals.get(0), Some(2.5));
        assert_eq!(counts.get(0), Some(2));

        assert_eq!(products.get(1), Some("widget"));
        assert_eq!(totals.get(1), Some(40.0));
        assert_eq!(counts.get(1), Some(2));
    }

    #[test]
    fn missing_product_is_its_own_group_sorted_last() {
        let summary = summarize_by_product(&merged()).unwrap();

        assert_eq!(summary.height(), 3);
        let products = summary.column("product").unwrap().str().unwrap();
        assert_eq!(products.get(2), None);
        let totals = summary.column("total_sales").unwrap().f64().unwrap();
        assert_eq!(totals.get(2), Some(7.0));
    }

    #[test]
    fn totals_reconcile_with_input() {
        let summary = summarize_by_product(&merged()).unwrap();
        let counts = summary.column("order_count").unwrap().i64().unwrap();
        assert_eq!(counts.sum(), Some(5));
        let totals = summary.column("total_sales").unwrap().f64().unwrap();
        assert_eq!(totals.sum(), Some(49.5));
    }

    #[test]
    fn empty_input_gives_empty_summary() {
        let empty = merged().head(Some(0));
        let summary = summarize_by_product(&empty).unwrap();
        assert_eq!(summary.height(), 0);
        assert_eq!(summary.width(), 3);
    }
}
