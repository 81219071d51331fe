//! End-to-end tests for the transformation stages.

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use polars::prelude::*;
use proptest::prelude::*;

use etl_model::{HIGH_VALUE_THRESHOLD, OrderType};
use etl_transform::{customer_tenure, order_total, transform};

fn run_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 1)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

fn customers() -> DataFrame {
    DataFrame::new(vec![
        Column::new("customer_id".into(), vec![Some(1i64), Some(2)]),
        Column::new("signup_date".into(), vec![Some("2024-01-01"), None]),
        Column::new("customer_name".into(), vec!["Ada", "Bob"]),
        Column::new("email".into(), vec!["ada@example.com", "bob@example.com"]),
    ])
    .unwrap()
}

fn sales() -> DataFrame {
    DataFrame::new(vec![
        Column::new("order_id".into(), vec![Some(10i64), Some(11)]),
        Column::new("customer_id".into(), vec![Some(1i64), Some(2)]),
        Column::new("quantity".into(), vec!["2", "1"]),
        Column::new("price".into(), vec!["600", "5"]),
        Column::new("order_date".into(), vec!["2024-02-01", "2024-02-01"]),
        Column::new("product".into(), vec!["laptop", "pen"]),
    ])
    .unwrap()
}

#[test]
fn reference_example_flows_through_every_stage() {
    let tables = transform(&customers(), &sales(), run_time()).unwrap();

    assert_eq!(tables.customers.height(), 1);
    let tenure = tables.customers.column("customer_tenure").unwrap().i64().unwrap();
    assert_eq!(tenure.get(0), Some(60));

    assert_eq!(tables.sales.height(), 1);
    let orders = tables.sales.column("order_id").unwrap().i64().unwrap();
    assert_eq!(orders.get(0), Some(10));
    let totals = tables.sales.column("total_value").unwrap().f64().unwrap();
    assert_eq!(totals.get(0), Some(1200.0));
    let kinds = tables.sales.column("order_type").unwrap().str().unwrap();
    assert_eq!(kinds.get(0), Some("High-Value Order"));
    let names = tables.sales.column("customer_name").unwrap().str().unwrap();
    assert_eq!(names.get(0), Some("Ada"));

    assert_eq!(tables.summary.height(), 1);
    let products = tables.summary.column("product").unwrap().str().unwrap();
    assert_eq!(products.get(0), Some("laptop"));
    let sums = tables.summary.column("total_sales").unwrap().f64().unwrap();
    assert_eq!(sums.get(0), Some(1200.0));
    let counts = tables.summary.column("order_count").unwrap().i64().unwrap();
    assert_eq!(counts.get(0), Some(1));
}

#[test]
fn merged_sales_match_filtered_sales_row_for_row() {
    let sales = DataFrame::new(vec![
        Column::new("order_id".into(), vec![1i64, 2, 3]),
        Column::new("customer_id".into(), vec![1i64, 1, 1]),
        Column::new("quantity".into(), vec!["1", "3", "1"]),
        Column::new("price".into(), vec!["10", "400", "1000"]),
        Column::new("order_date".into(), vec!["2024-02-01", "2024-02-02", "2024-02-03"]),
        Column::new("product".into(), vec!["pen", "desk", "chair"]),
    ])
    .unwrap();

    let tables = transform(&customers(), &sales, run_time()).unwrap();

    assert_eq!(tables.sales.height(), 3);
    let kinds = tables.sales.column("order_type").unwrap().str().unwrap();
    assert_eq!(kinds.get(0), Some("Regular Order"));
    assert_eq!(kinds.get(1), Some("High-Value Order"));
    // Exactly at the threshold is not high value.
    assert_eq!(kinds.get(2), Some("Regular Order"));

    let counts = tables.summary.column("order_count").unwrap().i64().unwrap();
    assert_eq!(counts.sum(), Some(3));
}

#[test]
fn no_surviving_customers_means_no_sales() {
    let customers = DataFrame::new(vec![
        Column::new("customer_id".into(), vec![Some(1i64)]),
        Column::new("signup_date".into(), vec![None::<&str>]),
        Column::new("customer_name".into(), vec!["Ada"]),
        Column::new("email".into(), vec!["ada@example.com"]),
    ])
    .unwrap();

    let tables = transform(&customers, &sales(), run_time()).unwrap();

    assert_eq!(tables.customers.height(), 0);
    assert_eq!(tables.sales.height(), 0);
    assert_eq!(tables.summary.height(), 0);
}

proptest! {
    #[test]
    fn tenure_is_never_negative(offset_days in -10_000i64..10_000, extra_hours in 0i64..24) {
        let now = run_time();
        let signup = now - TimeDelta::days(offset_days) - TimeDelta::hours(extra_hours);
        let tenure = customer_tenure(signup, now);
        prop_assert!(tenure >= 0);
        if offset_days >= 0 {
            prop_assert_eq!(tenure, offset_days);
        }
    }

    #[test]
    fn classification_follows_threshold(quantity in 1u32..500, price in 0.0f64..10_000.0) {
        let total = order_total(Some(f64::from(quantity)), Some(price));
        let expected = if total.is_some_and(|value| value > HIGH_VALUE_THRESHOLD) {
            OrderType::HighValue
        } else {
            OrderType::Regular
        };
        prop_assert_eq!(OrderType::classify(total), expected);
    }

    #[test]
    fn missing_price_is_always_regular(quantity in 1u32..500) {
        let total = order_total(Some(f64::from(quantity)), None);
        prop_assert_eq!(OrderType::classify(total), OrderType::Regular);
    }
}
