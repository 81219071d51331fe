//! Sales ETL transformation stages.
//!
//! This crate provides the logic between ingestion and loading:
//!
//! - **customers**: customer filtering and tenure derivation
//! - **sales**: sales filtering, order total and order classification
//! - **merge**: left join of sales onto customer attributes
//! - **summary**: per-product aggregation
//! - **pipeline**: the stages chained in order

pub mod customers;
mod error;
mod frame_utils;
pub mod merge;
pub mod pipeline;
pub mod sales;
pub mod summary;

pub use customers::{customer_tenure, filter_customers};
pub use error::{Result, TransformError};
pub use merge::merge_customer_attributes;
pub use pipeline::{TransformedTables, transform};
pub use sales::{filter_sales, order_total};
pub use summary::summarize_by_product;
