//! Shared utilities for the sales ETL crates.
//!
//! This crate provides the cell-level conversions every stage relies on:
//! Polars `AnyValue` extraction and the coerce-or-missing parsers used for
//! identifiers, numbers and dates.

pub mod datetime;
pub mod polars;

// Re-export commonly used functions at crate root for convenience
pub use datetime::{any_to_datetime, datetime_to_millis, format_datetime, parse_datetime};
pub use polars::{
    any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64, parse_identifier,
};
