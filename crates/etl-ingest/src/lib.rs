//! Source ingestion for the sales ETL pipeline.
//!
//! This crate turns a configured source file into a standardized Polars
//! DataFrame:
//!
//! - **CSV Loading**: Read a delimited file, every column as text
//! - **Schema Validation**: Check the file carries its required columns
//! - **Standardization**: Coerce date and identifier columns, marking
//!   unparseable cells as missing instead of failing
//!
//! # Example
//!
//! ```ignore
//! use etl_ingest::load_source;
//! use etl_model::{SourceKind, load_config};
//!
//! let config = load_config(Path::new("config.json"))?;
//! let customers = load_source(&config, SourceKind::Customers)?;
//! println!("{} rows", customers.frame.height());
//! ```

mod csv;
mod error;
mod schema;
mod source;
mod standardize;

// === Error Types ===
pub use error::{IngestError, Result};

// === CSV Reading ===
pub use csv::read_csv_table;

// === Schema Validation ===
pub use schema::{SchemaReport, missing_columns, validate_columns};

// === Standardization ===
pub use standardize::{CoercionGap, CoercionReport, Standardized, standardize};

// === Source Loading ===
pub use source::{IngestedSource, load_source};
