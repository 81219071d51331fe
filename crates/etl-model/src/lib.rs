//! Data model for the sales ETL pipeline.
//!
//! Holds everything the stages agree on without doing any data work:
//! configuration, the per-run context, source/target naming and the order
//! classification rule.

pub mod config;
pub mod context;
pub mod error;
pub mod schema;

pub use config::{DEFAULT_BATCH_SIZE, LoadConfig, PipelineConfig, SourceConfig, load_config};
pub use context::PipelineContext;
pub use error::{ConfigError, Result};
pub use schema::{HIGH_VALUE_THRESHOLD, LoadTarget, OrderType, SourceKind, columns, tables};
