//! Loading of pipeline outputs into SQLite.
//!
//! Keyed tables receive only rows whose key is not stored yet; unkeyed tables
//! are replaced wholesale. Each table load is one transaction, written in
//! bounded batches, and a failed table never blocks the others.

mod error;
pub mod loader;
pub mod outputs;
mod sql;

pub use error::{LoadError, Result};
pub use loader::{LoadOutcome, load_table};
pub use outputs::{TableLoadReport, load_outputs, load_table_report};
