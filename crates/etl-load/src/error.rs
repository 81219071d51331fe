//! Error types for loading.

use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Errors raised while loading a frame into the store.
///
/// Any of them aborts the current table load; the open transaction is
/// rolled back, so nothing from the attempt persists.
#[derive(Debug, Error)]
pub enum LoadError {
    /// SQLite rejected a statement or the transaction.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Column type with no SQLite storage class mapping.
    #[error("column '{column}' has unsupported type {dtype}")]
    UnsupportedColumnType { column: String, dtype: DataType },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for LoadError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, LoadError>;
