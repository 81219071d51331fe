use polars::prelude::{DataType, PolarsError};
use thiserror::Error;

/// Errors raised by the transformation stages.
#[derive(Debug, Error)]
pub enum TransformError {
    /// Column not found in DataFrame.
    #[error("column '{column}' not found in DataFrame")]
    ColumnNotFound { column: String },

    /// Join keys of different types would silently match nothing.
    #[error("join key '{column}' has mismatched types: {left} vs {right}")]
    JoinKeyMismatch {
        column: String,
        left: DataType,
        right: DataType,
    },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<PolarsError> for TransformError {
    fn from(err: PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
