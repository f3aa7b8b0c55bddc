//! Error types for transformation stages.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

impl From<sante_normalize::NormalizeError> for TransformError {
    fn from(err: sante_normalize::NormalizeError) -> Self {
        match err {
            sante_normalize::NormalizeError::DataFrame { message } => Self::DataFrame { message },
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
