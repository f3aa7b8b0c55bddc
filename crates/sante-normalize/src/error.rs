//! Error types for normalization.

use thiserror::Error;

/// Errors raised while normalizing a table.
///
/// A table that simply lacks the required columns is not an error; see
/// [`crate::NormalizeOutcome::Unnormalizable`].
#[derive(Debug, Error)]
pub enum NormalizeError {
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for NormalizeError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, NormalizeError>;
