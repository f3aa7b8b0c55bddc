//! Error types for source ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading a source container.
#[derive(Debug, Error)]
pub enum IngestError {
    // === File System Errors ===
    /// Directory not found or not readable.
    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    /// Source file not found.
    #[error("source file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read directory entries.
    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // === Container Errors ===
    /// The container kind could not be inferred from the file name.
    #[error("unsupported source format: {name}")]
    UnsupportedFormat { name: String },

    /// Failed to parse delimited text.
    #[error("failed to parse CSV {label}: {source}")]
    Csv {
        label: String,
        #[source]
        source: ::csv::Error,
    },

    /// Failed to open or read a spreadsheet.
    #[error("failed to read workbook {label}: {message}")]
    Workbook { label: String, message: String },

    /// Failed to open or read a ZIP archive.
    #[error("failed to read archive {label}: {message}")]
    Archive { label: String, message: String },

    /// Failed to parse an HTML page.
    #[error("failed to parse HTML {label}: {message}")]
    Html { label: String, message: String },

    /// The container held no readable table.
    #[error("no readable table in {label}")]
    NoTables { label: String },

    // === DataFrame Errors ===
    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
