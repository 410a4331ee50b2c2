//! Error types for export encoding.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while encoding or writing an export.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Failed to encode delimited output.
    #[error("failed to encode export: {0}")]
    Encode(#[from] csv::Error),

    /// Failed to flush the encoded bytes.
    #[error("failed to finish export: {message}")]
    Flush { message: String },

    /// Failed to write the export file.
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Result type for export operations.
pub type Result<T> = std::result::Result<T, ReportError>;
