//! Error types for sheet ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading a sheet.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open or read the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV reader rejected the file.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// The file has no non-blank rows.
    #[error("sheet is empty: {path}")]
    EmptySheet { path: PathBuf },
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;
