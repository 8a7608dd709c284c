//! Error types for CSV ingestion.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading an import file.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Failed to open the file.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Malformed CSV or an I/O failure while streaming records.
    #[error("failed to parse CSV {origin} at line {line}: {message}")]
    CsvParse {
        origin: String,
        line: u64,
        message: String,
    },
}

impl IngestError {
    pub(crate) fn csv(origin: &str, err: &csv::Error) -> Self {
        Self::CsvParse {
            origin: origin.to_string(),
            line: err.position().map_or(0, csv::Position::line),
            message: err.to_string(),
        }
    }
}

/// Result type for ingest operations.
pub type Result<T> = std::result::Result<T, IngestError>;
