//! Error types for file sources.

use std::path::PathBuf;

use exposure_core::ExposureError;
use thiserror::Error;

/// Result type for file operations.
pub type FileResult<T> = Result<T, FileError>;

/// Errors raised while reading or writing files.
#[derive(Error, Debug)]
pub enum FileError {
    /// IO error.
    #[error("IO error on {}: {}", .path.display(), .source)]
    Io {
        /// File involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// CSV framing or encoding error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A required column is absent from the header.
    #[error("Missing column '{column}'")]
    MissingColumn {
        /// Column name.
        column: String,
    },

    /// A field could not be parsed.
    #[error("Line {line}, column '{column}': {reason}")]
    Parse {
        /// 1-based data line (header excluded).
        line: usize,
        /// Column name.
        column: String,
        /// What went wrong.
        reason: String,
    },

    /// Spreadsheet could not be opened or read.
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(String),

    /// File extension not recognized.
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Domain validation failed.
    #[error(transparent)]
    Exposure(#[from] ExposureError),
}

impl FileError {
    /// Create a parse error.
    #[must_use]
    pub fn parse(line: usize, column: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Parse {
            line,
            column: column.into(),
            reason: reason.into(),
        }
    }

    /// Create a missing column error.
    #[must_use]
    pub fn missing_column(column: impl Into<String>) -> Self {
        Self::MissingColumn {
            column: column.into(),
        }
    }

    /// Create an IO error for a path.
    #[must_use]
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
