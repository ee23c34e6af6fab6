//! CLI error types.

use std::path::PathBuf;

use thiserror::Error;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// Invalid date format.
    #[error("Invalid date format: {0}. Use YYYY-MM-DD.")]
    InvalidDate(String),

    /// Invalid exposure metric.
    #[error("Invalid metric: {0}. Use net, long, short or gross.")]
    InvalidMetric(String),

    /// Invalid single-byte delimiter.
    #[error("Invalid delimiter: {0:?}. Must be a single ASCII character.")]
    InvalidDelimiter(String),

    /// Configuration error.
    #[error("Configuration error in {}: {}", .path.display(), .reason)]
    Config {
        /// Configuration file.
        path: PathBuf,
        /// What went wrong.
        reason: String,
    },

    /// Refused to overwrite an existing file.
    #[error("{} already exists. Use --force to overwrite.", .0.display())]
    AlreadyExists(PathBuf),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;
