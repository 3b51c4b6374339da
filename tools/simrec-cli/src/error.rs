//! Error types for the CLI.

use std::path::PathBuf;

use thiserror::Error;

/// CLI-specific result type.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI error types.
#[derive(Error, Debug)]
pub enum CliError {
    /// Similarity engine error.
    #[error("similarity error: {0}")]
    Similarity(#[from] simrec::SimilarityError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Configuration file could not be parsed.
    #[error("config error in {path}: {source}")]
    Config {
        /// The configuration file.
        path: PathBuf,
        /// The parse failure.
        source: toml::de::Error,
    },

    /// Invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File not found.
    #[error("file not found: {0}")]
    FileNotFound(PathBuf),
}
