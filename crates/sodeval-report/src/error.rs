//! Error types for report persistence.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for report operations.
#[derive(Error, Debug)]
pub enum ReportError {
    /// Error when reading or writing the report file fails.
    #[error("report I/O failed at '{path}'")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error when the report file does not hold valid JSON.
    #[error("report at '{path}' is not valid JSON")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error when serializing the report fails.
    #[error("failed to serialize report for '{path}'")]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Error when the file parses but lacks the expected layout. The file
    /// is left untouched.
    #[error("report at '{path}' has an incompatible layout: {reason}")]
    IncompatibleLayout { path: PathBuf, reason: String },
}

/// A `Result` alias where the `Err` case is [`ReportError`].
pub type ReportResult<T> = Result<T, ReportError>;
