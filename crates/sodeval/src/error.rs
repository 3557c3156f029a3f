//! Error types for evaluation runs.

use std::path::PathBuf;

use thiserror::Error;

/// The error type for evaluation operations.
#[derive(Error, Debug)]
pub enum EvalError {
    /// Error when a ground-truth mask cannot be read.
    #[error("failed to load ground truth for sample '{name}' at '{path}'")]
    GroundTruthLoad {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Error when a cached prediction cannot be read back.
    #[error("failed to load cached prediction for sample '{name}' at '{path}'")]
    PredictionLoad {
        name: String,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Error when writing a prediction image fails.
    #[error("failed to save prediction at '{path}'")]
    PredictionSave {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Error when creating the prediction output directory fails.
    #[error("failed to create output directory '{path}'")]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error when the predictor returns a different number of maps than
    /// the batch has samples.
    #[error("predictor returned {actual} maps for a batch of {expected}")]
    BatchSizeMismatch { expected: usize, actual: usize },

    /// Error surfaced by the sample source collaborator.
    #[error("sample source failed")]
    Source {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error surfaced by the predictor collaborator.
    #[error("predictor failed")]
    Predictor {
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Error from the report layer.
    #[error(transparent)]
    Report(#[from] sodeval_report::ReportError),
}

impl EvalError {
    /// Wraps a sample-source failure.
    pub fn source_failure(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source {
            source: Box::new(source),
        }
    }

    /// Wraps a predictor failure.
    pub fn predictor_failure(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Predictor {
            source: Box::new(source),
        }
    }
}

/// A `Result` alias where the `Err` case is [`EvalError`].
pub type EvalResult<T> = Result<T, EvalError>;
