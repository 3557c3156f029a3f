//! Resumable multi-dataset evaluation of binary-saliency predictors.
//!
//! The crate wires four pieces together: a reuse-aware prediction cache
//! ([`cache`]), collaborator traits for sample delivery and prediction
//! ([`source`]), a per-dataset orchestrator ([`evaluator`]) and a
//! multi-dataset runner with report persistence ([`runner`]). Measures
//! live in [`sodeval_metric`], the report grid in [`sodeval_report`].

pub mod cache;
pub mod config;
pub mod error;
pub mod evaluator;
pub mod folder;
pub mod runner;
pub mod source;

pub use cache::{must_regenerate, prediction_path, RunMode};
pub use config::{DatasetSpec, EvalConfig};
pub use error::{EvalError, EvalResult};
pub use evaluator::DatasetEvaluator;
pub use folder::{FolderError, FolderSource};
pub use runner::{DatasetRun, MultiDatasetRunner, RunResults};
pub use source::{BatchSource, Predictor, SampleBatch};

#[doc(inline)]
pub use sodeval_metric as metric;
#[doc(inline)]
pub use sodeval_report as report;
