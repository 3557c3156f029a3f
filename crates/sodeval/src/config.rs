//! Run configuration.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use sodeval_metric::MeasureSet;

use crate::cache::RunMode;

/// One evaluation dataset: display name plus its root directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatasetSpec {
    pub name: String,
    pub path: PathBuf,
}

/// Configuration of one evaluation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Experiment identifier; keys the report row.
    pub experiment: String,
    /// Model family name; keys the per-model report sheet.
    pub model: String,
    /// Root for saved prediction maps
    /// (`<save_root>/<dataset>/<sample>.png`).
    pub save_root: PathBuf,
    /// Report file location.
    pub report_path: PathBuf,
    #[serde(default)]
    pub mode: RunMode,
    /// Whether freshly generated predictions are persisted.
    #[serde(default = "default_true")]
    pub save_predictions: bool,
    /// Datasets to evaluate, in order.
    pub datasets: Vec<DatasetSpec>,
    /// Measures to compute and record.
    #[serde(default)]
    pub measures: MeasureSet,
}

const fn default_true() -> bool {
    true
}
