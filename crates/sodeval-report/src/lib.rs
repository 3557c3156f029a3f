//! Growable tabular report for multi-dataset evaluation results.
//!
//! The report is a typed grid: a `results` sheet with one row per
//! experiment and one column group per dataset, plus one transposed sheet
//! per model family. [`ReportRecorder`] persists it as JSON with
//! load-mutate-save semantics; re-recording an experiment overwrites its
//! row, and the header only ever grows.

pub mod datasets;
pub mod error;
pub mod recorder;
pub mod workbook;

pub use datasets::{builtin_size, normalize_name, BUILTIN_DATASETS};
pub use error::{ReportError, ReportResult};
pub use recorder::{MetricValues, ReportRecorder};
pub use workbook::{DatasetColumn, DatasetRow, ExperimentRow, ModelSheet, ResultsSheet, Workbook};
