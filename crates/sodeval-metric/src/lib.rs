//! Saliency-map quality measures and their dataset-level aggregation.
//!
//! The crate takes raw 8-bit prediction/ground-truth pairs and produces the
//! standard binary-saliency measures: the legacy pixel-count trio
//! (`MAXF`/`MEANF`/`MAE`), the toolbox-style measures (`Max-F`, `Adp-F`,
//! `Wgt-F`, `E-measure`, `S-measure`, `MAE2`) and their mask-tolerant
//! variants. [`engine::MeasureEngine`] scores one sample,
//! [`aggregate::DatasetAccumulator`] folds samples into a dataset result.

pub mod aggregate;
pub mod distance;
pub mod e_measure;
pub mod engine;
pub mod f_measure;
pub mod filters;
pub mod legacy;
pub mod measures;
pub mod mse;
pub mod prepare;
pub mod s_measure;
pub mod weighted_f_measure;

pub use aggregate::{AvgMeter, CurveMean, DatasetAccumulator, DatasetResult};
pub use engine::{MeasureEngine, SampleMeasures};
pub use f_measure::{adaptive_f_measure, prec_recall, PrCurve};
pub use legacy::{pr_mae_meanf, LegacyRecord};
pub use measures::{MaskPolicy, Measure, MeasureSet};

/// Number of binarization thresholds in every precision/recall curve.
pub const CURVE_BINS: usize = 256;

/// β² shared by the legacy and toolbox F-measures (`Wgt-F` uses β² = 1).
pub const F_BETA_SQ: f64 = 0.3;
