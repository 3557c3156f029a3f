//! Per-sample measure computation.

use std::collections::BTreeMap;

use ndarray::Array2;

use crate::{
    e_measure::e_measure,
    f_measure::{adaptive_f_measure, prec_recall, PrCurve},
    legacy::{pr_mae_meanf, LegacyRecord},
    measures::{MaskPolicy, Measure, MeasureSet},
    mse::mean_square_error,
    prepare::{binarize_mask, normalize_saliency},
    s_measure::s_measure,
    weighted_f_measure::weighted_f_measure,
};

/// Everything computed for one prediction/ground-truth pair.
///
/// Absent curves are not an error: a foreground-free ground truth under
/// the strict policy simply contributes nothing to the curve stack.
#[derive(Debug, Clone, Default)]
pub struct SampleMeasures {
    /// Legacy path output, when any of `MAXF`/`MEANF`/`MAE` is enabled.
    pub legacy: Option<LegacyRecord>,
    /// Scalar measures, keyed by measure.
    pub scalars: BTreeMap<Measure, f64>,
    /// Toolbox PR curve under the strict policy.
    pub strict_curve: Option<PrCurve>,
    /// Toolbox PR curve under the tolerant policy.
    pub tolerant_curve: Option<PrCurve>,
}

/// Computes the enabled measures for raw 8-bit prediction/ground-truth
/// pairs of matching dimensions.
#[derive(Debug, Clone, Default)]
pub struct MeasureEngine {
    measures: MeasureSet,
}

impl MeasureEngine {
    pub const fn new(measures: MeasureSet) -> Self {
        Self { measures }
    }

    pub const fn measures(&self) -> &MeasureSet {
        &self.measures
    }

    pub fn evaluate(&self, pred: &Array2<u8>, gt: &Array2<u8>) -> SampleMeasures {
        let set = &self.measures;

        let legacy = if set.any_legacy() {
            Some(pr_mae_meanf(pred, gt))
        } else {
            None
        };

        let sm = normalize_saliency(pred);
        let mask = binarize_mask(gt);

        let mut scalars = BTreeMap::new();
        if set.contains(Measure::AdpF) {
            scalars.insert(
                Measure::AdpF,
                adaptive_f_measure(&sm, &mask, MaskPolicy::Strict),
            );
        }
        if set.contains(Measure::ModAdpF) {
            scalars.insert(
                Measure::ModAdpF,
                adaptive_f_measure(&sm, &mask, MaskPolicy::Tolerant),
            );
        }
        if set.contains(Measure::WgtF) {
            scalars.insert(
                Measure::WgtF,
                weighted_f_measure(&sm, &mask, MaskPolicy::Strict),
            );
        }
        if set.contains(Measure::ModWgtF) {
            scalars.insert(
                Measure::ModWgtF,
                weighted_f_measure(&sm, &mask, MaskPolicy::Tolerant),
            );
        }
        if set.contains(Measure::EMeasure) {
            scalars.insert(Measure::EMeasure, e_measure(&sm, &mask));
        }
        if set.contains(Measure::SMeasure) {
            scalars.insert(Measure::SMeasure, s_measure(&sm, &mask));
        }
        if set.contains(Measure::Mae2) {
            scalars.insert(Measure::Mae2, mean_square_error(&sm, &mask));
        }

        let strict_curve = if set.contains(Measure::MaxF) {
            prec_recall(&sm, &mask, MaskPolicy::Strict)
        } else {
            None
        };
        let tolerant_curve = if set.contains(Measure::ModMaxF) {
            prec_recall(&sm, &mask, MaskPolicy::Tolerant)
        } else {
            None
        };

        SampleMeasures {
            legacy,
            scalars,
            strict_curve,
            tolerant_curve,
        }
    }
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;

    #[test]
    fn full_set_fills_every_slot() {
        let engine = MeasureEngine::default();
        let gt = array![[255u8, 255], [0, 0]];
        let sample = engine.evaluate(&gt.clone(), &gt);
        assert!(sample.legacy.is_some());
        assert!(sample.strict_curve.is_some());
        assert!(sample.tolerant_curve.is_some());
        assert_eq!(sample.scalars.len(), 7);
        assert!(sample.scalars[&Measure::Mae2].abs() < 1e-12);
    }

    #[test]
    fn disabled_measures_are_not_computed() {
        let engine = MeasureEngine::new(MeasureSet::new([Measure::Mae]));
        let gt = array![[255u8, 0]];
        let sample = engine.evaluate(&gt.clone(), &gt);
        assert!(sample.legacy.is_some());
        assert!(sample.scalars.is_empty());
        assert!(sample.strict_curve.is_none());
        assert!(sample.tolerant_curve.is_none());
    }

    #[test]
    fn strict_curve_vanishes_on_an_empty_mask() {
        let engine = MeasureEngine::default();
        let pred = Array2::zeros((2, 2));
        let gt = Array2::zeros((2, 2));
        let sample = engine.evaluate(&pred, &gt);
        assert!(sample.strict_curve.is_none());
        assert!(sample.tolerant_curve.is_some());
        assert_eq!(sample.scalars[&Measure::AdpF], 0.0);
        assert!((sample.scalars[&Measure::ModAdpF] - 1.0).abs() < 1e-12);
    }
}
