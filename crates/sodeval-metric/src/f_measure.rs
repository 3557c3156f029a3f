//! Toolbox-style F-measures: adaptive threshold and the 256-threshold
//! precision/recall sweep.
//!
//! Independent from [`crate::legacy`] on purpose: this path uses machine-ε
//! denominators and skips curve contributions for foreground-free ground
//! truths under the strict policy.

use ndarray::Array2;

use crate::{
    measures::MaskPolicy,
    prepare::{adaptive_threshold, count},
    CURVE_BINS, F_BETA_SQ,
};

const EPS: f64 = f64::EPSILON;

/// A 256-point precision/recall curve for one sample.
#[derive(Debug, Clone, PartialEq)]
pub struct PrCurve {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

/// Adaptive-threshold F-measure (β² = 0.3).
///
/// `sm` must be normalized to `[0, 1]`. Under [`MaskPolicy::Tolerant`] a
/// ground truth with no foreground scores background agreement,
/// `1 - mean(sm)`, instead of the strict 0.
pub fn adaptive_f_measure(sm: &Array2<f64>, gt: &Array2<bool>, policy: MaskPolicy) -> f64 {
    let fg = count(gt);
    if fg == 0 {
        return match policy {
            MaskPolicy::Strict => 0.0,
            MaskPolicy::Tolerant => 1.0 - sm.mean().unwrap_or(0.0),
        };
    }

    let threshold = adaptive_threshold(sm);
    let mut hits = 0.0;
    let mut marked = 0.0;
    for (&s, &is_fg) in sm.iter().zip(gt.iter()) {
        if s >= threshold {
            marked += 1.0;
            if is_fg {
                hits += 1.0;
            }
        }
    }
    let p = hits / (marked + EPS);
    let r = hits / (fg as f64 + EPS);
    (1.0 + F_BETA_SQ) * p * r / (F_BETA_SQ * p + r + EPS)
}

/// 256-threshold precision/recall sweep.
///
/// Returns `None` for a foreground-free ground truth under the strict
/// policy; the sample then contributes nothing to the curve stack. Under
/// the tolerant policy such a sample yields per-threshold background
/// recall on both axes.
pub fn prec_recall(sm: &Array2<f64>, gt: &Array2<bool>, policy: MaskPolicy) -> Option<PrCurve> {
    let total = sm.len() as f64;
    let fg = count(gt) as f64;

    let mut above = [0.0; CURVE_BINS];
    let mut hits = [0.0; CURVE_BINS];
    for (&s, &is_fg) in sm.iter().zip(gt.iter()) {
        let bin = ((s * 255.0).floor() as isize).clamp(0, 255) as usize;
        above[bin] += 1.0;
        if is_fg {
            hits[bin] += 1.0;
        }
    }
    for i in (0..CURVE_BINS - 1).rev() {
        above[i] += above[i + 1];
        hits[i] += hits[i + 1];
    }

    if fg == 0.0 {
        return match policy {
            MaskPolicy::Strict => None,
            MaskPolicy::Tolerant => {
                let values: Vec<f64> = above
                    .iter()
                    .map(|&marked| 1.0 - marked / total.max(1.0))
                    .collect();
                Some(PrCurve {
                    precision: values.clone(),
                    recall: values,
                })
            }
        };
    }

    let precision = (0..CURVE_BINS).map(|i| hits[i] / (above[i] + EPS)).collect();
    let recall = (0..CURVE_BINS).map(|i| hits[i] / (fg + EPS)).collect();
    Some(PrCurve { precision, recall })
}

#[cfg(test)]
mod tests {
    use ndarray::{array, Array2};

    use super::*;

    fn half_scene() -> (Array2<f64>, Array2<bool>) {
        let sm = array![[1.0, 1.0], [0.0, 0.0]];
        let gt = array![[true, true], [false, false]];
        (sm, gt)
    }

    #[test]
    fn adaptive_f_is_high_for_a_perfect_map() {
        let (sm, gt) = half_scene();
        let f = adaptive_f_measure(&sm, &gt, MaskPolicy::Strict);
        assert!((f - 1.0).abs() < 1e-9);
    }

    #[test]
    fn strict_empty_mask_scores_zero() {
        let sm = Array2::zeros((2, 2));
        let gt = Array2::from_elem((2, 2), false);
        assert_eq!(adaptive_f_measure(&sm, &gt, MaskPolicy::Strict), 0.0);
        assert!(prec_recall(&sm, &gt, MaskPolicy::Strict).is_none());
    }

    #[test]
    fn tolerant_empty_mask_rewards_a_blank_prediction() {
        let gt = Array2::from_elem((2, 2), false);
        let blank = Array2::zeros((2, 2));
        let bright = Array2::from_elem((2, 2), 1.0);
        assert!((adaptive_f_measure(&blank, &gt, MaskPolicy::Tolerant) - 1.0).abs() < 1e-12);
        assert!(adaptive_f_measure(&bright, &gt, MaskPolicy::Tolerant).abs() < 1e-12);

        let curve = prec_recall(&blank, &gt, MaskPolicy::Tolerant).unwrap();
        // Threshold 0 marks everything; every positive threshold marks
        // nothing, which is full background recall.
        assert!(curve.precision[0].abs() < 1e-12);
        assert!((curve.precision[1] - 1.0).abs() < 1e-12);
        let bright_curve = prec_recall(&bright, &gt, MaskPolicy::Tolerant).unwrap();
        assert!(bright_curve.precision.iter().all(|&p| p.abs() < 1e-12));
    }

    #[test]
    fn sweep_matches_hand_counts() {
        let (sm, gt) = half_scene();
        let curve = prec_recall(&sm, &gt, MaskPolicy::Strict).unwrap();
        // Threshold 0: all four pixels marked, two of them foreground.
        assert!((curve.precision[0] - 0.5).abs() < 1e-9);
        assert!((curve.recall[0] - 1.0).abs() < 1e-9);
        // Any positive threshold keeps only the two bright pixels.
        assert!((curve.precision[200] - 1.0).abs() < 1e-9);
        assert!((curve.recall[200] - 1.0).abs() < 1e-9);
    }
}
