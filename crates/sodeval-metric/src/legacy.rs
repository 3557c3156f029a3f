//! The legacy pixel-count precision/recall path (`MAXF`/`MEANF`/`MAE`).
//!
//! This is one of two deliberately independent precision/recall
//! implementations; the other lives in [`crate::f_measure`]. Their outputs
//! are reported under separate names and must never be merged: this path
//! uses an ε = 1e-12 denominator everywhere and always yields a curve, even
//! for a ground truth with no foreground.

use ndarray::Array2;

use crate::{
    prepare::{adaptive_threshold, binarize_mask, normalize_saliency},
    CURVE_BINS, F_BETA_SQ,
};

const EPS: f64 = 1e-12;

/// Per-sample output of the legacy path.
#[derive(Debug, Clone)]
pub struct LegacyRecord {
    /// Precision at each of the 256 thresholds, highest threshold last.
    pub precision: Vec<f64>,
    /// Recall at each of the 256 thresholds.
    pub recall: Vec<f64>,
    /// Mean absolute error between the normalized prediction and the
    /// binarized ground truth.
    pub mae: f64,
    /// F-measure (β² = 0.3) at the adaptive threshold.
    pub mean_f: f64,
}

/// Computes the legacy PR curve, MAE and adaptive F for one raw 8-bit
/// prediction/ground-truth pair.
pub fn pr_mae_meanf(pred: &Array2<u8>, gt: &Array2<u8>) -> LegacyRecord {
    let sm = normalize_saliency(pred);
    let hard_gt = binarize_mask(gt);
    let total = sm.len() as f64;
    let gt_count = hard_gt.iter().filter(|&&fg| fg).count() as f64;

    let mut abs_sum = 0.0;
    for (&s, &fg) in sm.iter().zip(hard_gt.iter()) {
        abs_sum += (s - if fg { 1.0 } else { 0.0 }).abs();
    }
    let mae = if total > 0.0 { abs_sum / total } else { 0.0 };

    let threshold = adaptive_threshold(&sm);
    let mut tp = 0.0;
    let mut marked = 0.0;
    for (&s, &fg) in sm.iter().zip(hard_gt.iter()) {
        if s >= threshold {
            marked += 1.0;
            if fg {
                tp += 1.0;
            }
        }
    }
    let mean_f = if tp == 0.0 {
        0.0
    } else {
        let p = tp / marked;
        let r = tp / gt_count;
        (1.0 + F_BETA_SQ) * p * r / (F_BETA_SQ * p + r)
    };

    // Threshold i corresponds to i/255, so a pixel whose quantized value is
    // `bin` passes every threshold index <= bin. One histogram pass plus a
    // suffix sum replaces 256 full-map scans.
    let mut above = [0.0; CURVE_BINS];
    let mut hits = [0.0; CURVE_BINS];
    for (&s, &fg) in sm.iter().zip(hard_gt.iter()) {
        let bin = ((s * 255.0).floor() as isize).clamp(0, 255) as usize;
        above[bin] += 1.0;
        if fg {
            hits[bin] += 1.0;
        }
    }
    for i in (0..CURVE_BINS - 1).rev() {
        above[i] += above[i + 1];
        hits[i] += hits[i + 1];
    }

    let mut precision = Vec::with_capacity(CURVE_BINS);
    let mut recall = Vec::with_capacity(CURVE_BINS);
    for i in 0..CURVE_BINS {
        precision.push(hits[i] / (above[i] + EPS));
        recall.push(hits[i] / (gt_count + EPS));
    }

    LegacyRecord {
        precision,
        recall,
        mae,
        mean_f,
    }
}
