//! Enhanced-alignment measure (E-measure).

use ndarray::Array2;

use crate::prepare::adaptive_threshold;

const EPS: f64 = 1e-8;

/// Computes the adaptive-threshold E-measure.
///
/// The prediction is binarized at `min(2·mean, 1)` and compared against the
/// mask through the enhanced alignment term. Degenerate masks collapse the
/// alignment matrix: an all-background mask scores the complement of the
/// binarized prediction, an all-foreground mask scores the binarized
/// prediction itself.
pub fn e_measure(sm: &Array2<f64>, gt: &Array2<bool>) -> f64 {
    let n = sm.len() as f64;
    if n == 0.0 {
        return 0.0;
    }

    let threshold = adaptive_threshold(sm);
    let fm = sm.mapv(|v| if v >= threshold { 1.0 } else { 0.0 });
    let gt_f = gt.mapv(|fg| if fg { 1.0 } else { 0.0 });
    let fg = gt_f.sum();

    let enhanced_sum = if fg == 0.0 {
        fm.mapv(|v| 1.0 - v).sum()
    } else if fg == n {
        fm.sum()
    } else {
        let mu_fm = fm.sum() / n;
        let mu_gt = fg / n;
        let mut acc = 0.0;
        for (&f, &g) in fm.iter().zip(gt_f.iter()) {
            let af = f - mu_fm;
            let ag = g - mu_gt;
            let align = 2.0 * ag * af / (ag * ag + af * af + EPS);
            acc += (align + 1.0).powi(2) / 4.0;
        }
        acc
    };

    enhanced_sum / (n - 1.0 + EPS)
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    #[test]
    fn perfect_alignment_scores_near_one() {
        let gt = Array2::from_shape_fn((16, 16), |(y, _)| y < 8);
        let sm = gt.mapv(|fg| if fg { 1.0 } else { 0.0 });
        let e = e_measure(&sm, &gt);
        assert!(e > 0.95 && e < 1.05);
    }

    #[test]
    fn inverted_prediction_scores_near_zero() {
        let gt = Array2::from_shape_fn((16, 16), |(y, _)| y < 8);
        let sm = gt.mapv(|fg| if fg { 0.0 } else { 1.0 });
        assert!(e_measure(&sm, &gt) < 0.05);
    }

    #[test]
    fn empty_mask_scores_the_background() {
        let gt = Array2::from_elem((16, 16), false);
        // A blank map binarizes to all-foreground at threshold 0.
        let blank = Array2::zeros((16, 16));
        assert!(e_measure(&blank, &gt) < 1e-9);
    }
}
