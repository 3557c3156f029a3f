//! Distance-weighted F-measure (β² = 1).
//!
//! Errors in the background are replaced by the error at the nearest
//! foreground pixel, smoothed with a 7×7 σ=5 Gaussian, and down-weighted
//! with distance from the object boundary before the precision/recall
//! combination.

use ndarray::Array2;

use crate::{
    distance::distance_transform,
    filters::gaussian_blur,
    measures::MaskPolicy,
    prepare::count,
};

const EPS: f64 = 1e-8;
const KERNEL_SIZE: usize = 7;
const KERNEL_SIGMA: f64 = 5.0;

/// Computes the weighted F-measure of a normalized prediction.
///
/// Under [`MaskPolicy::Tolerant`] a ground truth with no foreground scores
/// background agreement, `1 - mean(sm)`, instead of the strict 0.
pub fn weighted_f_measure(sm: &Array2<f64>, gt: &Array2<bool>, policy: MaskPolicy) -> f64 {
    let fg = count(gt) as f64;
    if fg == 0.0 {
        return match policy {
            MaskPolicy::Strict => 0.0,
            MaskPolicy::Tolerant => 1.0 - sm.mean().unwrap_or(0.0),
        };
    }

    let (h, w) = gt.dim();
    let field = distance_transform(gt);

    let error = Array2::from_shape_fn((h, w), |(y, x)| {
        let target = if gt[[y, x]] { 1.0 } else { 0.0 };
        (sm[[y, x]] - target).abs()
    });

    // Background pixels inherit the error of their nearest foreground pixel
    // before smoothing.
    let mut transferred = error.clone();
    for y in 0..h {
        for x in 0..w {
            if !gt[[y, x]] {
                let (ny, nx) = field.nearest[[y, x]];
                transferred[[y, x]] = error[[ny, nx]];
            }
        }
    }
    let smoothed = gaussian_blur(&transferred, KERNEL_SIZE, KERNEL_SIGMA);

    // Inside the object keep the smaller of the raw and smoothed error;
    // the background keeps its raw error.
    let mut weighted_error = error.clone();
    for y in 0..h {
        for x in 0..w {
            if gt[[y, x]] && smoothed[[y, x]] < error[[y, x]] {
                weighted_error[[y, x]] = smoothed[[y, x]];
            }
        }
    }

    // Background importance grows with distance from the object, from 1 at
    // the boundary toward 2 far away.
    let decay = 0.5_f64.ln() / 5.0;
    let mut fg_error = 0.0;
    let mut bg_error = 0.0;
    for y in 0..h {
        for x in 0..w {
            if gt[[y, x]] {
                fg_error += weighted_error[[y, x]];
            } else {
                let weight = 2.0 - (decay * field.dist[[y, x]]).exp();
                bg_error += weighted_error[[y, x]] * weight;
            }
        }
    }

    let tp_w = fg - fg_error;
    let fp_w = bg_error;
    let recall = 1.0 - fg_error / fg;
    let precision = tp_w / (tp_w + fp_w + EPS);
    2.0 * recall * precision / (recall + precision + EPS)
}
