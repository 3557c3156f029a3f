//! Mean squared error between a normalized prediction and a binary mask.

use ndarray::Array2;

/// `MAE2`: mean squared difference of the normalized prediction against
/// the binarized ground truth.
pub fn mean_square_error(sm: &Array2<f64>, gt: &Array2<bool>) -> f64 {
    if sm.is_empty() {
        return 0.0;
    }
    let sum: f64 = sm
        .iter()
        .zip(gt.iter())
        .map(|(&s, &fg)| {
            let d = s - if fg { 1.0 } else { 0.0 };
            d * d
        })
        .sum();
    sum / sm.len() as f64
}
