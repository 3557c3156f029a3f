//! Structure measure (S-measure).

use ndarray::{s, Array2, ArrayView2};

use crate::prepare::count;

const ALPHA: f64 = 0.5;
const EPS: f64 = 1e-8;

/// Computes the structure measure, the α = 0.5 blend of object-aware and
/// region-aware structural similarity.
///
/// A mask with no foreground scores the complement of the prediction mean;
/// a mask with no background scores the prediction mean.
pub fn s_measure(sm: &Array2<f64>, gt: &Array2<bool>) -> f64 {
    let n = sm.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let fg = count(gt) as f64;
    let mean_sm = sm.mean().unwrap_or(0.0);
    if fg == 0.0 {
        return 1.0 - mean_sm;
    }
    if fg == n {
        return mean_sm;
    }
    let score = ALPHA * s_object(sm, gt) + (1.0 - ALPHA) * s_region(sm, gt);
    score.max(0.0)
}

fn s_object(sm: &Array2<f64>, gt: &Array2<bool>) -> f64 {
    let u = count(gt) as f64 / sm.len() as f64;
    let fg_score = object_score(sm, gt, true);
    let bg = sm.mapv(|v| 1.0 - v);
    let bg_score = object_score(&bg, gt, false);
    u * fg_score + (1.0 - u) * bg_score
}

/// Similarity of the map to an ideal constant 1 over the selected region.
fn object_score(values: &Array2<f64>, gt: &Array2<bool>, foreground: bool) -> f64 {
    let mut n = 0.0;
    let mut sum = 0.0;
    for (&v, &fg) in values.iter().zip(gt.iter()) {
        if fg == foreground {
            n += 1.0;
            sum += v;
        }
    }
    if n == 0.0 {
        return 0.0;
    }
    let mean = sum / n;
    let mut var = 0.0;
    for (&v, &fg) in values.iter().zip(gt.iter()) {
        if fg == foreground {
            var += (v - mean).powi(2);
        }
    }
    let sigma = (var / n).sqrt();
    2.0 * mean / (mean * mean + 1.0 + sigma + EPS)
}

fn s_region(sm: &Array2<f64>, gt: &Array2<bool>) -> f64 {
    let (h, w) = gt.dim();
    let (cy, cx) = centroid(gt);
    let area = (h * w) as f64;

    let weight = |rows: usize, cols: usize| (rows * cols) as f64 / area;
    let w1 = weight(cy, cx);
    let w2 = weight(cy, w - cx);
    let w3 = weight(h - cy, cx);
    let w4 = 1.0 - w1 - w2 - w3;

    let quadrant = |ys: std::ops::Range<usize>, xs: std::ops::Range<usize>| {
        ssim(
            sm.slice(s![ys.clone(), xs.clone()]),
            gt.slice(s![ys, xs]),
        )
    };

    w1 * quadrant(0..cy, 0..cx)
        + w2 * quadrant(0..cy, cx..w)
        + w3 * quadrant(cy..h, 0..cx)
        + w4 * quadrant(cy..h, cx..w)
}

/// Rounded foreground centroid, or the map center for an empty mask.
fn centroid(gt: &Array2<bool>) -> (usize, usize) {
    let (h, w) = gt.dim();
    let mut total = 0.0;
    let mut row_sum = 0.0;
    let mut col_sum = 0.0;
    for ((y, x), &fg) in gt.indexed_iter() {
        if fg {
            total += 1.0;
            row_sum += y as f64;
            col_sum += x as f64;
        }
    }
    if total == 0.0 {
        (h / 2, w / 2)
    } else {
        (
            (row_sum / total).round() as usize,
            (col_sum / total).round() as usize,
        )
    }
}

/// Structural similarity of one quadrant. An empty quadrant has weight 0
/// in the blend, so its return value is irrelevant; both-flat quadrants
/// count as a perfect match.
fn ssim(pred: ArrayView2<'_, f64>, gt: ArrayView2<'_, bool>) -> f64 {
    let n = pred.len() as f64;
    if n == 0.0 {
        return 0.0;
    }
    let gt_f = gt.mapv(|fg| if fg { 1.0 } else { 0.0 });
    let x = pred.sum() / n;
    let y = gt_f.sum() / n;

    let denom = (n - 1.0).max(1.0);
    let mut sigma_x = 0.0;
    let mut sigma_y = 0.0;
    let mut sigma_xy = 0.0;
    for (&p, &g) in pred.iter().zip(gt_f.iter()) {
        sigma_x += (p - x).powi(2);
        sigma_y += (g - y).powi(2);
        sigma_xy += (p - x) * (g - y);
    }
    sigma_x /= denom;
    sigma_y /= denom;
    sigma_xy /= denom;

    let alpha = 4.0 * x * y * sigma_xy;
    let beta = (x * x + y * y) * (sigma_x + sigma_y);
    if alpha != 0.0 {
        alpha / (beta + EPS)
    } else if beta == 0.0 {
        1.0
    } else {
        0.0
    }
}
