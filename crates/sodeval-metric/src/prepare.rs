//! Shared input preparation for the saliency measures.

use ndarray::Array2;

/// Normalizes a raw 8-bit saliency map to `[0, 1]`.
///
/// A constant map is divided by the full value range instead of its own
/// (zero) span; anything else is min-max scaled.
pub fn normalize_saliency(raw: &Array2<u8>) -> Array2<f64> {
    let mut lo = u8::MAX;
    let mut hi = u8::MIN;
    for &v in raw.iter() {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if raw.is_empty() || lo == hi {
        raw.mapv(|v| f64::from(v) / 255.0)
    } else {
        let (lo, hi) = (f64::from(lo), f64::from(hi));
        raw.mapv(|v| (f64::from(v) - lo) / (hi - lo))
    }
}

/// Binarizes a raw 8-bit ground-truth mask at half the value range.
pub fn binarize_mask(raw: &Array2<u8>) -> Array2<bool> {
    raw.mapv(|v| v > 128)
}

/// Adaptive binarization threshold: twice the map mean, clipped to 1.
pub fn adaptive_threshold(sm: &Array2<f64>) -> f64 {
    (2.0 * sm.mean().unwrap_or(0.0)).min(1.0)
}

/// Foreground pixel count of a binary mask.
pub(crate) fn count(mask: &Array2<bool>) -> usize {
    mask.iter().filter(|&&fg| fg).count()
}

#[cfg(test)]
mod tests {
    use ndarray::array;

    use super::*;

    #[test]
    fn constant_map_divides_by_full_range() {
        let raw = Array2::from_elem((3, 3), 102u8);
        let sm = normalize_saliency(&raw);
        for &v in sm.iter() {
            assert!((v - 0.4).abs() < 1e-12);
        }
    }

    #[test]
    fn varying_map_is_min_max_scaled() {
        let raw = array![[10u8, 110], [60, 110]];
        let sm = normalize_saliency(&raw);
        assert!((sm[[0, 0]] - 0.0).abs() < 1e-12);
        assert!((sm[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((sm[[1, 0]] - 0.5).abs() < 1e-12);
    }

    #[test]
    fn mask_threshold_is_exclusive_at_128() {
        let raw = array![[128u8, 129], [0, 255]];
        let gt = binarize_mask(&raw);
        assert!(!gt[[0, 0]]);
        assert!(gt[[0, 1]]);
        assert!(!gt[[1, 0]]);
        assert!(gt[[1, 1]]);
    }

    #[test]
    fn adaptive_threshold_is_clipped() {
        let bright = Array2::from_elem((2, 2), 0.9);
        assert!((adaptive_threshold(&bright) - 1.0).abs() < 1e-12);
        let dim = Array2::from_elem((2, 2), 0.2);
        assert!((adaptive_threshold(&dim) - 0.4).abs() < 1e-12);
    }
}
