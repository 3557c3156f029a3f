//! Small spatial filters used by the weighted F-measure.

use ndarray::Array2;

/// Normalized 2-D Gaussian kernel.
pub fn gaussian_kernel(size: usize, sigma: f64) -> Array2<f64> {
    let half = (size as i64 - 1) / 2;
    let mut kernel = Array2::zeros((size, size));
    let mut sum = 0.0;
    for i in 0..size {
        for j in 0..size {
            let y = i as i64 - half;
            let x = j as i64 - half;
            let v = (-((y * y + x * x) as f64) / (2.0 * sigma * sigma)).exp();
            kernel[[i, j]] = v;
            sum += v;
        }
    }
    kernel.mapv_inplace(|v| v / sum);
    kernel
}

/// Same-size Gaussian convolution with replicate (clamp-at-edge) padding.
pub fn gaussian_blur(src: &Array2<f64>, size: usize, sigma: f64) -> Array2<f64> {
    if src.is_empty() {
        return src.clone();
    }
    let kernel = gaussian_kernel(size, sigma);
    let (h, w) = src.dim();
    let half = (size as i64 - 1) / 2;
    Array2::from_shape_fn((h, w), |(y, x)| {
        let mut acc = 0.0;
        for i in 0..size {
            for j in 0..size {
                let sy = (y as i64 + i as i64 - half).clamp(0, h as i64 - 1) as usize;
                let sx = (x as i64 + j as i64 - half).clamp(0, w as i64 - 1) as usize;
                acc += kernel[[i, j]] * src[[sy, sx]];
            }
        }
        acc
    })
}
