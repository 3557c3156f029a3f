//! Euclidean distance transform with nearest-foreground indices.

use ndarray::Array2;

/// Output of [`distance_transform`].
#[derive(Debug, Clone)]
pub struct DistanceField {
    /// Distance from each pixel to the nearest foreground pixel.
    pub dist: Array2<f64>,
    /// `(row, col)` of that nearest foreground pixel.
    pub nearest: Array2<(usize, usize)>,
}

/// Two-pass vector-propagation distance transform over the 8-neighborhood.
///
/// Each pixel carries the offset to its closest known foreground pixel;
/// the forward pass pulls from upper/left neighbors, the backward pass
/// from lower/right ones. Foreground pixels have distance 0 and point at
/// themselves. A mask with no foreground yields infinite distances with
/// every pixel pointing at itself.
pub fn distance_transform(fg: &Array2<bool>) -> DistanceField {
    let (h, w) = fg.dim();
    let mut offsets: Array2<Option<(i64, i64)>> = Array2::from_shape_fn((h, w), |(y, x)| {
        if fg[[y, x]] {
            Some((0, 0))
        } else {
            None
        }
    });

    let sq = |(dy, dx): (i64, i64)| (dy * dy + dx * dx) as f64;

    let relax = |offsets: &mut Array2<Option<(i64, i64)>>, y: usize, x: usize, dy: i64, dx: i64| {
        let ny = y as i64 + dy;
        let nx = x as i64 + dx;
        if ny < 0 || nx < 0 || ny >= h as i64 || nx >= w as i64 {
            return;
        }
        if let Some((oy, ox)) = offsets[[ny as usize, nx as usize]] {
            let candidate = (oy + dy, ox + dx);
            let better = match offsets[[y, x]] {
                None => true,
                Some(current) => sq(candidate) < sq(current),
            };
            if better {
                offsets[[y, x]] = Some(candidate);
            }
        }
    };

    for y in 0..h {
        for x in 0..w {
            relax(&mut offsets, y, x, -1, -1);
            relax(&mut offsets, y, x, -1, 0);
            relax(&mut offsets, y, x, -1, 1);
            relax(&mut offsets, y, x, 0, -1);
        }
    }
    for y in (0..h).rev() {
        for x in (0..w).rev() {
            relax(&mut offsets, y, x, 1, 1);
            relax(&mut offsets, y, x, 1, 0);
            relax(&mut offsets, y, x, 1, -1);
            relax(&mut offsets, y, x, 0, 1);
        }
    }

    let dist = Array2::from_shape_fn((h, w), |(y, x)| {
        offsets[[y, x]].map_or(f64::INFINITY, |o| sq(o).sqrt())
    });
    let nearest = Array2::from_shape_fn((h, w), |(y, x)| match offsets[[y, x]] {
        Some((dy, dx)) => ((y as i64 + dy) as usize, (x as i64 + dx) as usize),
        None => (y, x),
    });

    DistanceField { dist, nearest }
}

#[cfg(test)]
mod tests {
    use ndarray::Array2;

    use super::*;

    #[test]
    fn single_point_field() {
        let mut fg = Array2::from_elem((3, 3), false);
        fg[[1, 1]] = true;
        let field = distance_transform(&fg);
        assert_eq!(field.dist[[1, 1]], 0.0);
        assert!((field.dist[[0, 1]] - 1.0).abs() < 1e-12);
        assert!((field.dist[[0, 0]] - 2.0_f64.sqrt()).abs() < 1e-12);
        for &idx in field.nearest.iter() {
            assert_eq!(idx, (1, 1));
        }
    }

    #[test]
    fn foreground_points_at_itself() {
        let fg = Array2::from_shape_fn((4, 4), |(y, _)| y == 0);
        let field = distance_transform(&fg);
        for x in 0..4 {
            assert_eq!(field.dist[[0, x]], 0.0);
            assert_eq!(field.nearest[[0, x]], (0, x));
            assert!((field.dist[[3, x]] - 3.0).abs() < 1e-12);
            assert_eq!(field.nearest[[3, x]], (0, x));
        }
    }

    #[test]
    fn empty_mask_is_infinite() {
        let fg = Array2::from_elem((2, 2), false);
        let field = distance_transform(&fg);
        assert!(field.dist.iter().all(|d| d.is_infinite()));
        assert_eq!(field.nearest[[1, 0]], (1, 0));
    }
}
