use super::options::{EdgeOptions, JumpMetric};
use crate::grid::GridPointBuffer;
use crate::image::ImageF32;
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::Serialize;

/// Per-pixel edge strength in `[0, 1)` plus the options it was produced with.
///
/// The options travel with the map so later stages can apply the same jump
/// model to pixel pairs (see [`EdgeMap::is_pair_discontinuity`]).
#[derive(Clone, Debug)]
pub struct EdgeMap {
    pub strength: ImageF32,
    pub options: EdgeOptions,
}

impl EdgeMap {
    #[inline]
    pub fn width(&self) -> usize {
        self.strength.w
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.strength.h
    }

    #[inline]
    pub fn strength_at(&self, idx: usize) -> f32 {
        self.strength.data[idx]
    }

    /// True when the pixel blocks aggregation and region growth.
    #[inline]
    pub fn is_barrier(&self, idx: usize) -> bool {
        self.strength.data[idx] >= self.options.barrier_threshold
    }

    /// True when two measured depths are separated by a discontinuity.
    #[inline]
    pub fn is_pair_discontinuity(&self, z_a: f32, z_b: f32) -> bool {
        self.options.is_discontinuity((z_a - z_b).abs(), z_a.min(z_b))
    }

    /// Number of barrier pixels.
    pub fn edge_count(&self) -> usize {
        self.strength
            .data
            .iter()
            .filter(|&&s| s >= self.options.barrier_threshold)
            .count()
    }

    pub fn summary(&self) -> EdgeSummary {
        EdgeSummary {
            width: self.width(),
            height: self.height(),
            barrier_threshold: self.options.barrier_threshold,
            edge_pixels: self.edge_count(),
            max_strength: self.strength.max_value().unwrap_or(0.0),
        }
    }
}

/// Serializable snapshot of an edge map.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeSummary {
    pub width: usize,
    pub height: usize,
    pub barrier_threshold: f32,
    pub edge_pixels: usize,
    pub max_strength: f32,
}

/// Detect depth discontinuities.
///
/// `depth` must be the depth raster of `points` (same shape); it is read for
/// the cheap per-pixel z lookups while `points` supplies full 3D positions for
/// [`JumpMetric::Euclidean`].
pub fn compute_depth_edges(
    depth: &ImageF32,
    points: &GridPointBuffer,
    options: &EdgeOptions,
) -> EdgeMap {
    assert_eq!(
        (depth.w, depth.h),
        (points.width(), points.height()),
        "depth map and point grid must share their shape"
    );
    let w = depth.w;
    let h = depth.h;
    let mut data = vec![0.0f32; w * h];
    if w == 0 || h == 0 {
        return EdgeMap {
            strength: ImageF32::from_vec(w, h, data),
            options: *options,
        };
    }

    let offset = options.pixel_offset.max(1);

    #[cfg(feature = "parallel")]
    data.par_chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| fill_row(depth, points, options, offset, y, row));
    #[cfg(not(feature = "parallel"))]
    data.chunks_mut(w)
        .enumerate()
        .for_each(|(y, row)| fill_row(depth, points, options, offset, y, row));

    EdgeMap {
        strength: ImageF32::from_vec(w, h, data),
        options: *options,
    }
}

fn fill_row(
    depth: &ImageF32,
    points: &GridPointBuffer,
    options: &EdgeOptions,
    offset: usize,
    y: usize,
    out: &mut [f32],
) {
    let w = depth.w;
    let h = depth.h;
    for (x, slot) in out.iter_mut().enumerate() {
        let z = depth.get(x, y);
        if !has_depth(z) {
            continue;
        }
        let neighbours = [
            (x.checked_sub(offset), Some(y)),
            ((x + offset < w).then_some(x + offset), Some(y)),
            (Some(x), y.checked_sub(offset)),
            (Some(x), (y + offset < h).then_some(y + offset)),
        ];
        let mut best = 0.0f32;
        for (nx, ny) in neighbours {
            let (Some(nx), Some(ny)) = (nx, ny) else {
                continue;
            };
            let zn = depth.get(nx, ny);
            if !has_depth(zn) {
                continue;
            }
            let jump = match options.metric {
                JumpMetric::Depth => (zn - z).abs(),
                JumpMetric::Euclidean => match (points.get(x, y), points.get(nx, ny)) {
                    (Some(p), Some(q)) => (q - p).norm(),
                    _ => continue,
                },
            };
            best = best.max(options.strength(jump, z.min(zn)));
        }
        *slot = best;
    }
}

#[inline]
fn has_depth(z: f32) -> bool {
    z.is_finite() && z > 0.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Vector3;

    fn step_grid(width: usize, height: usize, split_x: usize, jump: f32) -> GridPointBuffer {
        GridPointBuffer::from_fn(width, height, |x, y| {
            let z = if x < split_x { 1.0 } else { 1.0 + jump };
            Some(Vector3::new(x as f32 * 0.01, y as f32 * 0.01, z))
        })
    }

    #[test]
    fn flat_grid_has_no_edges() {
        let grid = step_grid(8, 8, 8, 0.0);
        let edges = compute_depth_edges(&grid.depth_map(), &grid, &EdgeOptions::default());
        assert_eq!(edges.edge_count(), 0);
        assert!(edges.strength.data.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn step_marks_both_sides_of_the_jump() {
        let grid = step_grid(10, 6, 5, 0.5);
        let edges = compute_depth_edges(&grid.depth_map(), &grid, &EdgeOptions::default());
        for y in 0..6 {
            assert!(edges.is_barrier(grid.index(4, y)));
            assert!(edges.is_barrier(grid.index(5, y)));
            assert!(!edges.is_barrier(grid.index(3, y)));
            assert!(!edges.is_barrier(grid.index(6, y)));
        }
    }

    #[test]
    fn strength_grows_with_jump() {
        let options = EdgeOptions::default();
        let mut last = 0.0;
        for jump in [0.01f32, 0.02, 0.04, 0.08, 0.16, 0.32, 0.64] {
            let grid = step_grid(6, 3, 3, jump);
            let edges = compute_depth_edges(&grid.depth_map(), &grid, &options);
            let s = edges.strength_at(grid.index(3, 1));
            assert!(s >= last, "strength decreased at jump {jump}: {s} < {last}");
            assert!(s < 1.0);
            last = s;
        }
    }

    #[test]
    fn missing_depth_emits_no_signal() {
        let grid = GridPointBuffer::from_fn(5, 5, |x, y| {
            (x != 2).then(|| Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0))
        });
        let edges = compute_depth_edges(&grid.depth_map(), &grid, &EdgeOptions::default());
        assert_eq!(edges.edge_count(), 0);
        assert_eq!(edges.strength_at(grid.index(2, 2)), 0.0);
    }

    #[test]
    fn tolerance_grows_with_depth() {
        let options = EdgeOptions::default();
        assert!(options.is_discontinuity(0.05, 0.5));
        assert!(!options.is_discontinuity(0.05, 3.0));
    }
}
