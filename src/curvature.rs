//! Normal-divergence curvature estimator.
//!
//! For two nearby surface samples `(p_a, n_a)` and `(p_b, n_b)` the normal
//! curvature along the chord is approximated by
//!
//! ```text
//! κ = (n_b − n_a) · (p_b − p_a) / |p_b − p_a|²
//! ```
//!
//! With normals oriented toward the sensor, diverging normals (`κ > 0`) mean
//! the surface bulges toward the sensor (convex), converging normals mean it is
//! hollow (concave). A sphere of radius `r` yields `±1/r`, a plane `0`.
//!
//! The per-pixel mean curvature is `H = (κ_x + κ_y) / 2`, using partners along
//! the image axes at a fixed pixel offset. Partners must belong to the same
//! region; when the preferred partner is missing the estimator falls back to
//! the opposite side and then to smaller offsets.
//!
//! Both the segmentation refiner and the cluster classifier use this module so
//! that their curvature values are comparable.

use crate::grid::GridPointBuffer;
use crate::normals::NormalMap;
use nalgebra::Vector3;
use serde::Serialize;

/// Directional normal curvature between two samples, `None` for coincident
/// points.
#[inline]
pub fn directional_curvature(
    p_a: &Vector3<f32>,
    n_a: &Vector3<f32>,
    p_b: &Vector3<f32>,
    n_b: &Vector3<f32>,
) -> Option<f32> {
    let dp = p_b - p_a;
    let d2 = dp.norm_squared();
    if !d2.is_finite() || d2 <= 1e-12 {
        return None;
    }
    let k = (n_b - n_a).dot(&dp) / d2;
    k.is_finite().then_some(k)
}

/// Mean curvature `H` at pixel `idx`, or `None` when no partner is available on
/// one of the two axes.
///
/// `same_region(j)` decides whether pixel `j` may be used as a partner; it
/// must only accept pixels with a valid point and normal.
pub fn mean_curvature_at<F>(
    points: &GridPointBuffer,
    normals: &NormalMap,
    idx: usize,
    offset: usize,
    same_region: F,
) -> Option<f32>
where
    F: Fn(usize) -> bool,
{
    let kx = axis_curvature(points, normals, idx, offset, (1, 0), &same_region)?;
    let ky = axis_curvature(points, normals, idx, offset, (0, 1), &same_region)?;
    Some(0.5 * (kx + ky))
}

fn axis_curvature<F>(
    points: &GridPointBuffer,
    normals: &NormalMap,
    idx: usize,
    offset: usize,
    axis: (isize, isize),
    same_region: &F,
) -> Option<f32>
where
    F: Fn(usize) -> bool,
{
    let p = points.point(idx)?;
    let n = normals.normal(idx);
    let (x, y) = points.coords(idx);
    let (w, h) = (points.width() as isize, points.height() as isize);
    for step in (1..=offset.max(1) as isize).rev() {
        for sign in [1isize, -1] {
            let nx = x as isize + sign * axis.0 * step;
            let ny = y as isize + sign * axis.1 * step;
            if nx < 0 || ny < 0 || nx >= w || ny >= h {
                continue;
            }
            let j = points.index(nx as usize, ny as usize);
            if !same_region(j) {
                continue;
            }
            let Some(q) = points.point(j) else {
                continue;
            };
            if let Some(k) = directional_curvature(&p, &n, &q, &normals.normal(j)) {
                return Some(k);
            }
        }
    }
    None
}

/// Running statistics over per-pixel mean curvature samples.
///
/// Stored as sums so two regions can be combined without revisiting pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurvatureStats {
    pub samples: usize,
    pub sum_h: f64,
    pub sum_abs_h: f64,
    pub positive: usize,
    pub negative: usize,
}

impl CurvatureStats {
    pub fn push(&mut self, h: f32) {
        self.samples += 1;
        self.sum_h += h as f64;
        self.sum_abs_h += h.abs() as f64;
        if h > 0.0 {
            self.positive += 1;
        } else if h < 0.0 {
            self.negative += 1;
        }
    }

    pub fn combine(&mut self, other: &CurvatureStats) {
        self.samples += other.samples;
        self.sum_h += other.sum_h;
        self.sum_abs_h += other.sum_abs_h;
        self.positive += other.positive;
        self.negative += other.negative;
    }

    /// Mean of `H`; `0.0` without samples.
    pub fn mean_h(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            (self.sum_h / self.samples as f64) as f32
        }
    }

    pub fn mean_abs_h(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            (self.sum_abs_h / self.samples as f64) as f32
        }
    }

    pub fn positive_fraction(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            self.positive as f32 / self.samples as f32
        }
    }

    pub fn negative_fraction(&self) -> f32 {
        if self.samples == 0 {
            0.0
        } else {
            self.negative as f32 / self.samples as f32
        }
    }
}

/// Curvature statistics of a region given its pixels in row-major order.
///
/// Every `sample_step`-th pixel is sampled.
pub fn region_curvature<F>(
    points: &GridPointBuffer,
    normals: &NormalMap,
    pixels: &[usize],
    offset: usize,
    sample_step: usize,
    same_region: F,
) -> CurvatureStats
where
    F: Fn(usize) -> bool,
{
    let mut stats = CurvatureStats::default();
    for &idx in pixels.iter().step_by(sample_step.max(1)) {
        if let Some(h) = mean_curvature_at(points, normals, idx, offset, &same_region) {
            stats.push(h);
        }
    }
    stats
}
