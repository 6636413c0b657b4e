use super::mask::NeighborMask;
use super::{NormalMap, NormalOptions};
use crate::angle::{orient_towards_origin, unit_or_none};
use crate::edges::EdgeMap;
use crate::grid::GridPointBuffer;
use crate::segmentation::{LabelMap, PixelLabel};
use log::debug;
use nalgebra::{Matrix3, SymmetricEigen, Vector3};
#[cfg(feature = "parallel")]
use rayon::prelude::*;
use std::time::Instant;

/// Smallest accepted ratio between the middle and the largest eigenvalue.
const MIN_SPREAD_RATIO: f64 = 1e-9;

/// Outcome of the local fit for one pixel.
#[derive(Clone, Copy, Debug)]
enum PixelFit {
    Normal { normal: Vector3<f32>, variation: f32 },
    Rejected(PixelLabel),
}

struct FitContext<'a> {
    points: &'a GridPointBuffer,
    edges: Option<&'a EdgeMap>,
    options: &'a NormalOptions,
    mask: &'a NeighborMask,
}

impl FitContext<'_> {
    #[inline]
    fn is_edge(&self, idx: usize) -> bool {
        self.edges.is_some_and(|e| e.is_barrier(idx))
    }
}

/// Estimate a normal per pixel and emit the initial label map.
///
/// `mask` must have been built for `(points.width(), options.radius,
/// options.pixel_step)`. Labels are `Valid`, `Edge` (barrier in `edges`),
/// `Skipped` (beyond `options.max_depth`) or `Invalid` (no point, too few
/// admitted neighbours, degenerate fit).
pub fn estimate_normals(
    points: &GridPointBuffer,
    edges: Option<&EdgeMap>,
    options: &NormalOptions,
    mask: &NeighborMask,
) -> (NormalMap, LabelMap) {
    assert!(
        mask.matches(points.width(), options.radius, options.pixel_step),
        "neighbour mask built for a different grid width or radius"
    );
    if let Some(e) = edges {
        assert_eq!(
            (e.width(), e.height()),
            (points.width(), points.height()),
            "edge map and point grid must share their shape"
        );
    }
    let start = Instant::now();
    let ctx = FitContext {
        points,
        edges,
        options,
        mask,
    };
    let n = points.len();

    #[cfg(feature = "parallel")]
    let fits: Vec<PixelFit> = (0..n)
        .into_par_iter()
        .map_init(
            || vec![false; mask.len()],
            |admitted, idx| fit_pixel(&ctx, idx, admitted),
        )
        .collect();
    #[cfg(not(feature = "parallel"))]
    let fits: Vec<PixelFit> = {
        let mut admitted = vec![false; mask.len()];
        (0..n)
            .map(|idx| fit_pixel(&ctx, idx, &mut admitted))
            .collect()
    };

    let mut normals = NormalMap::new(points.width(), points.height());
    let mut labels = Vec::with_capacity(n);
    for (idx, fit) in fits.into_iter().enumerate() {
        match fit {
            PixelFit::Normal { normal, variation } => {
                normals.set(idx, normal, variation);
                labels.push(PixelLabel::Valid);
            }
            PixelFit::Rejected(label) => labels.push(label),
        }
    }
    let labels = LabelMap::from_labels(points.width(), points.height(), labels);
    let hist = labels.histogram();
    debug!(
        "estimate_normals w={} h={} valid={} edge={} invalid={} skipped={} elapsed_ms={:.3}",
        points.width(),
        points.height(),
        hist.valid,
        hist.edge,
        hist.invalid,
        hist.skipped,
        start.elapsed().as_secs_f64() * 1000.0
    );
    (normals, labels)
}

fn fit_pixel(ctx: &FitContext<'_>, idx: usize, admitted: &mut [bool]) -> PixelFit {
    let points = ctx.points;
    let Some(center) = points.point(idx) else {
        return PixelFit::Rejected(PixelLabel::Invalid);
    };
    if ctx.is_edge(idx) {
        return PixelFit::Rejected(PixelLabel::Edge);
    }
    if ctx.options.beyond_range(center.z) {
        return PixelFit::Rejected(PixelLabel::Skipped);
    }

    let (x, y) = points.coords(idx);
    let (w, h) = (points.width() as isize, points.height() as isize);
    let mut neighbours = 0usize;
    let mut sum = Vector3::<f64>::zeros();
    let mut sum_outer = Matrix3::<f64>::zeros();
    for (k, entry) in ctx.mask.entries().iter().enumerate() {
        admitted[k] = false;
        if entry.parent.is_some_and(|p| !admitted[p]) {
            continue;
        }
        let nx = x as isize + entry.dx;
        let ny = y as isize + entry.dy;
        if nx < 0 || ny < 0 || nx >= w || ny >= h {
            continue;
        }
        let j = (idx as isize + entry.delta) as usize;
        let Some(q) = points.point(j) else {
            continue;
        };
        if ctx.is_edge(j)
            || ctx.options.beyond_range(q.z)
            || (q.z - center.z).abs() > ctx.options.skip_distance
        {
            continue;
        }
        admitted[k] = true;
        neighbours += 1;
        // Centred on the pixel for conditioning; the centre adds a zero term.
        let d = Vector3::new(
            (q.x - center.x) as f64,
            (q.y - center.y) as f64,
            (q.z - center.z) as f64,
        );
        sum += d;
        sum_outer += d * d.transpose();
    }
    if neighbours < ctx.options.min_neighbors {
        return PixelFit::Rejected(PixelLabel::Invalid);
    }

    match fit_plane_normal(neighbours + 1, &sum, &sum_outer) {
        Some((normal, variation)) => PixelFit::Normal {
            normal: orient_towards_origin(normal, &center),
            variation,
        },
        None => PixelFit::Rejected(PixelLabel::Invalid),
    }
}

/// Least-squares plane normal from first and second moments of `count`
/// samples. Returns the unit normal and the surface variation.
fn fit_plane_normal(
    count: usize,
    sum: &Vector3<f64>,
    sum_outer: &Matrix3<f64>,
) -> Option<(Vector3<f32>, f32)> {
    let inv = 1.0 / count as f64;
    let mean = sum * inv;
    let cov = sum_outer * inv - mean * mean.transpose();
    let eig = SymmetricEigen::new(cov);
    let vals = eig.eigenvalues;
    let mut order = [0usize, 1, 2];
    order.sort_by(|&a, &b| vals[a].total_cmp(&vals[b]));
    let l0 = vals[order[0]].max(0.0);
    let l1 = vals[order[1]];
    let l2 = vals[order[2]];
    if !(l0.is_finite() && l1.is_finite() && l2.is_finite()) || l2 <= 0.0 {
        return None;
    }
    if l1 <= MIN_SPREAD_RATIO * l2 {
        // Collinear support: the plane is not determined.
        return None;
    }
    let v = eig.eigenvectors.column(order[0]);
    let normal = unit_or_none(&Vector3::new(v[0] as f32, v[1] as f32, v[2] as f32))?;
    let variation = (l0 / (l0 + l1 + l2)) as f32;
    Some((normal, variation))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edges::{compute_depth_edges, EdgeOptions};

    fn mask_for(points: &GridPointBuffer, options: &NormalOptions) -> NeighborMask {
        NeighborMask::new(points.width(), options.radius, options.pixel_step)
    }

    fn tilted_plane(width: usize, height: usize) -> GridPointBuffer {
        GridPointBuffer::from_fn(width, height, |x, y| {
            let px = x as f32 * 0.01 - 0.05;
            let py = y as f32 * 0.01 - 0.05;
            Some(Vector3::new(px, py, 1.0 + 0.2 * px))
        })
    }

    #[test]
    fn plane_normals_face_the_sensor() {
        let points = tilted_plane(12, 12);
        let options = NormalOptions::default();
        let (normals, labels) =
            estimate_normals(&points, None, &options, &mask_for(&points, &options));
        let expected = Vector3::new(0.2f32, 0.0, -1.0).normalize();
        for idx in 0..points.len() {
            assert_eq!(labels.get(idx), PixelLabel::Valid);
            let n = normals.normal(idx);
            assert!((n.norm() - 1.0).abs() < 1e-4);
            assert!(n.dot(&points.point(idx).unwrap()) <= 0.0);
            assert!(n.dot(&expected) > 0.9999, "pixel {idx}: {n:?}");
            assert!(normals.variation(idx) < 1e-4);
        }
    }

    #[test]
    fn missing_points_and_ranges_are_labelled() {
        let points = GridPointBuffer::from_fn(10, 10, |x, y| match (x, y) {
            (2, 2) => None,
            (7, 7) => Some(Vector3::new(0.0, 0.0, 9.0)),
            _ => Some(Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0)),
        });
        let options = NormalOptions {
            max_depth: Some(5.0),
            ..NormalOptions::default()
        };
        let (_, labels) = estimate_normals(&points, None, &options, &mask_for(&points, &options));
        assert_eq!(labels.get(points.index(2, 2)), PixelLabel::Invalid);
        assert_eq!(labels.get(points.index(7, 7)), PixelLabel::Skipped);
        assert_eq!(labels.get(points.index(5, 5)), PixelLabel::Valid);
    }

    #[test]
    fn edge_pixels_are_labelled_and_not_aggregated() {
        let points = GridPointBuffer::from_fn(10, 8, |x, y| {
            let z = if x < 5 { 1.0 } else { 1.5 };
            Some(Vector3::new(x as f32 * 0.01, y as f32 * 0.01, z))
        });
        let edges = compute_depth_edges(&points.depth_map(), &points, &EdgeOptions::default());
        let options = NormalOptions::default();
        let (normals, labels) =
            estimate_normals(&points, Some(&edges), &options, &mask_for(&points, &options));
        for y in 0..8 {
            assert_eq!(labels.get(points.index(4, y)), PixelLabel::Edge);
            assert_eq!(labels.get(points.index(5, y)), PixelLabel::Edge);
            for x in [0, 3, 6, 9] {
                let idx = points.index(x, y);
                assert_eq!(labels.get(idx), PixelLabel::Valid);
                assert!(normals.normal(idx).z < -0.9999);
            }
        }
    }

    #[test]
    fn too_few_neighbours_is_invalid() {
        // Isolated points separated by holes.
        let points = GridPointBuffer::from_fn(9, 9, |x, y| {
            (x % 4 == 0 && y % 4 == 0).then(|| Vector3::new(x as f32, y as f32, 1.0))
        });
        let options = NormalOptions {
            radius: 2,
            ..NormalOptions::default()
        };
        let (_, labels) = estimate_normals(&points, None, &options, &mask_for(&points, &options));
        assert_eq!(labels.histogram().valid, 0);
    }

    #[test]
    fn collinear_support_is_degenerate() {
        let points = GridPointBuffer::from_fn(9, 1, |x, _| {
            Some(Vector3::new(x as f32 * 0.01, 0.0, 1.0))
        });
        let options = NormalOptions::default();
        let (normals, labels) =
            estimate_normals(&points, None, &options, &mask_for(&points, &options));
        for idx in 0..points.len() {
            assert_eq!(labels.get(idx), PixelLabel::Invalid);
            assert!(normals.normal(idx).iter().all(|c| c.is_finite()));
        }
    }
}
