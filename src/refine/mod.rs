//! Curvature-driven merging of over-segmented clusters.
//!
//! Region growing with a strict normal threshold splits smoothly curved
//! surfaces into several clusters. The refiner merges adjacent clusters whose
//! shapes agree:
//!
//! - Every live cluster gets curvature statistics from the shared
//!   normal-divergence estimator ([`crate::curvature`]) at
//!   `curvature_offset` pixels.
//! - An edge `(a, b)` of the [`ClusterGraph`](crate::segmentation::ClusterGraph)
//!   is a candidate when `|H_a − H_b| < curvature_threshold` and the mean
//!   cosine between pixel normals across the boundary is at least
//!   `boundary_cos`.
//! - Each iteration merges the best candidate only (lowest score, ties by
//!   ids) through [`ClusterGraph::merge`](crate::segmentation::ClusterGraph::merge),
//!   then recomputes the survivor's curvature. The loop stops when no
//!   candidate is left or after `max_iterations` merges, so the cluster count
//!   never increases and the loop always terminates.
//!
//! Clusters separated by a depth discontinuity are never adjacent in the
//! graph and therefore never merge.

mod iteration;
mod options;

pub use iteration::{refine, MergeRecord, RefineSummary};
pub use options::RefineOptions;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::GridPointBuffer;
    use crate::normals::NormalMap;
    use crate::segmentation::{segment, LabelMap, PixelLabel, SegmentationOptions};
    use nalgebra::Vector3;

    const SPLIT_X: usize = 6;

    /// 12×8 plane whose right half carries normals tilted by `tilt(x)` radians
    /// about the y axis, segmented with a strict threshold so the halves split.
    fn two_halves<F>(tilt: F) -> (GridPointBuffer, NormalMap, LabelMap)
    where
        F: Fn(usize) -> f32,
    {
        let (w, h) = (12, 8);
        let points = GridPointBuffer::from_fn(w, h, |x, y| {
            Some(Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0))
        });
        let mut normals = NormalMap::new(w, h);
        for idx in 0..points.len() {
            let (x, _) = points.coords(idx);
            let theta = if x < SPLIT_X { 0.0 } else { tilt(x) };
            normals.set(idx, Vector3::new(theta.sin(), 0.0, -theta.cos()), 0.0);
        }
        let labels = LabelMap::from_labels(w, h, vec![PixelLabel::Valid; w * h]);
        (points, normals, labels)
    }

    fn strict() -> SegmentationOptions {
        SegmentationOptions {
            same_direction_cos: 0.999,
            use_edges: true,
        }
    }

    #[test]
    fn coplanar_clusters_with_matching_normals_merge() {
        let (points, normals, mut labels) = two_halves(|_| 3f32.to_radians());
        let mut graph = segment(&points, &normals, &mut labels, None, &strict());
        assert_eq!(graph.len(), 2);

        let summary = refine(
            &mut graph,
            &points,
            &normals,
            &mut labels,
            &RefineOptions::default(),
        );
        assert_eq!(summary.merges.len(), 1);
        assert_eq!(graph.len(), 1);
        assert_eq!(summary.clusters_before, 2);
        assert_eq!(summary.clusters_after, 1);
        assert!(!summary.hit_iteration_cap);
        let id = labels.cluster_at(0).unwrap();
        assert!((0..labels.len()).all(|i| labels.cluster_at(i) == Some(id)));
        assert_eq!(graph.cluster(id).unwrap().len(), 96);
    }

    #[test]
    fn iteration_cap_stops_merging() {
        let (points, normals, mut labels) = two_halves(|_| 3f32.to_radians());
        let mut graph = segment(&points, &normals, &mut labels, None, &strict());
        let options = RefineOptions {
            max_iterations: 0,
            ..RefineOptions::default()
        };
        let summary = refine(&mut graph, &points, &normals, &mut labels, &options);
        assert!(summary.hit_iteration_cap);
        assert!(summary.merges.is_empty());
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn curvature_mismatch_blocks_merge() {
        // Right half bends at 0.02 rad per pixel: κx ≈ 2, H ≈ 1 against a flat
        // left half.
        let (points, normals, mut labels) =
            two_halves(|x| 3f32.to_radians() + 0.02 * (x - SPLIT_X) as f32);
        let mut graph = segment(&points, &normals, &mut labels, None, &strict());
        let left = labels.cluster_at(points.index(0, 0)).unwrap();
        let right = labels.cluster_at(points.index(SPLIT_X, 0)).unwrap();
        assert_ne!(left, right);

        refine(
            &mut graph,
            &points,
            &normals,
            &mut labels,
            &RefineOptions::default(),
        );
        assert_ne!(
            labels.cluster_at(points.index(0, 0)),
            labels.cluster_at(points.index(SPLIT_X, 0))
        );
        let flat = graph.cluster(graph.find(left)).unwrap();
        assert!(flat.curvature.mean_abs_h() < 1e-4);
    }

    #[test]
    fn rough_boundary_blocks_merge() {
        let (points, normals, mut labels) = two_halves(|_| 3f32.to_radians());
        let mut graph = segment(&points, &normals, &mut labels, None, &strict());
        let options = RefineOptions {
            boundary_cos: 0.9999,
            ..RefineOptions::default()
        };
        let summary = refine(&mut graph, &points, &normals, &mut labels, &options);
        assert!(summary.merges.is_empty());
        assert_eq!(graph.len(), 2);
    }
}
