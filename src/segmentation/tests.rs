use super::*;
use crate::edges::{compute_depth_edges, EdgeMap, EdgeOptions};
use crate::grid::GridPointBuffer;
use crate::normals::{estimate_normals, NeighborMask, NormalMap, NormalOptions};
use nalgebra::Vector3;

fn grid_from_depth<F>(width: usize, height: usize, depth: F) -> GridPointBuffer
where
    F: Fn(usize, usize) -> Option<f32>,
{
    GridPointBuffer::from_fn(width, height, |x, y| {
        depth(x, y).map(|z| Vector3::new(x as f32 * 0.01, y as f32 * 0.01, z))
    })
}

fn run(points: &GridPointBuffer) -> (EdgeMap, NormalMap, LabelMap, ClusterGraph) {
    let edges = compute_depth_edges(&points.depth_map(), points, &EdgeOptions::default());
    let options = NormalOptions::default();
    let mask = NeighborMask::new(points.width(), options.radius, options.pixel_step);
    let (normals, mut labels) = estimate_normals(points, Some(&edges), &options, &mask);
    let graph = segment(
        points,
        &normals,
        &mut labels,
        Some(&edges),
        &SegmentationOptions::default(),
    );
    (edges, normals, labels, graph)
}

fn assert_partition(labels: &LabelMap, graph: &ClusterGraph) {
    let mut owner = vec![None; labels.len()];
    for cluster in graph.clusters() {
        for &idx in &cluster.pixels {
            assert!(owner[idx].is_none(), "pixel {idx} in two clusters");
            owner[idx] = Some(cluster.id);
        }
    }
    for (idx, own) in owner.iter().enumerate() {
        assert_eq!(labels.cluster_at(idx), *own, "pixel {idx}");
        assert_ne!(labels.get(idx), PixelLabel::Valid);
    }
}

#[test]
fn plane_is_one_cluster_with_perimeter_border() {
    let points = grid_from_depth(10, 10, |_, _| Some(1.0));
    let (_, _, labels, graph) = run(&points);
    assert_eq!(graph.len(), 1);
    assert_eq!(graph.edge_count(), 0);
    assert_partition(&labels, &graph);
    let cluster = graph.clusters().next().unwrap();
    assert_eq!(cluster.len(), 100);
    assert_eq!(cluster.border.len(), 36);
    for &idx in &cluster.border {
        let (x, y) = points.coords(idx);
        assert!(x == 0 || y == 0 || x == 9 || y == 9);
    }
}

#[test]
fn depth_step_splits_clusters_without_linking_them() {
    let points = grid_from_depth(10, 10, |x, _| Some(if x < 5 { 1.0 } else { 1.5 }));
    let (edges, _, labels, graph) = run(&points);
    assert!(graph.len() >= 2);
    assert_partition(&labels, &graph);
    for y in 0..10 {
        assert!(edges.is_barrier(points.index(5, y)));
        assert_eq!(labels.get(points.index(5, y)), PixelLabel::Edge);
    }
    let left = labels.cluster_at(points.index(0, 0)).unwrap();
    let right = labels.cluster_at(points.index(9, 0)).unwrap();
    assert_ne!(left, right);
    assert!(graph.edge(left, right).is_none());
}

#[test]
fn invalid_hole_is_not_clustered() {
    let points = grid_from_depth(12, 12, |x, y| {
        (!((4..8).contains(&x) && (4..8).contains(&y))).then_some(1.0)
    });
    let (_, _, labels, graph) = run(&points);
    assert_partition(&labels, &graph);
    for y in 4..8 {
        for x in 4..8 {
            assert_eq!(labels.get(points.index(x, y)), PixelLabel::Invalid);
        }
    }
    assert_eq!(graph.len(), 1);
}

#[test]
fn roof_splits_into_adjacent_clusters() {
    let points = grid_from_depth(20, 12, |x, _| {
        let px = (x as f32 - 9.5) * 0.01;
        Some(1.0 + 0.6 * px.abs())
    });
    let (_, _, labels, graph) = run(&points);
    assert_partition(&labels, &graph);
    assert!(graph.len() >= 2);
    assert!(graph.edge_count() >= 1);
    let left = labels.cluster_at(points.index(0, 6)).unwrap();
    let right = labels.cluster_at(points.index(19, 6)).unwrap();
    assert_ne!(left, right);
    for (a, b, edge) in graph.edges() {
        assert!(a < b);
        assert!(edge.pair_count > 0);
        assert!(edge.weight >= 0.0);
    }
}

#[test]
fn segmentation_is_deterministic() {
    let points = grid_from_depth(24, 16, |x, y| {
        let px = (x as f32 - 12.0) * 0.01;
        let py = (y as f32 - 8.0) * 0.01;
        Some(1.0 + 0.5 * px.abs() + 3.0 * py * py)
    });
    let (_, _, first, g1) = run(&points);
    let (_, _, second, g2) = run(&points);
    assert_eq!(first.as_slice(), second.as_slice());
    assert_eq!(g1.cluster_ids(), g2.cluster_ids());
}

#[test]
fn merge_relabels_and_rewires() {
    let points = grid_from_depth(20, 12, |x, _| {
        let px = (x as f32 - 9.5) * 0.01;
        Some(1.0 + 0.6 * px.abs())
    });
    let (_, _, mut labels, mut graph) = run(&points);
    let before = graph.len();
    let left = labels.cluster_at(points.index(0, 6)).unwrap();
    let neighbour = graph.neighbors(left)[0];
    let survivor = graph.merge(&mut labels, left, neighbour);
    let absorbed = if survivor == left { neighbour } else { left };

    assert_eq!(graph.len(), before - 1);
    assert!(graph.cluster(absorbed).is_none());
    assert_eq!(graph.find(absorbed), survivor);
    assert_eq!(graph.find(left), graph.find(neighbour));
    assert!(graph.edge(survivor, absorbed).is_none());
    assert!(graph
        .edges()
        .all(|(a, b, _)| graph.cluster(a).is_some() && graph.cluster(b).is_some()));
    // Merging again through a stale id is a no-op.
    assert_eq!(graph.merge(&mut labels, absorbed, survivor), survivor);
    assert_partition(&labels, &graph);
}
