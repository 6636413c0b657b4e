use super::cluster::Cluster;
use super::graph::ClusterGraph;
use super::labels::{ClusterId, LabelMap, PixelLabel};
use super::options::SegmentationOptions;
use crate::angle::normal_cosine;
use crate::edges::EdgeMap;
use crate::grid::GridPointBuffer;
use crate::normals::NormalMap;
use log::debug;
use std::collections::VecDeque;
use std::time::Instant;

const UNVISITED: u8 = 0;
const QUEUED: u8 = 1;
const ASSIGNED: u8 = 2;

/// Grow clusters over the valid pixels and build their adjacency graph.
///
/// Every `Valid` pixel of `labels` is relabelled `Cluster(id)`; other labels
/// are left untouched. Seeds are taken in row-major order and grown
/// breadth-first over 4-neighbours (up, left, right, down). A neighbour joins
/// while its normal stays within `same_direction_cos` of the cluster's running
/// mean normal and it is not an edge barrier. Valid pixels that are barriers
/// in `edges` are relabelled `Edge`.
pub fn segment(
    points: &GridPointBuffer,
    normals: &NormalMap,
    labels: &mut LabelMap,
    edges: Option<&EdgeMap>,
    options: &SegmentationOptions,
) -> ClusterGraph {
    let (w, h) = (labels.width(), labels.height());
    assert_eq!((points.width(), points.height()), (w, h));
    assert_eq!((normals.width(), normals.height()), (w, h));
    let start = Instant::now();
    let is_barrier = |idx: usize| edges.is_some_and(|e| e.is_barrier(idx));

    let n = labels.len();
    let mut state = vec![UNVISITED; n];
    let mut queue = VecDeque::new();
    let mut clusters: Vec<Cluster> = Vec::new();

    for seed in 0..n {
        if state[seed] != UNVISITED || labels.get(seed) != PixelLabel::Valid {
            continue;
        }
        if is_barrier(seed) {
            labels.set(seed, PixelLabel::Edge);
            continue;
        }
        let id = ClusterId(clusters.len() as u32);
        let mut cluster = Cluster::new(id);
        state[seed] = QUEUED;
        queue.push_back(seed);

        while let Some(idx) = queue.pop_front() {
            let (x, y) = (idx % w, idx / w);
            let Some(point) = points.point(idx) else {
                panic!("valid label on pixel {idx} without a point");
            };
            state[idx] = ASSIGNED;
            labels.set(idx, PixelLabel::Cluster(id));
            cluster.push(idx, x, y, &point, &normals.normal(idx));
            let mean = cluster.mean_normal();

            let up = (y > 0).then(|| idx - w);
            let left = (x > 0).then(|| idx - 1);
            let right = (x + 1 < w).then(|| idx + 1);
            let down = (y + 1 < h).then(|| idx + w);
            for nb in [up, left, right, down].into_iter().flatten() {
                if state[nb] != UNVISITED
                    || labels.get(nb) != PixelLabel::Valid
                    || is_barrier(nb)
                {
                    continue;
                }
                if normal_cosine(&normals.normal(nb), &mean) >= options.same_direction_cos {
                    state[nb] = QUEUED;
                    queue.push_back(nb);
                }
            }
        }
        cluster.finish();
        clusters.push(cluster);
    }

    debug_assert_eq!(labels.histogram().valid, 0);

    let mut graph = ClusterGraph::from_clusters(clusters);
    link_adjacent_clusters(&mut graph, points, normals, labels, edges);
    graph.update_weights();
    graph.refresh_borders(labels);

    debug!(
        "segment clusters={} edges={} elapsed_ms={:.3}",
        graph.len(),
        graph.edge_count(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    graph
}

/// Add one boundary pair per right/down neighbour pair with different
/// clusters, skipping pairs separated by a depth discontinuity.
fn link_adjacent_clusters(
    graph: &mut ClusterGraph,
    points: &GridPointBuffer,
    normals: &NormalMap,
    labels: &LabelMap,
    edges: Option<&EdgeMap>,
) {
    let (w, h) = (labels.width(), labels.height());
    for y in 0..h {
        for x in 0..w {
            let idx = y * w + x;
            let Some(a) = labels.cluster_at(idx) else {
                continue;
            };
            let right = (x + 1 < w).then(|| idx + 1);
            let down = (y + 1 < h).then(|| idx + w);
            for nb in [right, down].into_iter().flatten() {
                let Some(b) = labels.cluster_at(nb) else {
                    continue;
                };
                if a == b {
                    continue;
                }
                if let (Some(e), Some(p), Some(q)) = (edges, points.point(idx), points.point(nb)) {
                    if e.is_pair_discontinuity(p.z, q.z) {
                        continue;
                    }
                }
                let cos = normal_cosine(&normals.normal(idx), &normals.normal(nb));
                graph.add_pair(a, b, cos);
            }
        }
    }
}
