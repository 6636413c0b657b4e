use super::options::RefineOptions;
use crate::curvature::{region_curvature, CurvatureStats};
use crate::grid::GridPointBuffer;
use crate::normals::NormalMap;
use crate::segmentation::{ClusterGraph, ClusterId, LabelMap};
use log::debug;
use serde::Serialize;
use std::cmp::Ordering;
use std::time::Instant;

/// One accepted merge.
#[derive(Clone, Copy, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MergeRecord {
    pub iteration: usize,
    pub survivor: ClusterId,
    pub absorbed: ClusterId,
    /// Mean-curvature difference that made the pair the best candidate.
    pub score: f32,
    pub boundary_cos: f32,
}

/// Outcome of a refinement run.
#[derive(Clone, Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineSummary {
    pub clusters_before: usize,
    pub clusters_after: usize,
    pub iterations: usize,
    /// True when the iteration cap stopped the loop with candidates left.
    pub hit_iteration_cap: bool,
    pub merges: Vec<MergeRecord>,
}

#[derive(Clone, Copy, Debug)]
struct Candidate {
    a: ClusterId,
    b: ClusterId,
    score: f32,
    boundary_cos: f32,
}

impl Candidate {
    fn better_than(&self, other: &Candidate) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Less => true,
            Ordering::Greater => false,
            Ordering::Equal => (self.a, self.b) < (other.a, other.b),
        }
    }
}

/// Merge curvature-compatible neighbours until none remain or the iteration
/// cap is reached.
///
/// Each iteration merges the single best candidate: the edge with the lowest
/// mean-curvature difference below `curvature_threshold` whose boundary mean
/// cosine is at least `boundary_cos`. The survivor's curvature statistics are
/// recomputed after every merge.
pub fn refine(
    graph: &mut ClusterGraph,
    points: &GridPointBuffer,
    normals: &NormalMap,
    labels: &mut LabelMap,
    options: &RefineOptions,
) -> RefineSummary {
    let start = Instant::now();
    let mut summary = RefineSummary {
        clusters_before: graph.len(),
        ..RefineSummary::default()
    };

    for id in graph.cluster_ids() {
        let stats = cluster_curvature(graph, points, normals, labels, id, options);
        graph.set_curvature(id, stats);
    }

    loop {
        let Some(best) = best_candidate(graph, options) else {
            break;
        };
        if summary.iterations >= options.max_iterations {
            summary.hit_iteration_cap = true;
            break;
        }
        summary.iterations += 1;
        let survivor = graph.merge(labels, best.a, best.b);
        let absorbed = if survivor == best.a { best.b } else { best.a };
        let stats = cluster_curvature(graph, points, normals, labels, survivor, options);
        graph.set_curvature(survivor, stats);
        summary.merges.push(MergeRecord {
            iteration: summary.iterations,
            survivor,
            absorbed,
            score: best.score,
            boundary_cos: best.boundary_cos,
        });
    }

    summary.clusters_after = graph.len();
    debug!(
        "refine clusters {} -> {} merges={} cap_hit={} elapsed_ms={:.3}",
        summary.clusters_before,
        summary.clusters_after,
        summary.merges.len(),
        summary.hit_iteration_cap,
        start.elapsed().as_secs_f64() * 1000.0
    );
    summary
}

fn best_candidate(graph: &ClusterGraph, options: &RefineOptions) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for (a, b, edge) in graph.edges() {
        let boundary_cos = edge.mean_boundary_cos();
        if boundary_cos < options.boundary_cos {
            continue;
        }
        let (Some(ca), Some(cb)) = (graph.cluster(a), graph.cluster(b)) else {
            panic!("edge ({a}, {b}) references a removed cluster");
        };
        let score = (ca.curvature.mean_h() - cb.curvature.mean_h()).abs();
        if !(score < options.curvature_threshold) {
            continue;
        }
        let cand = Candidate {
            a,
            b,
            score,
            boundary_cos,
        };
        if best.as_ref().map_or(true, |cur| cand.better_than(cur)) {
            best = Some(cand);
        }
    }
    best
}

fn cluster_curvature(
    graph: &ClusterGraph,
    points: &GridPointBuffer,
    normals: &NormalMap,
    labels: &LabelMap,
    id: ClusterId,
    options: &RefineOptions,
) -> CurvatureStats {
    let Some(cluster) = graph.cluster(id) else {
        return CurvatureStats::default();
    };
    region_curvature(
        points,
        normals,
        &cluster.pixels,
        options.curvature_offset,
        1,
        |j| labels.cluster_at(j) == Some(id),
    )
}
