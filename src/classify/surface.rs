use super::options::ClassifyOptions;
use crate::curvature::{mean_curvature_at, CurvatureStats};
use crate::grid::GridPointBuffer;
use crate::image::ImageF32;
use crate::normals::NormalMap;
use crate::segmentation::{ClusterGraph, ClusterId, LabelMap, PixelBounds};
use crate::types::{SurfaceHistogram, SurfaceType};
use log::debug;
use serde::Serialize;
use std::time::Instant;

/// Pixels lying on a cluster border.
#[derive(Clone, Debug)]
pub struct BorderMask {
    width: usize,
    height: usize,
    mask: Vec<bool>,
}

impl BorderMask {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            mask: vec![false; width * height],
        }
    }

    #[inline]
    pub fn is_border(&self, idx: usize) -> bool {
        self.mask[idx]
    }

    pub fn count(&self) -> usize {
        self.mask.iter().filter(|&&b| b).count()
    }

    /// `1.0` on border pixels, `0.0` elsewhere.
    pub fn to_image(&self) -> ImageF32 {
        let data = self
            .mask
            .iter()
            .map(|&b| if b { 1.0 } else { 0.0 })
            .collect();
        ImageF32::from_vec(self.width, self.height, data)
    }
}

/// Shape descriptors and decision for one cluster.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterClassification {
    pub id: ClusterId,
    pub surface: SurfaceType,
    pub pixel_count: usize,
    pub border_pixels: usize,
    pub bounds: Option<PixelBounds>,
    pub centroid: [f32; 3],
    pub mean_normal: [f32; 3],
    pub samples: usize,
    pub mean_curvature: f32,
    pub mean_abs_curvature: f32,
    pub positive_fraction: f32,
    pub negative_fraction: f32,
    pub border_mean_abs_curvature: f32,
    pub interior_mean_abs_curvature: f32,
}

/// Result of [`classify`].
#[derive(Clone, Debug)]
pub struct Classification {
    /// One entry per live cluster, in id order.
    pub clusters: Vec<ClusterClassification>,
    pub border: BorderMask,
}

impl Classification {
    pub fn histogram(&self) -> SurfaceHistogram {
        self.clusters.iter().map(|c| c.surface).collect()
    }
}

/// Classify every live cluster of `graph` and mark cluster borders.
///
/// Border lists are refreshed first; the surface type and the curvature
/// statistics of every cluster are written back to the graph.
pub fn classify(
    graph: &mut ClusterGraph,
    points: &GridPointBuffer,
    normals: &NormalMap,
    labels: &LabelMap,
    options: &ClassifyOptions,
) -> Classification {
    let start = Instant::now();
    graph.refresh_borders(labels);

    let mut border = BorderMask::new(labels.width(), labels.height());
    for cluster in graph.clusters() {
        for &idx in &cluster.border {
            border.mask[idx] = true;
        }
    }

    let offset = options.curvature_offset();
    let mut results = Vec::with_capacity(graph.len());
    for id in graph.cluster_ids() {
        let Some(cluster) = graph.cluster(id) else {
            continue;
        };
        let mut all = CurvatureStats::default();
        let mut on_border = CurvatureStats::default();
        let mut interior = CurvatureStats::default();
        for &idx in cluster.pixels.iter().step_by(options.sample_step.max(1)) {
            let same = |j: usize| labels.cluster_at(j) == Some(id);
            let Some(h) = mean_curvature_at(points, normals, idx, offset, same) else {
                continue;
            };
            all.push(h);
            if border.is_border(idx) {
                on_border.push(h);
            } else {
                interior.push(h);
            }
        }
        let surface = decide(&all, &on_border, &interior, options);
        results.push(ClusterClassification {
            id,
            surface,
            pixel_count: cluster.len(),
            border_pixels: cluster.border.len(),
            bounds: cluster.bounds,
            centroid: cluster.centroid().into(),
            mean_normal: cluster.mean_normal().into(),
            samples: all.samples,
            mean_curvature: all.mean_h(),
            mean_abs_curvature: all.mean_abs_h(),
            positive_fraction: all.positive_fraction(),
            negative_fraction: all.negative_fraction(),
            border_mean_abs_curvature: on_border.mean_abs_h(),
            interior_mean_abs_curvature: interior.mean_abs_h(),
        });
        graph.set_curvature(id, all);
    }
    for result in &results {
        graph.set_surface(result.id, result.surface);
    }

    let classification = Classification {
        clusters: results,
        border,
    };
    let hist = classification.histogram();
    debug!(
        "classify clusters={} planar={} convex={} concave={} edge={} undefined={} border_px={} elapsed_ms={:.3}",
        classification.clusters.len(),
        hist.planar,
        hist.convex,
        hist.concave,
        hist.edge,
        hist.undefined,
        classification.border.count(),
        start.elapsed().as_secs_f64() * 1000.0
    );
    classification
}

/// Decision rule over the sample statistics of one cluster.
pub(crate) fn decide(
    all: &CurvatureStats,
    on_border: &CurvatureStats,
    interior: &CurvatureStats,
    options: &ClassifyOptions,
) -> SurfaceType {
    let t = options.planar_threshold;
    if all.samples < options.min_samples.max(1) {
        return SurfaceType::Undefined;
    }
    let mean = all.mean_h();
    if mean.abs() < t && all.mean_abs_h() < t {
        return SurfaceType::Planar;
    }
    if mean >= t && all.positive_fraction() >= options.consistency {
        return SurfaceType::Convex;
    }
    if mean <= -t && all.negative_fraction() >= options.consistency {
        return SurfaceType::Concave;
    }
    let rim = on_border.mean_abs_h();
    if on_border.samples > 0 && rim >= t && rim >= options.edge_ratio * interior.mean_abs_h() {
        return SurfaceType::Edge;
    }
    SurfaceType::Undefined
}
