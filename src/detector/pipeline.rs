//! Pipeline driving one organized point cloud frame end-to-end.
//!
//! Stages run in order: depth edges, edge-aware normals (with the initial
//! labels), region growing, curvature-driven refinement, classification. Each
//! stage consumes the previous stage's output; the only in-place updates are
//! the refiner and classifier writing to the cluster graph (and, through
//! merges, to the labels).
//!
//! Typical usage:
//! ```no_run
//! use surface_classifier::{build_grid_from_depth_source, PipelineParams, SurfaceDetector};
//! use nalgebra::Vector3;
//!
//! # fn main() -> Result<(), surface_classifier::ConfigError> {
//! let grid = build_grid_from_depth_source(64, 48, |x, y| {
//!     Some(Vector3::new(x as f32 * 0.01, y as f32 * 0.01, 1.0))
//! });
//! let mut detector = SurfaceDetector::new(PipelineParams::default());
//! let output = detector.process(&grid)?;
//! for cluster in &output.classifications {
//!     println!("{} {} px={}", cluster.id, cluster.surface, cluster.pixel_count);
//! }
//! # Ok(())
//! # }
//! ```
use super::params::PipelineParams;
use super::workspace::DetectorWorkspace;
use crate::classify::{classify, BorderMask, ClusterClassification};
use crate::diagnostics::{
    ClassifyStage, EdgeStage, InputDescriptor, NormalStage, PipelineTrace, RefineStage,
    SegmentationStage, SurfaceReport, TimingBreakdown,
};
use crate::edges::{compute_depth_edges, EdgeMap};
use crate::error::{ConfigError, Result};
use crate::grid::GridPointBuffer;
use crate::normals::{estimate_normals, NormalMap};
use crate::refine::refine;
use crate::segmentation::{segment, ClusterGraph, LabelMap};
use log::debug;
use std::time::Instant;

/// Everything one pipeline run produced.
#[derive(Clone, Debug)]
pub struct PipelineOutput {
    pub edges: EdgeMap,
    pub normals: NormalMap,
    /// Final labels: clusters (after merges), edge, invalid and skipped pixels.
    pub labels: LabelMap,
    pub clusters: ClusterGraph,
    /// One entry per live cluster; empty when classification is disabled.
    pub classifications: Vec<ClusterClassification>,
    /// `None` when classification is disabled.
    pub border: Option<BorderMask>,
    pub trace: PipelineTrace,
}

impl PipelineOutput {
    /// Serializable summary of the run.
    pub fn report(&self) -> SurfaceReport {
        SurfaceReport {
            trace: self.trace.clone(),
            final_labels: self.labels.histogram(),
            clusters: self.classifications.clone(),
        }
    }
}

/// Long-lived pipeline runner; reuses the neighbour mask across frames.
pub struct SurfaceDetector {
    params: PipelineParams,
    workspace: DetectorWorkspace,
}

impl SurfaceDetector {
    pub fn new(params: PipelineParams) -> Self {
        Self {
            params,
            workspace: DetectorWorkspace::new(),
        }
    }

    pub fn params(&self) -> &PipelineParams {
        &self.params
    }

    /// Replace the parameters; the mask cache adapts on the next frame.
    pub fn set_params(&mut self, params: PipelineParams) {
        self.params = params;
    }

    /// Run every enabled stage on `points`.
    ///
    /// Parameters and input are validated first; on error no stage runs.
    pub fn process(&mut self, points: &GridPointBuffer) -> Result<PipelineOutput> {
        self.params.validate()?;
        if points.is_empty() {
            return Err(ConfigError::EmptyGrid {
                width: points.width(),
                height: points.height(),
            });
        }
        let params = &self.params;
        let total = Instant::now();
        let mut timings = TimingBreakdown::default();
        debug!(
            "SurfaceDetector::process start w={} h={} refine={} classify={}",
            points.width(),
            points.height(),
            params.enable_refine,
            params.enable_classify
        );

        let depth = points.depth_map();
        let (edges, edge_ms) = timings.measure("edges", || {
            compute_depth_edges(&depth, points, &params.edges)
        });
        let edge_stage = EdgeStage {
            elapsed_ms: edge_ms,
            summary: edges.summary(),
        };
        let gate = params.segmentation.use_edges.then_some(&edges);

        let mask = self.workspace.neighbor_mask(points.width(), &params.normals);
        let mask_entries = mask.len();
        let ((normals, mut labels), normal_ms) = timings.measure("normals", || {
            estimate_normals(points, gate, &params.normals, mask)
        });
        let normal_stage = NormalStage {
            elapsed_ms: normal_ms,
            edge_aware: gate.is_some(),
            mask_entries,
            mask_builds: self.workspace.mask_builds(),
            labels: labels.histogram(),
        };

        let (mut graph, seg_ms) = timings.measure("segmentation", || {
            segment(points, &normals, &mut labels, gate, &params.segmentation)
        });
        let segmentation_stage = SegmentationStage {
            elapsed_ms: seg_ms,
            clusters: graph.len(),
            adjacencies: graph.edge_count(),
            largest_cluster: graph.clusters().map(|c| c.len()).max().unwrap_or(0),
        };

        let refine_stage = if params.enable_refine {
            let (summary, ms) = timings.measure("refine", || {
                refine(&mut graph, points, &normals, &mut labels, &params.refine)
            });
            Some(RefineStage {
                elapsed_ms: ms,
                summary,
            })
        } else {
            None
        };

        let (classifications, border, classify_stage) = if params.enable_classify {
            let (result, ms) = timings.measure("classify", || {
                classify(&mut graph, points, &normals, &labels, &params.classify)
            });
            let stage = ClassifyStage {
                elapsed_ms: ms,
                surfaces: result.histogram(),
                border_pixels: result.border.count(),
            };
            (result.clusters, Some(result.border), Some(stage))
        } else {
            graph.refresh_borders(&labels);
            (Vec::new(), None, None)
        };

        timings.total_ms = total.elapsed().as_secs_f64() * 1000.0;
        let trace = PipelineTrace {
            input: InputDescriptor {
                width: points.width(),
                height: points.height(),
                valid_points: points.valid_count(),
            },
            timings,
            edges: edge_stage,
            normals: normal_stage,
            segmentation: segmentation_stage,
            refine: refine_stage,
            classify: classify_stage,
        };
        debug!("SurfaceDetector::process done {}", trace.summary_line());

        Ok(PipelineOutput {
            edges,
            normals,
            labels,
            clusters: graph,
            classifications,
            border,
            trace,
        })
    }
}

/// One-shot pipeline run with a fresh workspace.
pub fn run_pipeline(points: &GridPointBuffer, params: &PipelineParams) -> Result<PipelineOutput> {
    SurfaceDetector::new(params.clone()).process(points)
}
