use super::stages::{ClassifyStage, EdgeStage, NormalStage, RefineStage, SegmentationStage};
use super::TimingBreakdown;
use crate::classify::ClusterClassification;
use crate::segmentation::LabelHistogram;
use serde::Serialize;

/// Frame-level report written by the tools: trace plus per-cluster results.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SurfaceReport {
    pub trace: PipelineTrace,
    pub final_labels: LabelHistogram,
    pub clusters: Vec<ClusterClassification>,
}

/// What every stage of one pipeline run did and how long it took.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineTrace {
    pub input: InputDescriptor,
    pub timings: TimingBreakdown,
    pub edges: EdgeStage,
    pub normals: NormalStage,
    pub segmentation: SegmentationStage,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refine: Option<RefineStage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub classify: Option<ClassifyStage>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InputDescriptor {
    pub width: usize,
    pub height: usize,
    pub valid_points: usize,
}

impl PipelineTrace {
    /// One-line summary for logs.
    pub fn summary_line(&self) -> String {
        let merges = self
            .refine
            .as_ref()
            .map(|r| r.summary.merges.len().to_string())
            .unwrap_or_else(|| "-".to_string());
        format!(
            "{}x{} valid={} edges={} clusters={} merges={} total_ms={:.3}",
            self.input.width,
            self.input.height,
            self.input.valid_points,
            self.edges.summary.edge_pixels,
            self.segmentation.clusters,
            merges,
            self.timings.total_ms
        )
    }
}
