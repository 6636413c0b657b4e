use crate::edges::EdgeSummary;
use crate::refine::RefineSummary;
use crate::segmentation::LabelHistogram;
use crate::types::SurfaceHistogram;
use serde::Serialize;

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeStage {
    pub elapsed_ms: f64,
    pub summary: EdgeSummary,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalStage {
    pub elapsed_ms: f64,
    /// Whether the edge map gated the neighbourhoods.
    pub edge_aware: bool,
    pub mask_entries: usize,
    /// Neighbour masks built by the workspace so far (1 after the first frame
    /// unless the grid width or radius changes).
    pub mask_builds: usize,
    pub labels: LabelHistogram,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SegmentationStage {
    pub elapsed_ms: f64,
    pub clusters: usize,
    pub adjacencies: usize,
    pub largest_cluster: usize,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineStage {
    pub elapsed_ms: f64,
    #[serde(flatten)]
    pub summary: RefineSummary,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifyStage {
    pub elapsed_ms: f64,
    pub surfaces: SurfaceHistogram,
    pub border_pixels: usize,
}
