//! Serializable diagnostics describing a pipeline run.
//!
//! [`PipelineTrace`] is attached to every [`PipelineOutput`](crate::PipelineOutput)
//! and records the input shape, per-stage timings and a compact summary of
//! each stage (edge pixels, label histogram, clusters, merges, surface
//! types). [`SurfaceReport`] bundles the trace with per-cluster results for
//! the JSON written by the tools.

pub mod pipeline;
pub mod stages;
pub mod timing;

pub use pipeline::{InputDescriptor, PipelineTrace, SurfaceReport};
pub use stages::{ClassifyStage, EdgeStage, NormalStage, RefineStage, SegmentationStage};
pub use timing::{StageTiming, TimingBreakdown};
