//! Surface detector orchestrating the per-frame pipeline.
//!
//! Overview
//! - Computes the depth-discontinuity edge map of the input grid.
//! - Estimates edge-aware normals with the cached neighbour mask and emits
//!   the initial labels (valid, edge, invalid, skipped).
//! - Grows clusters of consistent orientation and builds their adjacency
//!   graph.
//! - Optionally merges curvature-compatible neighbours and classifies every
//!   cluster (planar, convex, concave, edge, undefined), marking borders.
//!
//! Modules
//! - [`params`] – configuration types for every stage plus the stage toggles.
//! - `pipeline` – [`SurfaceDetector`] and the one-shot [`run_pipeline`].
//! - `workspace` – the neighbour-mask cache reused across frames.
//!
//! Parameters are validated before any stage runs; data problems (missing
//! depth, tiny clusters) never fail a frame and only show up in the labels and
//! surface types.

pub mod params;
mod pipeline;
mod workspace;

pub use params::PipelineParams;
pub use pipeline::{run_pipeline, PipelineOutput, SurfaceDetector};
pub use workspace::DetectorWorkspace;
