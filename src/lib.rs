#![doc = include_str!("../README.md")]

// Public modules (stable-ish surface)
pub mod config;
pub mod detector;
pub mod diagnostics;
pub mod error;
pub mod grid;
pub mod image;
pub mod types;

// Per-stage building blocks. Public so tools can run stages in isolation.
pub mod angle;
pub mod classify;
pub mod curvature;
pub mod edges;
pub mod normals;
pub mod refine;
pub mod segmentation;

// --- High-level re-exports -------------------------------------------------

// Main entry points: detector + results.
pub use crate::detector::{
    run_pipeline, DetectorWorkspace, PipelineOutput, PipelineParams, SurfaceDetector,
};
pub use crate::error::ConfigError;
pub use crate::types::{SurfaceHistogram, SurfaceType};

// Input construction.
pub use crate::grid::{build_grid_from_depth_source, GridPointBuffer, PinholeIntrinsics};

// High-level diagnostics returned by the detector.
pub use crate::diagnostics::{PipelineTrace, SurfaceReport};

// --- Prelude ---------------------------------------------------------------

/// Small prelude for quick experiments.
///
/// ```no_run
/// use surface_classifier::prelude::*;
///
/// # fn main() -> Result<(), ConfigError> {
/// let (w, h) = (64usize, 48usize);
/// let intrinsics = PinholeIntrinsics::centered(w, h, 60.0);
/// let mut depth = ImageF32::new(w, h);
/// for y in 0..h {
///     for x in 0..w {
///         depth.set(x, y, 1.2);
///     }
/// }
/// let grid = GridPointBuffer::from_depth(&depth, &intrinsics);
///
/// let mut det = SurfaceDetector::new(PipelineParams::default());
/// let output = det.process(&grid)?;
/// println!("{}", output.trace.summary_line());
/// # Ok(())
/// # }
/// ```
pub mod prelude {
    pub use crate::image::ImageF32;
    pub use crate::segmentation::{ClusterId, PixelLabel};
    pub use crate::{
        ConfigError, GridPointBuffer, PinholeIntrinsics, PipelineOutput, PipelineParams,
        SurfaceDetector, SurfaceType,
    };
}

// --- Stage-level API (for tools & advanced users) --------------------------

pub mod stages {
    // Stage runners.
    pub use crate::classify::classify;
    pub use crate::edges::compute_depth_edges;
    pub use crate::normals::estimate_normals;
    pub use crate::refine::refine;
    pub use crate::segmentation::segment;

    // Structured diagnostics types.
    pub use crate::diagnostics::{
        ClassifyStage, EdgeStage, InputDescriptor, NormalStage, RefineStage, SegmentationStage,
        StageTiming, TimingBreakdown,
    };
}
