//! Depth-discontinuity edge detection on organized point clouds.
//!
//! The detector compares every measured pixel with its four axis neighbours
//! (at a configurable pixel offset) and converts the depth jump into a bounded
//! edge strength:
//!
//! - The tolerated jump grows with distance, `t(z) = min_jump + noise_factor·z²`,
//!   modelling the quadratic noise growth of triangulating depth sensors. It is
//!   evaluated at the nearer of the two depths.
//! - With `r = jump / t(z)` the pair strength is `r / (1 + r)`, so strength is
//!   bounded in `[0, 1)` and strictly increasing in the jump. A pixel keeps the
//!   strongest of its pair responses.
//! - Pixels without depth emit no signal and are never used as partners; they
//!   act as barriers through their labels further down the pipeline.
//!
//! Strengths at or above `barrier_threshold` (default `0.5`, i.e. `jump ≥ t`)
//! are treated as segmentation barriers by the normal estimator and the
//! region grower.
//!
//! Complexity: O(W·H); rows are independent and run on rayon when the
//! `parallel` feature is enabled.

mod depth;
mod options;

pub use depth::{compute_depth_edges, EdgeMap, EdgeSummary};
pub use options::{EdgeOptions, JumpMetric};
