//! Per-cluster geometric classification and border marking.
//!
//! For every live cluster the classifier samples every `sample_step`-th pixel
//! (row-major) and evaluates the mean curvature `H = (κx + κy) / 2` with the
//! shared estimator at `mask_size / 2` pixels. The samples decide the type:
//!
//! - too few samples: [`SurfaceType::Undefined`](crate::types::SurfaceType);
//! - `|mean H|` and `mean |H|` both below `planar_threshold`: planar;
//! - mean `H ≥ planar_threshold` with at least `consistency` positive
//!   samples: convex (bulging toward the sensor), mirrored for concave;
//! - curvature concentrated on the border (`edge_ratio` times the interior
//!   level): edge/rim;
//! - anything else stays undefined.
//!
//! Border pixels are cluster pixels with a 4-neighbour outside the grid or
//! outside the cluster; they are collected into a [`BorderMask`].
//!
//! Classification never fails: missing data lowers the sample count and ends
//! in `Undefined`.

mod options;
mod surface;

pub use options::ClassifyOptions;
pub use surface::{classify, BorderMask, Classification, ClusterClassification};
