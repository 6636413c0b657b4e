//! Edge-aware surface normal estimation on the pixel grid.
//!
//! Neighbours are looked up through the 2D grid instead of a 3D spatial index,
//! which keeps the work per pixel constant:
//!
//! - A precomputed [`NeighborMask`] lists offsets ring by ring up to the
//!   configured radius. An offset is admitted only if its parent (the previous
//!   ring toward the centre) was admitted, it holds a valid point, it is not an
//!   edge pixel and its depth is within `skip_distance` of the centre.
//! - The normal is the smallest-eigenvalue eigenvector of the covariance of the
//!   centre plus the admitted neighbours (f64 accumulation, nalgebra
//!   `SymmetricEigen`), flipped to face the sensor.
//! - The same pass emits the initial [`LabelMap`](crate::segmentation::LabelMap):
//!   valid, edge, invalid or skipped (beyond the working depth).
//!
//! Pixels are independent and are processed on rayon when the `parallel`
//! feature is enabled; results are collected in pixel order.

mod estimator;
mod map;
mod mask;
mod options;

pub use estimator::estimate_normals;
pub use map::NormalMap;
pub use mask::{MaskCache, MaskEntry, NeighborMask};
pub use options::NormalOptions;
