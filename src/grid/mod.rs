//! Organized point storage: one 3D point per pixel of the source image.
//!
//! - [`GridPointBuffer`]: row-major `width × height` grid of sensor-frame
//!   points with an invalid sentinel, addressed by `(x, y)` or a linear index.
//! - [`PinholeIntrinsics`]: back-projection of a depth raster into a grid.
//!
//! Everything downstream (edges, normals, labels) shares the grid's shape and
//! linear indexing `idx = y * width + x`.

mod buffer;
mod camera;

pub use buffer::{build_grid_from_depth_source, GridPointBuffer};
pub use camera::PinholeIntrinsics;
