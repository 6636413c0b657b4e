//! Dense single-channel rasters shared by the depth, edge and debug outputs.
pub mod f32;
pub mod io;

pub use self::f32::ImageF32;
