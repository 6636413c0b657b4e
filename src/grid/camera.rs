use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// Pinhole camera model used to lift a depth raster into 3D points.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PinholeIntrinsics {
    pub fx: f32,
    pub fy: f32,
    pub cx: f32,
    pub cy: f32,
}

impl PinholeIntrinsics {
    /// Intrinsics with the principal point at the raster centre.
    pub fn centered(width: usize, height: usize, focal_px: f32) -> Self {
        Self {
            fx: focal_px,
            fy: focal_px,
            cx: width as f32 * 0.5,
            cy: height as f32 * 0.5,
        }
    }

    /// Back-project pixel `(u, v)` at depth `z` into the sensor frame.
    ///
    /// Returns `None` for non-positive or non-finite depth.
    #[inline]
    pub fn unproject(&self, u: usize, v: usize, z: f32) -> Option<Vector3<f32>> {
        if !z.is_finite() || z <= 0.0 || self.fx == 0.0 || self.fy == 0.0 {
            return None;
        }
        let x = (u as f32 - self.cx) * z / self.fx;
        let y = (v as f32 - self.cy) * z / self.fy;
        Some(Vector3::new(x, y, z))
    }
}

impl Default for PinholeIntrinsics {
    fn default() -> Self {
        // Typical structured-light sensor at VGA resolution.
        Self {
            fx: 525.0,
            fy: 525.0,
            cx: 319.5,
            cy: 239.5,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unproject_principal_point_lies_on_axis() {
        let k = PinholeIntrinsics::centered(64, 48, 100.0);
        let p = k.unproject(32, 24, 2.0).unwrap();
        assert!(p.x.abs() < 1e-6 && p.y.abs() < 1e-6);
        assert!((p.z - 2.0).abs() < 1e-6);
    }

    #[test]
    fn unproject_rejects_missing_depth() {
        let k = PinholeIntrinsics::default();
        assert!(k.unproject(10, 10, 0.0).is_none());
        assert!(k.unproject(10, 10, f32::NAN).is_none());
    }
}
