use serde::{Deserialize, Serialize};

/// How the discontinuity between two neighbouring pixels is measured.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JumpMetric {
    /// Absolute difference of the z coordinates.
    #[default]
    Depth,
    /// Euclidean distance between the 3D points.
    Euclidean,
}

/// Options for the depth edge detector.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct EdgeOptions {
    /// Pixel distance to the compared neighbours (>= 1).
    pub pixel_offset: usize,
    /// Jump tolerated at zero depth, in metres.
    pub min_jump: f32,
    /// Quadratic growth of the tolerated jump with depth (1/m).
    pub noise_factor: f32,
    pub metric: JumpMetric,
    /// Strength at or above which a pixel blocks aggregation and growth.
    pub barrier_threshold: f32,
}

impl Default for EdgeOptions {
    fn default() -> Self {
        Self {
            pixel_offset: 1,
            min_jump: 0.02,
            noise_factor: 0.01,
            metric: JumpMetric::Depth,
            barrier_threshold: 0.5,
        }
    }
}

impl EdgeOptions {
    /// Jump tolerated between two pixels whose nearer depth is `z`.
    #[inline]
    pub fn tolerated_jump(&self, z: f32) -> f32 {
        (self.min_jump + self.noise_factor * z * z).max(1e-6)
    }

    /// Bounded strength of a jump of `jump` metres at depth `z`.
    #[inline]
    pub fn strength(&self, jump: f32, z: f32) -> f32 {
        if !jump.is_finite() || jump <= 0.0 {
            return 0.0;
        }
        let r = jump / self.tolerated_jump(z);
        r / (1.0 + r)
    }

    /// True when the jump between two depths would be reported as a barrier.
    #[inline]
    pub fn is_discontinuity(&self, jump: f32, z: f32) -> bool {
        self.strength(jump, z) >= self.barrier_threshold
    }
}
