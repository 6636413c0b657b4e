use serde::{Deserialize, Serialize};

/// Options for the edge-aware normal estimator.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalOptions {
    /// Neighbourhood radius in pixels (Chebyshev distance).
    pub radius: usize,
    /// Stride between neighbourhood rings and samples, in pixels.
    pub pixel_step: usize,
    /// Minimum admitted neighbours (centre excluded) for a normal.
    pub min_neighbors: usize,
    /// Largest |Δz| (m) between the centre and an admitted neighbour.
    pub skip_distance: f32,
    /// Pixels farther than this depth (m) are labelled skipped.
    pub max_depth: Option<f32>,
}

impl Default for NormalOptions {
    fn default() -> Self {
        Self {
            radius: 8,
            pixel_step: 1,
            min_neighbors: 4,
            skip_distance: 0.08,
            max_depth: None,
        }
    }
}

impl NormalOptions {
    #[inline]
    pub(crate) fn beyond_range(&self, z: f32) -> bool {
        self.max_depth.is_some_and(|max| z > max)
    }
}
