use serde::{Deserialize, Serialize};

/// Options for per-cluster surface classification.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifyOptions {
    /// Smoothing mask size in pixels; curvature partners sit at half of it.
    pub mask_size: usize,
    /// Sample every n-th cluster pixel in row-major order.
    pub sample_step: usize,
    /// Clusters with fewer curvature samples stay undefined.
    pub min_samples: usize,
    /// Mean curvature (1/m) below which a cluster counts as planar.
    pub planar_threshold: f32,
    /// Fraction of samples that must agree in sign for convex/concave.
    pub consistency: f32,
    /// Border-to-interior ratio of mean |H| that marks an edge/rim cluster.
    pub edge_ratio: f32,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            mask_size: 14,
            sample_step: 1,
            min_samples: 3,
            planar_threshold: 0.5,
            consistency: 0.6,
            edge_ratio: 2.0,
        }
    }
}

impl ClassifyOptions {
    #[inline]
    pub fn curvature_offset(&self) -> usize {
        (self.mask_size / 2).max(1)
    }
}
