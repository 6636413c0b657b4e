use serde::{Deserialize, Serialize};

/// Options for curvature-compatibility merging.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct RefineOptions {
    /// Largest mean-curvature difference (1/m) between two mergeable clusters.
    pub curvature_threshold: f32,
    /// Minimum mean cosine between pixel normals across the shared boundary.
    pub boundary_cos: f32,
    /// Upper bound on merges per frame.
    pub max_iterations: usize,
    /// Pixel offset of the curvature partners.
    pub curvature_offset: usize,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            curvature_threshold: 0.5,
            boundary_cos: 0.94,
            max_iterations: 1000,
            curvature_offset: 3,
        }
    }
}
