use serde::{Deserialize, Serialize};

/// Options for the region grower.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentationOptions {
    /// Minimum cosine between a pixel normal and the cluster's running mean
    /// normal for the pixel to join.
    pub same_direction_cos: f32,
    /// Respect depth edges while estimating normals and growing regions.
    pub use_edges: bool,
}

impl Default for SegmentationOptions {
    fn default() -> Self {
        Self {
            same_direction_cos: 0.94,
            use_edges: true,
        }
    }
}
