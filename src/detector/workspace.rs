//! Reusable detector state carried between frames.
//!
//! Holds only the neighbour-offset mask of the normal estimator, keyed by
//! `(width, radius, step)`. No frame data survives a call.
use crate::normals::{MaskCache, NeighborMask, NormalOptions};

#[derive(Debug, Default)]
pub struct DetectorWorkspace {
    masks: MaskCache,
}

impl DetectorWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Neighbour mask for a grid of `width` columns, rebuilt on key change.
    pub fn neighbor_mask(&mut self, width: usize, options: &NormalOptions) -> &NeighborMask {
        self.masks
            .get_or_build(width, options.radius, options.pixel_step)
    }

    pub fn mask_builds(&self) -> usize {
        self.masks.builds()
    }
}
