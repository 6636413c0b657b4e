//! Parameters for the full surface classification pipeline.
//!
//! Every stage has its own options struct; `PipelineParams` groups them with
//! the stage toggles. All fields default, so a JSON config only needs to list
//! what it changes. Defaults follow common structured-light sensors at
//! VGA resolution.

use crate::classify::ClassifyOptions;
use crate::edges::EdgeOptions;
use crate::error::{require_cosine, require_nonzero, require_threshold, Result};
use crate::normals::NormalOptions;
use crate::refine::RefineOptions;
use crate::segmentation::SegmentationOptions;
use serde::{Deserialize, Serialize};

/// Pipeline-wide parameters.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineParams {
    pub edges: EdgeOptions,
    pub normals: NormalOptions,
    pub segmentation: SegmentationOptions,
    pub refine: RefineOptions,
    pub classify: ClassifyOptions,
    /// Run curvature-driven merging after region growing.
    pub enable_refine: bool,
    /// Run per-cluster classification and border marking.
    pub enable_classify: bool,
}

impl Default for PipelineParams {
    fn default() -> Self {
        Self {
            edges: EdgeOptions::default(),
            normals: NormalOptions::default(),
            segmentation: SegmentationOptions::default(),
            refine: RefineOptions::default(),
            classify: ClassifyOptions::default(),
            enable_refine: true,
            enable_classify: true,
        }
    }
}

impl PipelineParams {
    /// Reject values no stage can work with.
    pub fn validate(&self) -> Result<()> {
        let e = &self.edges;
        require_nonzero("edges.pixel_offset", e.pixel_offset)?;
        require_threshold("edges.min_jump", e.min_jump)?;
        require_threshold("edges.noise_factor", e.noise_factor)?;
        require_threshold("edges.barrier_threshold", e.barrier_threshold)?;

        let n = &self.normals;
        require_nonzero("normals.radius", n.radius)?;
        require_nonzero("normals.pixel_step", n.pixel_step)?;
        require_threshold("normals.skip_distance", n.skip_distance)?;
        if let Some(max_depth) = n.max_depth {
            require_threshold("normals.max_depth", max_depth)?;
        }

        require_cosine(
            "segmentation.same_direction_cos",
            self.segmentation.same_direction_cos,
        )?;

        let r = &self.refine;
        require_threshold("refine.curvature_threshold", r.curvature_threshold)?;
        require_cosine("refine.boundary_cos", r.boundary_cos)?;
        require_nonzero("refine.max_iterations", r.max_iterations)?;
        require_nonzero("refine.curvature_offset", r.curvature_offset)?;

        let c = &self.classify;
        require_nonzero("classify.mask_size", c.mask_size)?;
        require_nonzero("classify.sample_step", c.sample_step)?;
        require_threshold("classify.planar_threshold", c.planar_threshold)?;
        require_threshold("classify.consistency", c.consistency)?;
        require_threshold("classify.edge_ratio", c.edge_ratio)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConfigError;

    #[test]
    fn defaults_are_valid() {
        let params = PipelineParams::default();
        assert!(params.validate().is_ok());
        assert!(params.enable_refine);
        assert!(params.enable_classify);
        assert_eq!(params.normals.radius, 8);
        assert_eq!(params.classify.mask_size, 14);
    }

    #[test]
    fn rejects_bad_values() {
        let mut params = PipelineParams::default();
        params.normals.radius = 0;
        assert_eq!(
            params.validate(),
            Err(ConfigError::Zero("normals.radius"))
        );

        let mut params = PipelineParams::default();
        params.segmentation.same_direction_cos = 1.5;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::CosineOutOfRange { .. })
        ));

        let mut params = PipelineParams::default();
        params.refine.curvature_threshold = -0.1;
        assert!(matches!(
            params.validate(),
            Err(ConfigError::InvalidThreshold { .. })
        ));

        let mut params = PipelineParams::default();
        params.edges.min_jump = f32::NAN;
        assert!(params.validate().is_err());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let json = r#"{ "normals": { "radius": 4 }, "enable_refine": false }"#;
        let params: PipelineParams = serde_json::from_str(json).unwrap();
        assert_eq!(params.normals.radius, 4);
        assert_eq!(params.normals.pixel_step, 1);
        assert!(!params.enable_refine);
        assert!(params.enable_classify);
    }
}
