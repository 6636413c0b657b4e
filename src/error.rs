//! Errors reported before the pipeline runs.

use thiserror::Error;

/// Invalid pipeline configuration or input shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ConfigError {
    #[error("input grid is empty ({width}x{height})")]
    EmptyGrid { width: usize, height: usize },

    #[error("{0} must be at least 1")]
    Zero(&'static str),

    #[error("{name} = {value} is not a cosine in [-1, 1]")]
    CosineOutOfRange { name: &'static str, value: f32 },

    #[error("{name} = {value} must be finite and non-negative")]
    InvalidThreshold { name: &'static str, value: f32 },
}

pub type Result<T> = std::result::Result<T, ConfigError>;

pub(crate) fn require_nonzero(name: &'static str, value: usize) -> Result<()> {
    if value == 0 {
        Err(ConfigError::Zero(name))
    } else {
        Ok(())
    }
}

pub(crate) fn require_cosine(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && (-1.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::CosineOutOfRange { name, value })
    }
}

pub(crate) fn require_threshold(name: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidThreshold { name, value })
    }
}
