use crate::grid::PinholeIntrinsics;
use crate::PipelineParams;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// What the tool prints to stdout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Both,
}

impl OutputFormat {
    pub fn includes_text(self) -> bool {
        matches!(self, OutputFormat::Text | OutputFormat::Both)
    }

    pub fn includes_json(self) -> bool {
        matches!(self, OutputFormat::Json | OutputFormat::Both)
    }
}

#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
    /// Report destination; printed to stdout when absent.
    pub json_out: Option<PathBuf>,
    /// Directory for the depth, edge and border PNGs.
    pub debug_dir: Option<PathBuf>,
}

/// Configuration of the `classify_depth` tool.
#[derive(Clone, Debug, Deserialize)]
pub struct ClassifyToolConfig {
    /// 16-bit depth PNG.
    pub input: PathBuf,
    /// Metres per raw depth unit (0.001 for millimetre PNGs).
    #[serde(default = "default_depth_scale")]
    pub depth_scale: f32,
    #[serde(default)]
    pub intrinsics: PinholeIntrinsics,
    #[serde(default)]
    pub params: PipelineParams,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_depth_scale() -> f32 {
    0.001
}

pub fn load_config(path: &Path) -> Result<ClassifyToolConfig, String> {
    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config {}: {e}", path.display()))?;
    parse_config(&contents).map_err(|e| format!("Failed to parse config {}: {e}", path.display()))
}

pub fn parse_config(json: &str) -> Result<ClassifyToolConfig, String> {
    let config: ClassifyToolConfig = serde_json::from_str(json).map_err(|e| e.to_string())?;
    if !(config.depth_scale.is_finite() && config.depth_scale > 0.0) {
        return Err(format!("depth_scale must be positive, got {}", config.depth_scale));
    }
    Ok(config)
}

/// Read the config path from the command line (`<program> <config.json>`).
pub fn parse_cli(program: &str) -> Result<ClassifyToolConfig, String> {
    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| format!("Usage: {program} <config.json>"))?;
    if args.next().is_some() {
        return Err(format!("Usage: {program} <config.json>"));
    }
    load_config(Path::new(&path))
}
