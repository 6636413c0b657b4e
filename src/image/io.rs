//! I/O helpers for depth rasters and JSON reports.
//!
//! - `load_depth_image`: read a 16-bit (or 8-bit) PNG into metric depth.
//! - `save_grayscale_f32`: write an `ImageF32` to a grayscale PNG.
//! - `write_json_file`: pretty-print a serializable value to disk.
use super::ImageF32;
use image::{GrayImage, Luma};
use serde::Serialize;
use std::fs;
use std::path::Path;

/// Load a depth image and convert raw sensor units to metres.
///
/// Each raw sample is multiplied by `depth_scale` (e.g. `0.001` for
/// millimetre PNGs). Zero samples stay zero, the "no depth" sentinel.
pub fn load_depth_image(path: &Path, depth_scale: f32) -> Result<ImageF32, String> {
    let img = image::open(path)
        .map_err(|e| format!("Failed to open {}: {e}", path.display()))?
        .into_luma16();
    let width = img.width() as usize;
    let height = img.height() as usize;
    let data = img
        .into_raw()
        .into_iter()
        .map(|raw| raw as f32 * depth_scale)
        .collect();
    Ok(ImageF32::from_vec(width, height, data))
}

/// Save a float raster to a grayscale PNG.
///
/// Values are divided by `max_value` and clamped to `[0, 255]` after scaling;
/// pass `1.0` for rasters already in `[0, 1]` such as the edge map.
pub fn save_grayscale_f32(image: &ImageF32, max_value: f32, path: &Path) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let inv = if max_value > 0.0 { 1.0 / max_value } else { 0.0 };
    let mut out = GrayImage::new(image.w as u32, image.h as u32);
    for (y, row) in image.rows().enumerate() {
        for (x, &px) in row.iter().enumerate() {
            let v = if px.is_finite() {
                (px * inv * 255.0).clamp(0.0, 255.0)
            } else {
                0.0
            };
            out.put_pixel(x as u32, y as u32, Luma([v as u8]));
        }
    }
    out.save(path)
        .map_err(|e| format!("Failed to save {}: {e}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), String> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| format!("Failed to serialize JSON for {}: {e}", path.display()))?;
    fs::write(path, json).map_err(|e| format!("Failed to write JSON {}: {e}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|e| format!("Failed to create {}: {e}", parent.display()))?;
        }
    }
    Ok(())
}
