use nalgebra::{Rotation3, Vector3};
use surface_classifier::GridPointBuffer;

/// Grid of points `(x·spacing, y·spacing, depth(x, y))`; `None` marks a hole.
pub fn grid_from_depth<F>(width: usize, height: usize, spacing: f32, depth: F) -> GridPointBuffer
where
    F: Fn(usize, usize) -> Option<f32>,
{
    assert!(width > 0 && height > 0, "grid dimensions must be positive");
    GridPointBuffer::from_fn(width, height, |x, y| {
        depth(x, y).map(|z| Vector3::new(x as f32 * spacing, y as f32 * spacing, z))
    })
}

/// Fronto-parallel plane at depth `z`.
pub fn plane(width: usize, height: usize, z: f32) -> GridPointBuffer {
    grid_from_depth(width, height, 0.01, |_, _| Some(z))
}

/// Two fronto-parallel planes; columns `>= split` sit `jump` metres further.
pub fn depth_step(width: usize, height: usize, split: usize, jump: f32) -> GridPointBuffer {
    grid_from_depth(width, height, 0.01, |x, _| {
        Some(if x < split { 1.0 } else { 1.0 + jump })
    })
}

/// Plane with a rectangular block of missing depth.
pub fn plane_with_hole(
    width: usize,
    height: usize,
    xs: std::ops::Range<usize>,
    ys: std::ops::Range<usize>,
) -> GridPointBuffer {
    grid_from_depth(width, height, 0.01, |x, y| {
        (!(xs.contains(&x) && ys.contains(&y))).then_some(1.0)
    })
}

/// Ball of radius `radius` bulging toward the sensor out of a backdrop at
/// `backdrop` metres; grid spacing 5 mm, ball centred in the grid.
pub fn ball_on_backdrop(size: usize, radius: f32, backdrop: f32) -> GridPointBuffer {
    let half = size as f32 / 2.0;
    let spacing = 0.005;
    GridPointBuffer::from_fn(size, size, |x, y| {
        let px = (x as f32 - half) * spacing;
        let py = (y as f32 - half) * spacing;
        let r2 = px * px + py * py;
        let z = if r2 < radius * radius {
            backdrop - (radius * radius - r2).sqrt()
        } else {
            backdrop
        };
        Some(Vector3::new(px, py, z))
    })
}

/// Tilted plane `z = z0 + slope·px` rigidly rotated about the sensor origin.
pub fn rotated_plane(
    width: usize,
    height: usize,
    spacing: f32,
    rotation: &Rotation3<f32>,
) -> GridPointBuffer {
    let half_w = width as f32 / 2.0;
    let half_h = height as f32 / 2.0;
    GridPointBuffer::from_fn(width, height, |x, y| {
        let px = (x as f32 - half_w) * spacing;
        let py = (y as f32 - half_h) * spacing;
        let p = Vector3::new(px, py, 1.0 + 0.2 * px);
        Some(rotation * p)
    })
}
