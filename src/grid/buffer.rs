use super::PinholeIntrinsics;
use crate::image::ImageF32;
use nalgebra::Vector3;

#[inline]
fn invalid_point() -> Vector3<f32> {
    Vector3::repeat(f32::NAN)
}

/// Organized point cloud: one sensor-frame point per pixel, row-major.
///
/// Missing measurements are stored as NaN and surface as `None`. The shape is
/// fixed at construction.
#[derive(Clone, Debug)]
pub struct GridPointBuffer {
    width: usize,
    height: usize,
    points: Vec<Vector3<f32>>,
}

impl GridPointBuffer {
    /// Grid of `width × height` invalid points.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            points: vec![invalid_point(); width * height],
        }
    }

    /// Build a grid by querying `accessor(x, y)` for every pixel in row-major
    /// order. Non-finite points are stored as invalid.
    pub fn from_fn<F>(width: usize, height: usize, mut accessor: F) -> Self
    where
        F: FnMut(usize, usize) -> Option<Vector3<f32>>,
    {
        let mut points = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                points.push(sanitize(accessor(x, y)));
            }
        }
        Self {
            width,
            height,
            points,
        }
    }

    /// Back-project a metric depth raster (`0.0` = no depth).
    pub fn from_depth(depth: &ImageF32, intrinsics: &PinholeIntrinsics) -> Self {
        Self::from_fn(depth.w, depth.h, |x, y| {
            intrinsics.unproject(x, y, depth.get(x, y))
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Linear index of pixel `(x, y)`.
    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Pixel coordinates `(x, y)` of a linear index.
    #[inline]
    pub fn coords(&self, idx: usize) -> (usize, usize) {
        (idx % self.width, idx / self.width)
    }

    #[inline]
    pub fn get(&self, x: usize, y: usize) -> Option<Vector3<f32>> {
        self.point(self.index(x, y))
    }

    #[inline]
    pub fn point(&self, idx: usize) -> Option<Vector3<f32>> {
        let p = self.points[idx];
        p.z.is_finite().then_some(p)
    }

    #[inline]
    pub fn is_valid(&self, idx: usize) -> bool {
        self.points[idx].z.is_finite()
    }

    pub fn set(&mut self, x: usize, y: usize, point: Option<Vector3<f32>>) {
        let idx = self.index(x, y);
        self.points[idx] = sanitize(point);
    }

    /// Number of pixels carrying a measurement.
    pub fn valid_count(&self) -> usize {
        self.points.iter().filter(|p| p.z.is_finite()).count()
    }

    /// Depth raster of the grid; pixels without a measurement hold `0.0`.
    pub fn depth_map(&self) -> ImageF32 {
        let data = self
            .points
            .iter()
            .map(|p| if p.z.is_finite() { p.z } else { 0.0 })
            .collect();
        ImageF32::from_vec(self.width, self.height, data)
    }
}

/// Entry point for callers that own the sensor data: build the grid from a
/// per-pixel point accessor without exposing any wire format to the core.
pub fn build_grid_from_depth_source<F>(width: usize, height: usize, accessor: F) -> GridPointBuffer
where
    F: FnMut(usize, usize) -> Option<Vector3<f32>>,
{
    GridPointBuffer::from_fn(width, height, accessor)
}

#[inline]
fn sanitize(point: Option<Vector3<f32>>) -> Vector3<f32> {
    match point {
        Some(p) if p.iter().all(|c| c.is_finite()) => p,
        _ => invalid_point(),
    }
}
