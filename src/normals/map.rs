use nalgebra::Vector3;

/// Per-pixel unit normals (oriented toward the sensor) and surface variation.
///
/// Entries are only meaningful for pixels labelled valid (or clustered);
/// other pixels hold a zero normal.
#[derive(Clone, Debug)]
pub struct NormalMap {
    width: usize,
    height: usize,
    normals: Vec<Vector3<f32>>,
    variation: Vec<f32>,
}

impl NormalMap {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            normals: vec![Vector3::zeros(); width * height],
            variation: vec![0.0; width * height],
        }
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
        self.normals.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.normals.is_empty()
    }

    #[inline]
    pub fn normal(&self, idx: usize) -> Vector3<f32> {
        self.normals[idx]
    }

    /// Surface variation `λ0 / (λ0 + λ1 + λ2)` of the local fit.
    #[inline]
    pub fn variation(&self, idx: usize) -> f32 {
        self.variation[idx]
    }

    pub fn set(&mut self, idx: usize, normal: Vector3<f32>, variation: f32) {
        self.normals[idx] = normal;
        self.variation[idx] = variation;
    }
}
