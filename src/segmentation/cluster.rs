use super::labels::ClusterId;
use crate::curvature::CurvatureStats;
use crate::types::SurfaceType;
use nalgebra::Vector3;
use serde::Serialize;

/// Inclusive pixel bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PixelBounds {
    pub min_x: usize,
    pub min_y: usize,
    pub max_x: usize,
    pub max_y: usize,
}

impl PixelBounds {
    fn point(x: usize, y: usize) -> Self {
        Self {
            min_x: x,
            min_y: y,
            max_x: x,
            max_y: y,
        }
    }

    fn include(&mut self, x: usize, y: usize) {
        self.min_x = self.min_x.min(x);
        self.min_y = self.min_y.min(y);
        self.max_x = self.max_x.max(x);
        self.max_y = self.max_y.max(y);
    }

    fn union(&mut self, other: &PixelBounds) {
        self.include(other.min_x, other.min_y);
        self.include(other.max_x, other.max_y);
    }
}

/// Connected region of the label map with its running aggregates.
///
/// Point and normal sums are kept in f64 so the mean normal and centroid can
/// be updated incrementally during growth and combined on merge.
#[derive(Clone, Debug)]
pub struct Cluster {
    pub id: ClusterId,
    /// Member pixels, sorted row-major once the cluster is finished.
    pub pixels: Vec<usize>,
    pub sum_point: Vector3<f64>,
    pub sum_normal: Vector3<f64>,
    pub bounds: Option<PixelBounds>,
    pub curvature: CurvatureStats,
    /// Pixels with a 4-neighbour outside the grid or outside the cluster.
    pub border: Vec<usize>,
    pub surface: SurfaceType,
}

impl Cluster {
    pub(super) fn new(id: ClusterId) -> Self {
        Self {
            id,
            pixels: Vec::new(),
            sum_point: Vector3::zeros(),
            sum_normal: Vector3::zeros(),
            bounds: None,
            curvature: CurvatureStats::default(),
            border: Vec::new(),
            surface: SurfaceType::Undefined,
        }
    }

    pub(super) fn push(
        &mut self,
        idx: usize,
        x: usize,
        y: usize,
        point: &Vector3<f32>,
        normal: &Vector3<f32>,
    ) {
        self.pixels.push(idx);
        self.sum_point += point.cast::<f64>();
        self.sum_normal += normal.cast::<f64>();
        match self.bounds.as_mut() {
            Some(b) => b.include(x, y),
            None => self.bounds = Some(PixelBounds::point(x, y)),
        }
    }

    pub(super) fn finish(&mut self) {
        self.pixels.sort_unstable();
    }

    /// Fold `other` into `self`. Curvature and border are left stale.
    pub(super) fn absorb(&mut self, other: Cluster) {
        self.pixels.extend(other.pixels);
        self.pixels.sort_unstable();
        self.sum_point += other.sum_point;
        self.sum_normal += other.sum_normal;
        match (self.bounds.as_mut(), other.bounds) {
            (Some(b), Some(o)) => b.union(&o),
            (None, o) => self.bounds = o,
            _ => {}
        }
        self.border.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.pixels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pixels.is_empty()
    }

    /// Normalized sum of member normals, zero for an empty cluster.
    pub fn mean_normal(&self) -> Vector3<f32> {
        let n = self.sum_normal.norm();
        if n > 1e-12 {
            (self.sum_normal / n).cast::<f32>()
        } else {
            Vector3::zeros()
        }
    }

    pub fn centroid(&self) -> Vector3<f32> {
        if self.pixels.is_empty() {
            Vector3::zeros()
        } else {
            (self.sum_point / self.pixels.len() as f64).cast::<f32>()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absorb_combines_sums_and_bounds() {
        let down = Vector3::new(0.0f32, 0.0, -1.0);
        let mut a = Cluster::new(ClusterId(0));
        a.push(5, 5, 0, &Vector3::new(0.0, 0.0, 1.0), &down);
        let mut b = Cluster::new(ClusterId(1));
        b.push(1, 1, 0, &Vector3::new(2.0, 0.0, 1.0), &down);
        b.push(12, 2, 1, &Vector3::new(4.0, 0.0, 1.0), &down);
        a.absorb(b);
        assert_eq!(a.pixels, vec![1, 5, 12]);
        assert!((a.centroid() - Vector3::new(2.0, 0.0, 1.0)).norm() < 1e-6);
        assert!((a.mean_normal() - down).norm() < 1e-6);
        assert_eq!(
            a.bounds,
            Some(PixelBounds {
                min_x: 1,
                min_y: 0,
                max_x: 5,
                max_y: 1
            })
        );
    }
}
