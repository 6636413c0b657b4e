//! Owned single-channel f32 raster in row-major layout (stride == width).
//!
//! Used for the depth map (metres, `0.0` meaning "no depth") and the edge
//! strength map (`[0, 1)`). Provides row access and a contiguous slice.
#[derive(Clone, Debug)]
pub struct ImageF32 {
    /// Raster width in pixels
    pub w: usize,
    /// Raster height in pixels
    pub h: usize,
    /// Number of f32 elements between consecutive rows (equals `w`)
    pub stride: usize,
    /// Backing storage in row-major order
    pub data: Vec<f32>,
}

impl ImageF32 {
    /// Construct a zero-initialized buffer of size `w × h`.
    pub fn new(w: usize, h: usize) -> Self {
        Self::filled(w, h, 0.0)
    }

    /// Construct a buffer of size `w × h` with every pixel set to `value`.
    pub fn filled(w: usize, h: usize, value: f32) -> Self {
        Self {
            w,
            h,
            stride: w,
            data: vec![value; w * h],
        }
    }

    /// Wrap an existing row-major buffer. Panics if the length does not match.
    pub fn from_vec(w: usize, h: usize, data: Vec<f32>) -> Self {
        assert_eq!(data.len(), w * h, "buffer length must equal w*h");
        Self {
            w,
            h,
            stride: w,
            data,
        }
    }

    #[inline]
    /// Convert (x, y) to a linear index into `data`.
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.stride + x
    }
    #[inline]
    /// Get the pixel value at (x, y).
    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.data[self.idx(x, y)]
    }
    #[inline]
    /// Set the pixel value at (x, y).
    pub fn set(&mut self, x: usize, y: usize, v: f32) {
        let i = self.idx(x, y);
        self.data[i] = v;
    }

    /// Pixels of row `y`.
    #[inline]
    pub fn row(&self, y: usize) -> &[f32] {
        let start = y * self.stride;
        &self.data[start..start + self.w]
    }

    /// Rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[f32]> + '_ {
        (0..self.h).map(move |y| self.row(y))
    }

    /// Largest finite value in the raster, or `None` when empty.
    pub fn max_value(&self) -> Option<f32> {
        self.data
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| Some(acc.map_or(v, |a: f32| a.max(v))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_value_skips_non_finite_samples() {
        let img = ImageF32::from_vec(2, 2, vec![0.5, f32::NAN, 1.25, f32::INFINITY]);
        assert_eq!(img.max_value(), Some(1.25));
        assert_eq!(ImageF32::new(0, 0).max_value(), None);
    }

    #[test]
    fn rows_follow_row_major_layout() {
        let img = ImageF32::from_vec(3, 2, vec![0.0, 1.0, 2.0, 3.0, 4.0, 5.0]);
        let rows: Vec<&[f32]> = img.rows().collect();
        assert_eq!(rows, vec![&[0.0, 1.0, 2.0][..], &[3.0, 4.0, 5.0][..]]);
        assert_eq!(img.get(2, 1), 5.0);
    }
}
