//! Direction utilities for comparing 3D surface normals.

use nalgebra::Vector3;

/// Cosine of the angle between two directions, clamped to `[-1, 1]`.
///
/// Zero-length inputs yield `-1.0` so they never pass a similarity gate.
#[inline]
pub fn normal_cosine(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    let na = a.norm();
    let nb = b.norm();
    if na <= 1e-12 || nb <= 1e-12 || !na.is_finite() || !nb.is_finite() {
        return -1.0;
    }
    (a.dot(b) / (na * nb)).clamp(-1.0, 1.0)
}

/// Unsigned angle between two directions in radians, in `[0, π]`.
#[inline]
pub fn angle_between_normals(a: &Vector3<f32>, b: &Vector3<f32>) -> f32 {
    normal_cosine(a, b).acos()
}

/// Normalize `v`, returning `None` when it has no usable direction.
#[inline]
pub fn unit_or_none(v: &Vector3<f32>) -> Option<Vector3<f32>> {
    let n = v.norm();
    if n.is_finite() && n > 1e-12 {
        Some(v / n)
    } else {
        None
    }
}

/// Flip `normal` so it faces a sensor located at the origin (`n · p ≤ 0`).
#[inline]
pub fn orient_towards_origin(normal: Vector3<f32>, point: &Vector3<f32>) -> Vector3<f32> {
    if normal.dot(point) > 0.0 {
        -normal
    } else {
        normal
    }
}
