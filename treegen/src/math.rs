//! Guarded vector helpers
//!
//! Every normalization in the generator goes through these so that zero-length
//! directions are replaced by a canonical axis instead of producing NaNs.

use glam::{Quat, Vec3};

/// Canonical up axis
pub const UP: Vec3 = Vec3::Z;

/// Normalize `v`, substituting `fallback` for zero-length or non-finite input
#[inline]
pub fn normalize_or(v: Vec3, fallback: Vec3) -> Vec3 {
    v.try_normalize().unwrap_or(fallback)
}

/// Rotation taking direction `from` onto direction `to`
///
/// Inputs need not be normalized. Antiparallel inputs rotate half a turn about
/// an arbitrary perpendicular axis; degenerate inputs yield the identity.
pub fn rotation_between(from: Vec3, to: Vec3) -> Quat {
    match (from.try_normalize(), to.try_normalize()) {
        (Some(from), Some(to)) => Quat::from_rotation_arc(from, to),
        _ => Quat::IDENTITY,
    }
}

/// Horizontal axis perpendicular to `v`: `(v.y, -v.x, 0)`, normalized
///
/// Rotating `v` about this axis by a positive angle tilts it toward +Z.
/// Returns `None` when `v` is vertical.
#[inline]
pub fn horizontal_axis(v: Vec3) -> Option<Vec3> {
    Vec3::new(v.y, -v.x, 0.0).try_normalize()
}

/// Rotation about `axis` (need not be normalized); identity for a zero axis
#[inline]
pub fn axis_angle(axis: Vec3, angle: f32) -> Quat {
    match axis.try_normalize() {
        Some(axis) => Quat::from_axis_angle(axis, angle),
        None => Quat::IDENTITY,
    }
}

/// Angle between two vectors in radians, 0 when either is zero
#[inline]
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    if a.length_squared() == 0.0 || b.length_squared() == 0.0 {
        return 0.0;
    }
    a.angle_between(b)
}

/// Rotate `points` rigidly about `pivot`
pub fn rotate_about(points: &mut [Vec3], pivot: Vec3, rotation: Quat) {
    for p in points {
        *p = pivot + rotation * (*p - pivot);
    }
}
