//! Lateral noise displacement

use glam::Vec3;

use super::{Spine, SpineModifier};
use crate::math::{normalize_or, rotation_between};
use crate::noise_field::NoiseField;

/// Displaces every point after the first along two transverse axes
///
/// Offsets are noise differences relative to the start of the spine, so point 0
/// never moves and the branch stays attached to its parent.
pub struct Jiggle {
    amplitude: f32,
    frequency: f32,
    segment_length: f32,
    /// Phase shift of the second axis' noise
    branch_length: f32,
    noise: NoiseField,
}

impl Jiggle {
    pub fn new(
        amplitude: f32,
        frequency: f32,
        segment_length: f32,
        branch_length: f32,
        noise_seed: u32,
    ) -> Self {
        Self {
            amplitude,
            frequency,
            segment_length,
            branch_length,
            noise: NoiseField::new(noise_seed),
        }
    }

    fn offset(&self, z: f32) -> f32 {
        self.amplitude * (self.noise.sample01(0.0, self.frequency * z) - 0.5)
    }

    /// First reference axis, perpendicular to the initial direction `st`
    fn reference_axis(st: Vec3) -> Vec3 {
        let helper = if st.x != st.y {
            Vec3::new(st.y, -st.x, 0.0)
        } else {
            Vec3::new(st.z, 0.0, -st.x)
        };
        normalize_or(st.cross(helper), st.any_orthonormal_vector())
    }
}

impl SpineModifier for Jiggle {
    fn apply(&self, spine: &mut Spine) {
        if self.amplitude == 0.0 || spine.len() < 2 {
            return;
        }
        let points = spine.points_mut();
        let st = points[1] - points[0];
        let reference = Self::reference_axis(normalize_or(st, Vec3::Z));

        let base_x = self.offset(0.0);
        let base_y = self.offset(self.branch_length);

        for i in 1..points.len() {
            let seg = points[i] - points[i - 1];
            let x = normalize_or(rotation_between(st, seg) * reference, reference);
            let y = normalize_or(x.cross(seg), x.any_orthonormal_vector());
            let along = i as f32 * self.segment_length;
            points[i] += x * (self.offset(along) - base_x)
                + y * (self.offset(along + self.branch_length) - base_y);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spine() -> Spine {
        Spine::grow_straight(Vec3::ZERO, Vec3::new(0.3, 0.1, 1.0), 8.0, 0.5).unwrap()
    }

    #[test]
    fn test_zero_amplitude_is_identity() {
        let mut jiggled = spine();
        Jiggle::new(0.0, 1.0, 0.5, 8.0, 3).apply(&mut jiggled);
        assert_eq!(jiggled, spine());
    }

    #[test]
    fn test_first_point_fixed() {
        let mut jiggled = spine();
        Jiggle::new(0.5, 1.3, 0.5, 8.0, 3).apply(&mut jiggled);
        assert_eq!(jiggled.points()[0], Vec3::ZERO);
        assert!(
            jiggled
                .points()
                .iter()
                .zip(spine().points())
                .any(|(a, b)| a.distance(*b) > 1e-4)
        );
    }

    #[test]
    fn test_reference_axis_perpendicular() {
        for st in [Vec3::Z, Vec3::X, Vec3::new(1.0, 1.0, 0.0), Vec3::new(0.2, -0.4, 0.9)] {
            let st = st.normalize();
            let axis = Jiggle::reference_axis(st);
            assert!(axis.dot(st).abs() < 1e-5);
            assert!((axis.length() - 1.0).abs() < 1e-5);
        }
    }
}
