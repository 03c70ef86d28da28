//! Incremental bend of a growing spine

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{Spine, SpineModifier};
use crate::math::{
    UP, angle_between, axis_angle, horizontal_axis, normalize_or, rotate_about, rotation_between,
};
use crate::noise_field::NoiseField;
use crate::params::{BendParams, BendProgress};

/// Noise channel of the second lateral bend component
const SECOND_CHANNEL: f32 = 10.0;

/// Steers segments toward a blend of an upright ideal and a noisy direction
///
/// Used once per growth step through [`Bend::step`]; as a [`SpineModifier`] it
/// re-bends every segment of a finished spine, root to tip.
pub struct Bend {
    amplitude: f32,
    upright_bias: f32,
    frequency: f32,
    progress: BendProgress,
    segment_length: f32,
    /// Point count of the fully grown spine
    point_count: usize,
    /// Overall direction the parent intended for this branch
    guide: Vec3,
    noise: NoiseField,
}

impl Bend {
    pub fn new(
        params: &BendParams,
        segment_length: f32,
        point_count: usize,
        guide: Vec3,
        noise_seed: u32,
    ) -> Self {
        Self {
            amplitude: params.amplitude,
            upright_bias: params.upright_bias,
            frequency: params.noise_frequency,
            progress: params.progress,
            segment_length,
            point_count,
            guide,
            noise: NoiseField::new(noise_seed),
        }
    }

    /// Bend the most recently appended segment
    pub fn step(&self, spine: &mut Spine) {
        if spine.len() >= 3 {
            self.step_at(spine, spine.len() - 1);
        }
    }

    /// Bend the segment ending at point `i`, carrying `spine[i..]` along
    ///
    /// The segment before it (`i-2 -> i-1`) is the reference direction; the
    /// tail rotates rigidly about `spine[i-1]`.
    pub fn step_at(&self, spine: &mut Spine, i: usize) {
        let points = spine.points_mut();
        if i < 2 || i >= points.len() {
            return;
        }

        let old_vec = points[i - 1] - points[i - 2];
        let angle = angle_between(UP, old_vec);

        let divisor = match self.progress {
            BendProgress::Remaining => self.point_count.saturating_sub(i).max(1) as f32,
            BendProgress::Normalized => self.point_count.max(1) as f32,
        };
        let ideal = match horizontal_axis(old_vec) {
            Some(axis) => axis_angle(axis, self.upright_bias * angle / divisor) * old_vec,
            None => old_vec,
        };

        let t = (i - 1) as f32 * self.segment_length * self.frequency;
        let local = Vec3::new(
            self.amplitude * self.noise.signed(0.0, t),
            self.amplitude * self.noise.signed(SECOND_CHANNEL, t),
            1.0,
        )
        .normalize();
        let bend_vec = rotation_between(UP, ideal) * local;

        // far from the intended direction the ideal wins
        let x = (angle_between(self.guide, bend_vec) / FRAC_PI_2)
            .clamp(0.0, 1.0)
            .powi(2);
        let new_vec = bend_vec * (1.0 - x) + normalize_or(ideal, UP) * x;

        let pivot = points[i - 1];
        rotate_about(&mut points[i..], pivot, rotation_between(old_vec, new_vec));
    }
}

impl SpineModifier for Bend {
    fn apply(&self, spine: &mut Spine) {
        for i in 2..spine.len() {
            self.step_at(spine, i);
        }
    }
}
