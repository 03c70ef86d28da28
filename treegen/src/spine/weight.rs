//! Droop under load

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::{Spine, SpineModifier};
use crate::math::{UP, angle_between, axis_angle, horizontal_axis, rotate_about};

/// Sequential root-to-tip droop of a finished spine
///
/// At every interior point the weighted center of mass of the remaining
/// branch (points nearer the tip weigh less) gives a deflection angle; the
/// whole sub-spine from that point on is rotated down about it, so later
/// points accumulate every earlier rotation. A trunk additionally has its
/// overall center of mass pulled back toward vertical by `curl_bias`.
pub struct Weight {
    segment_length: f32,
    /// Base radius of the branch cross section
    radius: f32,
    weight_bias: f32,
    curl_bias: f32,
    trunk: bool,
}

impl Weight {
    pub fn new(
        segment_length: f32,
        radius: f32,
        weight_bias: f32,
        curl_bias: f32,
        trunk: bool,
    ) -> Self {
        Self {
            segment_length,
            radius,
            weight_bias,
            curl_bias,
            trunk,
        }
    }

    /// Load of the section at normalized position `x` leaning by `angle`
    fn load(&self, x: f32, angle: f32, n: usize) -> f32 {
        angle.sin() * (1.0 - x) * self.segment_length * n as f32
    }

    /// Weighted center of mass of `points[i+1..]`, relative to `points[i]`
    fn center_of_mass(points: &[Vec3], i: usize) -> Vec3 {
        let n = points.len() as f32;
        let total_weight = (n - i as f32 - 1.0) * (n - i as f32) / (2.0 * n);
        let sum: Vec3 = points
            .iter()
            .enumerate()
            .skip(i + 1)
            .map(|(v, p)| *p * (1.0 - v as f32 / n))
            .sum();
        sum / total_weight - points[i]
    }

    fn curl(&self, spine: &mut Spine) {
        let points = spine.points_mut();
        let Some(&origin) = points.first() else {
            return;
        };
        let n = points.len() as f32;
        let cm = points.iter().map(|p| *p - origin).sum::<Vec3>() / n;
        if let Some(axis) = horizontal_axis(cm) {
            let rotation = axis_angle(axis, angle_between(UP, cm) * self.curl_bias);
            rotate_about(points, origin, rotation);
        }
    }
}

/// `atan(num / denom)` with a vanishing denominator read as a right angle
fn lean_angle(num: f32, denom: f32) -> f32 {
    if denom.abs() <= f32::EPSILON {
        if num > 0.0 { FRAC_PI_2 } else { 0.0 }
    } else {
        (num / denom).atan()
    }
}

impl SpineModifier for Weight {
    fn apply(&self, spine: &mut Spine) {
        let n = spine.len();
        if n < 3 {
            return;
        }
        let points = spine.points_mut();
        let r = self.radius;

        for i in 0..n - 2 {
            let local = if i == 0 {
                points[1] - points[0]
            } else {
                points[i] - points[i - 1]
            };
            let Some(axis) = horizontal_axis(local) else {
                // vertical section carries no torque
                continue;
            };
            let angle = angle_between(UP, local);
            let cm = Self::center_of_mass(points, i);

            let transverse = (cm.x * cm.x + cm.y * cm.y - (r * angle.cos()).powi(2)).max(0.0);
            let lean = lean_angle(transverse.sqrt(), cm.z + r * angle.sin());
            let w_angle = self.load(i as f32 / n as f32, lean, n);

            let pivot = points[i];
            rotate_about(
                &mut points[i..],
                pivot,
                axis_angle(axis, -w_angle * self.weight_bias),
            );
        }

        if self.trunk {
            self.curl(spine);
        }
    }
}
