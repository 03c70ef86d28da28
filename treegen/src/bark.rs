//! Ring-extruded bark around a spine

use std::f32::consts::TAU;

use glam::Vec3;
use tracing::warn;

use crate::curves::Curve;
use crate::math::{UP, rotation_between};
use crate::params::MorphParams;

/// Tube surface of one branch
///
/// `vertices` holds one ring of `sides` vertices per spine point, rings in
/// spine order; `faces` index into `vertices` starting at 0.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Bark {
    pub vertices: Vec<Vec3>,
    pub faces: Vec<[u32; 4]>,
    pub sides: usize,
}

/// Radius at every spine point: the taper curve over normalized height,
/// scaled by the base radius and clamped to `[tip_radius, base_radius]`
pub fn radii<C: Curve + ?Sized>(point_count: usize, taper: &C, morph: &MorphParams) -> Vec<f32> {
    let last = point_count.saturating_sub(1).max(1) as f32;
    (0..point_count)
        .map(|i| {
            let r = taper.eval(i as f32 / last) * morph.base_radius;
            if r.is_finite() {
                r.clamp(morph.tip_radius, morph.base_radius)
            } else {
                morph.tip_radius
            }
        })
        .collect()
}

/// Direction of the spine at every point
///
/// The first point looks at the next one, the last at the previous one and
/// interior points average their two segments.
pub fn tangents(points: &[Vec3]) -> Vec<Vec3> {
    let n = points.len();
    (0..n)
        .map(|i| match (i.checked_sub(1), (i + 1 < n).then_some(i + 1)) {
            (None, Some(next)) => points[next] - points[i],
            (Some(prev), None) => points[i] - points[prev],
            (Some(prev), Some(next)) => {
                (points[i] - points[prev]).normalize_or_zero()
                    + (points[next] - points[i]).normalize_or_zero()
            }
            (None, None) => UP,
        })
        .collect()
}

/// Closed quad strip between consecutive rings of `sides` vertices
pub fn ring_faces(rings: usize, sides: usize) -> Vec<[u32; 4]> {
    let s = sides as u32;
    let mut faces = Vec::with_capacity(rings.saturating_sub(1) * sides);
    for i in 0..rings.saturating_sub(1) as u32 {
        for j in 0..s {
            let k = (j + 1) % s;
            faces.push([j + s * i, k + s * i, k + s * (i + 1), j + s * (i + 1)]);
        }
    }
    faces
}

impl Bark {
    /// Mesh the spine `points` with the given morphology and taper
    pub fn build<C: Curve + ?Sized>(points: &[Vec3], morph: &MorphParams, taper: &C) -> Self {
        let sides = if morph.sides < 3 {
            warn!("bark: sides must be >= 3, clamping to 3");
            3
        } else {
            morph.sides as usize
        };

        let radii = radii(points.len(), taper, morph);
        let tangents = tangents(points);

        // ring template in the XY plane, rotated onto each tangent
        let template: Vec<Vec3> = (0..sides)
            .map(|j| {
                let theta = j as f32 / sides as f32 * TAU;
                Vec3::new(theta.cos(), theta.sin(), 0.0)
            })
            .collect();

        let mut vertices = Vec::with_capacity(points.len() * sides);
        for ((center, tangent), radius) in points.iter().zip(&tangents).zip(&radii) {
            let rotation = rotation_between(UP, *tangent);
            vertices.extend(template.iter().map(|t| *center + rotation * (*t * *radius)));
        }

        Self {
            vertices,
            faces: ring_faces(points.len(), sides),
            sides,
        }
    }

    pub fn ring_count(&self) -> usize {
        if self.sides == 0 {
            0
        } else {
            self.vertices.len() / self.sides
        }
    }
}
