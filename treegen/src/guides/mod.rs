//! Child branch placement
//!
//! A guide placer samples attachment points along a parent spine and turns each
//! into a [`GuidePack`]: where the child starts, which way and how far it
//! grows, and how thick it is at the base. Two strategies produce the same
//! contract:
//!
//! - [`ScoredSampler`]: quality-scored rejection sampling with a bounded
//!   look-back spacing check
//! - [`PoissonSampler`]: blue-noise disc samples mapped onto the spine
//!
//! Both only use the part of the parent above `start_height`, and both return
//! no guides for a parent whose base radius already equals its tip radius.

mod disc;
mod poisson;
mod scored;

pub use disc::{DartThrowing, DiscPoint, DiscSampler};
pub use poisson::PoissonSampler;
pub use scored::ScoredSampler;

use std::f32::consts::{FRAC_PI_2, TAU};

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use tracing::trace;

use crate::curves::Curve;
use crate::error::{Result, TreeGenError};
use crate::math::{UP, axis_angle, normalize_or};
use crate::params::{BranchShapeParams, CurveParams, GuideStrategy, MorphParams, SamplingParams};

/// Guides shorter than this are dropped rather than grown
const MIN_GUIDE_LENGTH: f32 = 1e-4;

/// Share of the taper-curve radius handed to a child
const CHILD_RADIUS_FACTOR: f32 = 0.8;

/// Placement of one child branch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GuidePack {
    /// Attachment point on the parent spine
    pub origin: Vec3,
    /// Growth direction; its length is the child's target length
    pub direction: Vec3,
    /// Child base radius
    pub radius: f32,
}

/// Everything a placer needs to know about the parent
pub struct GuideRequest<'a> {
    pub spine: &'a [Vec3],
    pub morph: &'a MorphParams,
    pub shape: &'a BranchShapeParams,
    pub curves: &'a CurveParams,
    /// Target number of guides
    pub count: u32,
}

/// Capability shared by all guide placement strategies
pub trait PlaceGuides {
    /// Sample guides for the parent described by `request`
    ///
    /// Fails with `InsufficientSpineLength` when fewer than two spine points
    /// remain above `start_height`.
    fn place_guides(&self, request: &GuideRequest<'_>, rng: &mut Pcg32) -> Result<Vec<GuidePack>>;
}

/// The configured placement strategy
pub enum GuidePlacer {
    Scored(ScoredSampler),
    Poisson(PoissonSampler),
}

impl GuidePlacer {
    pub fn from_params(sampling: &SamplingParams) -> Self {
        match sampling.strategy {
            GuideStrategy::Scored => GuidePlacer::Scored(ScoredSampler::from_params(sampling)),
            GuideStrategy::Poisson => GuidePlacer::Poisson(PoissonSampler::default()),
        }
    }
}

impl PlaceGuides for GuidePlacer {
    fn place_guides(&self, request: &GuideRequest<'_>, rng: &mut Pcg32) -> Result<Vec<GuidePack>> {
        match self {
            GuidePlacer::Scored(sampler) => sampler.place_guides(request, rng),
            GuidePlacer::Poisson(sampler) => sampler.place_guides(request, rng),
        }
    }
}

/// The part of a parent spine that may bear children
pub(crate) struct SubSpine<'a> {
    pub points: &'a [Vec3],
    /// Index of `points[0]` in the full spine
    pub offset: usize,
    pub full_len: usize,
}

impl<'a> SubSpine<'a> {
    /// Cut the spine at `start_height`
    ///
    /// `Ok(None)` means the parent legitimately bears no children.
    pub fn for_request(request: &GuideRequest<'a>) -> Result<Option<Self>> {
        if request.morph.base_radius == request.morph.tip_radius {
            trace!("parent at tip radius, no guides");
            return Ok(None);
        }
        if request.count == 0 {
            return Ok(None);
        }

        let full_len = request.spine.len();
        let offset =
            ((request.shape.start_height * full_len as f32).floor() as usize).min(full_len);
        let points = &request.spine[offset..];
        if points.len() < 2 {
            return Err(TreeGenError::InsufficientSpineLength {
                points: points.len(),
                required: 2,
            });
        }
        Ok(Some(Self {
            points,
            offset,
            full_len,
        }))
    }

    pub fn segments(&self) -> usize {
        self.points.len() - 1
    }

    pub fn arc_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Point and segment tangent at fractional index `frac`
    pub fn locate(&self, frac: f32) -> (Vec3, Vec3) {
        let last_segment = self.segments() - 1;
        let i = (frac.max(0.0).floor() as usize).min(last_segment);
        let t = (frac - i as f32).clamp(0.0, 1.0);
        let (a, b) = (self.points[i], self.points[i + 1]);
        (a.lerp(b, t), b - a)
    }

    /// Position of fractional index `frac` along the whole parent, 0..=1
    pub fn parent_height(&self, frac: f32) -> f32 {
        if self.full_len < 2 {
            return 0.0;
        }
        ((self.offset as f32 + frac) / (self.full_len - 1) as f32).clamp(0.0, 1.0)
    }
}

/// Unit direction leaving the spine at `azimuth` around `tangent`
///
/// Its vertical component is flattened by `horizontal_bias`.
pub(crate) fn outward(tangent: Vec3, azimuth: f32, horizontal_bias: f32) -> Vec3 {
    let (u, v) = normalize_or(tangent, UP).any_orthonormal_pair();
    let mut dir = u * azimuth.cos() + v * azimuth.sin();
    dir.z *= 1.0 - horizontal_bias;
    normalize_or(dir, u)
}

pub(crate) fn random_azimuth(rng: &mut Pcg32) -> f32 {
    rng.random_range(0.0..TAU)
}

/// Uniform factor in `[1 - variance, 1 + variance]`
fn jitter(rng: &mut Pcg32, variance: f32) -> f32 {
    let spread = variance.abs().min(1.0);
    1.0 + spread * (rng.random::<f32>() * 2.0 - 1.0)
}

/// Turn a sampled attachment into a guide pack
///
/// `height` in `[0, 1]` drives the length curve, the launch angle (from
/// `max_angle` at 0 to `min_angle` at 1) and the radius. Returns `None` for
/// guides too short to grow.
pub(crate) fn launch(
    request: &GuideRequest<'_>,
    origin: Vec3,
    tangent: Vec3,
    outward: Vec3,
    height: f32,
    rng: &mut Pcg32,
) -> Option<GuidePack> {
    let morph = request.morph;
    let shape = request.shape;

    let length = morph.length * shape.child_scaling * request.curves.length_scale.eval(height);
    let mut direction = normalize_or(outward, UP) * length;

    let polar = height * shape.min_angle + (1.0 - height) * shape.max_angle;
    let lift = (FRAC_PI_2 - polar) * jitter(rng, shape.variance);
    direction = axis_angle((-tangent).cross(direction), lift) * direction;
    // the radius bound follows the unjittered length
    let planned_length = direction.length();
    direction *= jitter(rng, shape.variance);

    let guide_length = direction.length();
    let radius = (request.curves.taper.eval(height) * morph.base_radius * CHILD_RADIUS_FACTOR)
        .max(morph.tip_radius)
        .min(planned_length / morph.length * morph.base_radius);
    let radius = (radius * jitter(rng, shape.variance))
        .max(morph.tip_radius)
        .min(morph.base_radius);

    if !(guide_length >= MIN_GUIDE_LENGTH) {
        trace!("dropping guide of length {} at height {}", guide_length, height);
        return None;
    }

    Some(GuidePack {
        origin,
        direction,
        radius,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::curves::CurveKind;
    use crate::spine::Spine;
    use rand::SeedableRng;

    pub(crate) fn straight_spine() -> Vec<Vec3> {
        Spine::grow_straight(Vec3::ZERO, UP, 10.0, 10.0 / 30.0)
            .unwrap()
            .into_points()
    }

    #[test]
    fn test_sub_spine_cut() {
        let spine = straight_spine();
        let morph = MorphParams::default();
        let shape = BranchShapeParams::default();
        let curves = CurveParams::default();
        let request = GuideRequest {
            spine: &spine,
            morph: &morph,
            shape: &shape,
            curves: &curves,
            count: 3,
        };
        let sub = SubSpine::for_request(&request).unwrap().unwrap();
        assert_eq!(sub.offset, 9);
        assert_eq!(sub.points.len(), 31 - 9);
        assert!((sub.parent_height(0.0) - 9.0 / 30.0).abs() < 1e-6);
        assert!((sub.parent_height(sub.segments() as f32) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_sub_spine_too_short() {
        let spine = vec![Vec3::ZERO, UP];
        let morph = MorphParams::default();
        let shape = BranchShapeParams {
            start_height: 0.6,
            ..Default::default()
        };
        let curves = CurveParams::default();
        let request = GuideRequest {
            spine: &spine,
            morph: &morph,
            shape: &shape,
            curves: &curves,
            count: 3,
        };
        assert_eq!(
            SubSpine::for_request(&request).err(),
            Some(TreeGenError::InsufficientSpineLength {
                points: 1,
                required: 2
            })
        );
    }

    #[test]
    fn test_outward_perpendicular_without_bias() {
        for azimuth in [0.0, 1.0, 2.5, 4.0] {
            let dir = outward(UP, azimuth, 0.0);
            assert!(dir.dot(UP).abs() < 1e-5);
            assert!((dir.length() - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn test_launch_angle_and_radius_bounds() {
        let spine = straight_spine();
        let morph = MorphParams::default();
        let shape = BranchShapeParams {
            variance: 0.0,
            ..Default::default()
        };
        let curves = CurveParams::default();
        let request = GuideRequest {
            spine: &spine,
            morph: &morph,
            shape: &shape,
            curves: &curves,
            count: 1,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        let pack = launch(&request, Vec3::ZERO, UP, Vec3::X, 1.0, &mut rng).unwrap();
        // at the tip the child leaves at min_angle from the parent
        let angle = pack.direction.angle_between(UP);
        assert!((angle - shape.min_angle).abs() < 1e-4);
        assert!(pack.radius >= morph.tip_radius && pack.radius <= morph.base_radius);

        let pack = launch(&request, Vec3::ZERO, UP, Vec3::X, 0.5, &mut rng).unwrap();
        let expected = 0.5 * shape.min_angle + 0.5 * shape.max_angle;
        assert!((pack.direction.angle_between(UP) - expected).abs() < 1e-4);
    }

    #[test]
    fn test_jitter_tolerates_out_of_range_variance() {
        let mut rng = Pcg32::seed_from_u64(5);
        for variance in [-0.5, 0.0, 0.3, 2.0, f32::NAN] {
            let factor = jitter(&mut rng, variance);
            if variance.is_nan() {
                continue;
            }
            let spread = variance.abs().min(1.0);
            assert!(factor >= 1.0 - spread && factor <= 1.0 + spread);
        }
        assert_eq!(jitter(&mut rng, 0.0), 1.0);
    }

    #[test]
    fn test_launch_radius_bound_uses_unjittered_length() {
        let spine = straight_spine();
        let morph = MorphParams::default();
        let shape = BranchShapeParams {
            variance: 0.5,
            ..Default::default()
        };
        let curves = CurveParams {
            taper: CurveKind::Constant { value: 1.0 },
            length_scale: CurveKind::Constant { value: 0.1 },
        };
        let request = GuideRequest {
            spine: &spine,
            morph: &morph,
            shape: &shape,
            curves: &curves,
            count: 1,
        };

        let mut rng = Pcg32::seed_from_u64(12);
        let pack = launch(&request, Vec3::ZERO, UP, Vec3::X, 0.5, &mut rng).unwrap();

        // replay the three draws: lift, length, radius
        let mut replay = Pcg32::seed_from_u64(12);
        let _lift = jitter(&mut replay, shape.variance);
        let length_factor = jitter(&mut replay, shape.variance);
        let radius_factor = jitter(&mut replay, shape.variance);

        let planned = morph.length * shape.child_scaling * 0.1;
        assert!((pack.direction.length() - planned * length_factor).abs() < 1e-5);
        let expected = planned / morph.length * morph.base_radius * radius_factor;
        assert!((pack.radius - expected).abs() < 1e-6);
    }

    #[test]
    fn test_launch_drops_zero_length() {
        let spine = straight_spine();
        let morph = MorphParams::default();
        let shape = BranchShapeParams::default();
        let curves = CurveParams::default();
        let request = GuideRequest {
            spine: &spine,
            morph: &morph,
            shape: &shape,
            curves: &curves,
            count: 1,
        };
        let mut rng = Pcg32::seed_from_u64(1);
        // the default length curve is zero at the base
        assert!(launch(&request, Vec3::ZERO, UP, Vec3::X, 0.0, &mut rng).is_none());
    }
}
