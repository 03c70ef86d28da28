//! Branch spines and the passes that shape them
//!
//! A [`Spine`] is the ordered polyline along a branch's medial axis, root first.
//! It is grown straight from an origin and then shaped in place by the
//! modifiers in this module:
//!
//! - [`Bend`]: steers each new segment toward a blend of an upright "ideal"
//!   direction and a noisy one, applied once per growth step
//! - [`Jiggle`]: small lateral noise displacement
//! - [`Weight`]: droop under the weight of the downstream part of the branch
//!
//! ```
//! use treegen::spine::{Spine, SpineModifier, Jiggle};
//! use glam::Vec3;
//!
//! let mut spine = Spine::grow_straight(Vec3::ZERO, Vec3::Z, 10.0, 1.0)?;
//! assert_eq!(spine.len(), 11);
//! Jiggle::new(0.1, 1.0, 1.0, 10.0, 7).apply(&mut spine);
//! # Ok::<(), treegen::TreeGenError>(())
//! ```

mod bend;
mod jiggle;
mod weight;

pub use bend::Bend;
pub use jiggle::Jiggle;
pub use weight::Weight;

use glam::Vec3;

use crate::error::{Result, TreeGenError};
use crate::math::{UP, normalize_or};

/// Blend factor of the four-point refinement scheme
const REFINE_TENSION: f32 = 0.1;

/// Trait for in-place spine passes
pub trait SpineModifier {
    /// Apply this pass to a spine, modifying it in place
    fn apply(&self, spine: &mut Spine);
}

/// Number of points grown for a branch: `round(length / segment_length) + 1`
pub fn segment_count(length: f32, segment_length: f32) -> usize {
    (length / segment_length).round() as usize + 1
}

/// Ordered polyline, root first
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spine {
    points: Vec<Vec3>,
}

impl Spine {
    /// Wrap existing points
    pub fn from_points(points: Vec<Vec3>) -> Self {
        Self { points }
    }

    /// Two-point spine: `origin` and one segment along `direction`
    pub fn seed(origin: Vec3, direction: Vec3, segment_length: f32) -> Self {
        let dir = normalize_or(direction, UP);
        Self {
            points: vec![origin, origin + dir * segment_length],
        }
    }

    /// Straight spine of `segment_count(length, segment_length)` points
    pub fn grow_straight(
        origin: Vec3,
        direction: Vec3,
        length: f32,
        segment_length: f32,
    ) -> Result<Self> {
        if !(segment_length > 0.0) || !(length > 0.0) {
            return Err(TreeGenError::InvalidMorphParams(format!(
                "cannot grow a spine of length {length} with segments of {segment_length}"
            )));
        }
        let n = segment_count(length, segment_length);
        let mut spine = Self::seed(origin, direction, segment_length);
        while spine.len() < n {
            spine.extend(segment_length);
        }
        Ok(spine)
    }

    /// Append one segment continuing the direction of the last one
    pub fn extend(&mut self, segment_length: f32) {
        let next = match self.points.as_slice() {
            [.., prev, last] => *last + normalize_or(*last - *prev, UP) * segment_length,
            [last] => *last + UP * segment_length,
            [] => Vec3::ZERO,
        };
        self.points.push(next);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[Vec3] {
        &self.points
    }

    pub fn points_mut(&mut self) -> &mut [Vec3] {
        &mut self.points
    }

    pub fn into_points(self) -> Vec<Vec3> {
        self.points
    }

    pub fn first(&self) -> Option<Vec3> {
        self.points.first().copied()
    }

    /// Sum of segment lengths
    pub fn arc_length(&self) -> f32 {
        self.points.windows(2).map(|w| w[0].distance(w[1])).sum()
    }

    /// Move every point by `offset`
    pub fn translate(&mut self, offset: Vec3) {
        for p in &mut self.points {
            *p += offset;
        }
    }

    /// Insert smoothed midpoints between interior point pairs, `levels` times
    ///
    /// Each level inserts `(0.5+a)(p1+p2) - a(p0+p3)` between `p1` and `p2` for
    /// every segment that has a neighbour on both sides; the first and last
    /// segments are left as they are. Spines of three points or fewer are not
    /// touched.
    pub fn interpolate(&mut self, levels: u32) {
        if self.points.len() <= 3 {
            return;
        }
        let a = REFINE_TENSION;
        for _ in 0..levels {
            let sp = &self.points;
            let n = sp.len();
            let mut refined = Vec::with_capacity(2 * n - 3);
            for j in 0..n {
                refined.push(sp[j]);
                if j >= 1 && j + 2 < n {
                    refined
                        .push((0.5 + a) * (sp[j] + sp[j + 1]) - a * (sp[j - 1] + sp[j + 2]));
                }
            }
            self.points = refined;
        }
    }
}
