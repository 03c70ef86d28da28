//! Shaping curves
//!
//! Two user-supplied curves drive the tree's proportions: the taper curve maps
//! normalized height to a radius factor, the length-scale curve maps the height
//! of a child's attachment point to a length factor. Both are expressed through
//! the [`Curve`] trait so that closures and the serializable [`CurveKind`] are
//! interchangeable.

use serde::{Deserialize, Serialize};

use crate::error::{Result, TreeGenError};

/// A scalar function of normalized height
pub trait Curve {
    /// Evaluate at `x` (normally in `[0, 1]`)
    fn eval(&self, x: f32) -> f32;
}

impl<F: Fn(f32) -> f32> Curve for F {
    fn eval(&self, x: f32) -> f32 {
        self(x)
    }
}

/// Built-in and table-driven curves that can be stored in a parameter file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum CurveKind {
    /// Trunk flare: `1/(x+1)^a - (x/2)^a`
    Flare { exponent: f32 },
    /// Branch length profile: `sqrt((1-(x-1)^2) / (a(x-1)+1))`
    Ellipse { shift: f32 },
    /// `1 - x`
    Linear,
    /// Same value everywhere
    Constant { value: f32 },
    /// Piecewise-linear table of `[x, y]` pairs
    Samples { points: Vec<[f32; 2]> },
}

impl CurveKind {
    /// Default trunk taper
    pub fn default_taper() -> Self {
        CurveKind::Flare { exponent: 1.0 }
    }

    /// Default child length scaling
    pub fn default_length_scale() -> Self {
        CurveKind::Ellipse { shift: 0.7 }
    }
}

impl CurveKind {
    /// Reject non-finite shape values and unsorted or empty sample tables
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TreeGenError::InvalidParams(msg));
        match self {
            CurveKind::Flare { exponent: value }
            | CurveKind::Ellipse { shift: value }
            | CurveKind::Constant { value } => {
                if !value.is_finite() {
                    return invalid(format!("curve parameter must be finite, got {value}"));
                }
            }
            CurveKind::Linear => {}
            CurveKind::Samples { points } => {
                if points.is_empty() {
                    return invalid("sample curve needs at least one point".into());
                }
                if points.iter().flatten().any(|v| !v.is_finite()) {
                    return invalid("sample curve points must be finite".into());
                }
                if points.windows(2).any(|w| w[1][0] < w[0][0]) {
                    return invalid("sample curve x values must be ascending".into());
                }
            }
        }
        Ok(())
    }
}

impl Curve for CurveKind {
    fn eval(&self, x: f32) -> f32 {
        match self {
            CurveKind::Flare { exponent } => {
                1.0 / (x + 1.0).powf(*exponent) - (x / 2.0).powf(*exponent)
            }
            CurveKind::Ellipse { shift } => {
                let denom = shift * (x - 1.0) + 1.0;
                if denom <= 0.0 {
                    return 0.0;
                }
                ((1.0 - (x - 1.0).powi(2)) / denom).max(0.0).sqrt()
            }
            CurveKind::Linear => 1.0 - x,
            CurveKind::Constant { value } => *value,
            CurveKind::Samples { points } => sample_table(points, x),
        }
    }
}

/// Piecewise-linear lookup in a table sorted by ascending `x`
fn sample_table(points: &[[f32; 2]], x: f32) -> f32 {
    let (Some(first), Some(last)) = (points.first(), points.last()) else {
        return 0.0;
    };
    if !(x > first[0]) {
        return first[1];
    }
    if x >= last[0] {
        return last[1];
    }
    // first[0] < x < last[0], so 1 <= i < len
    let i = points.partition_point(|p| p[0] < x);
    let ([x0, y0], [x1, y1]) = (points[i - 1], points[i]);
    let span = x1 - x0;
    if span <= f32::EPSILON {
        return y1;
    }
    y0 + (y1 - y0) * (x - x0) / span
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flare_endpoints() {
        let flare = CurveKind::Flare { exponent: 1.0 };
        assert!((flare.eval(0.0) - 1.0).abs() < 1e-6);
        assert!(flare.eval(1.0).abs() < 1e-6);
        assert!(flare.eval(0.5) > 0.0);
    }

    #[test]
    fn test_ellipse_profile() {
        let curve = CurveKind::Ellipse { shift: 0.7 };
        assert!(curve.eval(0.0).abs() < 1e-6);
        assert!((curve.eval(1.0) - 1.0).abs() < 1e-6);
        assert!(curve.eval(0.5) > 0.0);
    }

    #[test]
    fn test_ellipse_non_positive_denominator() {
        let curve = CurveKind::Ellipse { shift: 2.0 };
        assert_eq!(curve.eval(0.0), 0.0);
    }

    #[test]
    fn test_samples_interpolate_and_clamp() {
        let curve = CurveKind::Samples {
            points: vec![[0.0, 2.0], [0.5, 1.5], [1.0, 0.0]],
        };
        assert!((curve.eval(0.25) - 1.75).abs() < 1e-6);
        assert!((curve.eval(0.75) - 0.75).abs() < 1e-6);
        assert_eq!(curve.eval(-1.0), 2.0);
        assert_eq!(curve.eval(3.0), 0.0);
        assert_eq!(curve.eval(f32::NAN), 2.0);
        assert_eq!(CurveKind::Samples { points: vec![] }.eval(0.5), 0.0);
    }

    #[test]
    fn test_validate_sample_tables() {
        let sorted = CurveKind::Samples {
            points: vec![[0.0, 1.0], [0.5, 0.5], [1.0, 0.0]],
        };
        assert!(sorted.validate().is_ok());

        let unsorted = CurveKind::Samples {
            points: vec![[1.0, 0.0], [0.0, 2.0]],
        };
        assert!(matches!(
            unsorted.validate(),
            Err(TreeGenError::InvalidParams(_))
        ));
        assert!(CurveKind::Samples { points: vec![] }.validate().is_err());
        assert!(CurveKind::Flare { exponent: f32::NAN }.validate().is_err());
        assert!(CurveKind::default_taper().validate().is_ok());
    }

    #[test]
    fn test_closure_is_curve() {
        let half = |x: f32| x * 0.5;
        assert_eq!(half.eval(2.0), 1.0);
    }
}
