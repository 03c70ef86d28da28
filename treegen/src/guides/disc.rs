//! Blue-noise sampling over the unit disc

use std::f32::consts::{PI, TAU};

use glam::Vec2;
use rand::Rng;

/// A sample in polar form
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscPoint {
    /// Angle in radians, `[0, 2π)`
    pub angle: f32,
    /// Distance from the center, `[0, 1]`
    pub radius: f32,
}

/// Source of well-spaced points over the unit disc
pub trait DiscSampler {
    /// Exactly `count` points with (approximately) maximal minimum spacing
    fn sample_disc<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<DiscPoint>;
}

/// Dart throwing with a relaxing minimum distance
///
/// Starts from the spacing of an ideal packing and shrinks it whenever
/// `attempts` consecutive darts miss, so it always terminates with exactly the
/// requested number of points.
#[derive(Debug, Clone, Copy)]
pub struct DartThrowing {
    pub attempts: u32,
    /// Factor applied to the minimum distance after a run of misses
    pub relax: f32,
}

impl Default for DartThrowing {
    fn default() -> Self {
        Self {
            attempts: 30,
            relax: 0.85,
        }
    }
}

impl DiscSampler for DartThrowing {
    fn sample_disc<R: Rng + ?Sized>(&self, count: usize, rng: &mut R) -> Vec<DiscPoint> {
        let mut placed: Vec<(Vec2, DiscPoint)> = Vec::with_capacity(count);
        if count == 0 {
            return Vec::new();
        }
        let mut min_distance = (PI / count as f32).sqrt();
        let relax = if self.relax >= 0.0 {
            self.relax.min(0.99)
        } else {
            Self::default().relax
        };

        while placed.len() < count {
            let mut hit = false;
            for _ in 0..self.attempts.max(1) {
                let angle = rng.random_range(0.0..TAU);
                let radius = rng.random::<f32>().sqrt();
                let p = Vec2::from_angle(angle) * radius;
                if placed.iter().all(|(q, _)| q.distance(p) >= min_distance) {
                    placed.push((p, DiscPoint { angle, radius }));
                    hit = true;
                    break;
                }
            }
            if !hit {
                min_distance *= relax;
            }
        }
        placed.into_iter().map(|(_, point)| point).collect()
    }
}
