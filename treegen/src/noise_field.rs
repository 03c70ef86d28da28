//! Scalar Perlin noise along a spine

use noise::{NoiseFn, Perlin};

/// Keeps samples off the integer lattice, where Perlin noise is always zero
const CHANNEL_OFFSET: f64 = 0.37;

/// Seeded 1D noise lookups, one independent channel per `channel` value
#[derive(Clone)]
pub struct NoiseField {
    perlin: Perlin,
}

impl NoiseField {
    pub fn new(seed: u32) -> Self {
        Self {
            perlin: Perlin::new(seed),
        }
    }

    /// Noise in `[0, 1)` at position `t` of channel `channel`
    pub fn sample01(&self, channel: f32, t: f32) -> f32 {
        let value = self
            .perlin
            .get([0.0, channel as f64 + CHANNEL_OFFSET, t as f64]);
        ((value * 0.5 + 0.5) as f32).clamp(0.0, 1.0 - f32::EPSILON)
    }

    /// Noise in `[-1, 1)` at position `t` of channel `channel`
    pub fn signed(&self, channel: f32, t: f32) -> f32 {
        self.sample01(channel, t) * 2.0 - 1.0
    }
}
