//! Quality-scored rejection sampling

use glam::Vec3;
use rand::Rng;
use rand_pcg::Pcg32;
use tracing::{trace, warn};

use super::{GuidePack, GuideRequest, PlaceGuides, SubSpine, launch, outward, random_azimuth};
use crate::error::Result;
use crate::math::{UP, normalize_or};
use crate::params::{SamplingParams, ScanOrder};

/// Rejection sampler scanning the parent spine segment by segment
///
/// At each scan position `quality` candidates are proposed; a candidate is kept
/// if it lies at least the minimum separation away from every point kept in
/// the last `look_back` buckets. A position that yields nothing closes the
/// current bucket and the scan moves on. The result is a loose, well-spaced
/// cluster of points at O(n·k) cost without a spatial index.
#[derive(Debug, Clone, Copy)]
pub struct ScoredSampler {
    pub quality: u32,
    pub look_back: usize,
    pub scan_order: ScanOrder,
    pub max_attempts: u32,
}

impl ScoredSampler {
    pub fn from_params(sampling: &SamplingParams) -> Self {
        Self {
            quality: sampling.quality,
            look_back: sampling.look_back,
            scan_order: sampling.scan_order,
            max_attempts: sampling.max_attempts,
        }
    }
}

impl Default for ScoredSampler {
    fn default() -> Self {
        Self::from_params(&SamplingParams::default())
    }
}

/// An accepted sample
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate {
    /// Sampled point, `reach` away from the spine
    pub point: Vec3,
    /// Point on the spine it grows from
    pub origin: Vec3,
    pub tangent: Vec3,
    /// Fractional index into the sub-spine
    pub frac: f32,
    /// Bucket the candidate was accepted into
    pub bucket: usize,
}

/// Sampling inputs that do not change during one scan
pub(crate) struct ScanSettings {
    /// Distance of candidate points from the spine
    pub reach: f32,
    pub min_separation: f32,
    pub max_count: usize,
    pub horizontal_bias: f32,
}

impl ScoredSampler {
    /// Run the scan, returning accepted candidates in acceptance order
    pub(crate) fn sample(
        &self,
        sub: &SubSpine<'_>,
        settings: &ScanSettings,
        rng: &mut Pcg32,
    ) -> Vec<Candidate> {
        let positions: Vec<usize> = match self.scan_order {
            ScanOrder::TipToRoot => (0..sub.segments()).rev().collect(),
            ScanOrder::RootToTip => (0..sub.segments()).collect(),
        };

        let mut buckets: Vec<Vec<Vec3>> = vec![Vec::new()];
        let mut accepted = Vec::new();
        let mut attempts = 0u32;
        let mut pos = 0;

        'scan: while pos < positions.len() && accepted.len() < settings.max_count {
            let idx = positions[pos];
            let mut found = false;
            for _ in 0..self.quality {
                if attempts >= self.max_attempts {
                    warn!(
                        "guide sampling stopped after {} attempts with {} of {} guides",
                        attempts,
                        accepted.len(),
                        settings.max_count
                    );
                    break 'scan;
                }
                attempts += 1;

                let frac = idx as f32 + rng.random::<f32>();
                let (origin, tangent) = sub.locate(frac);
                let dir = outward(tangent, random_azimuth(rng), settings.horizontal_bias);
                let point = origin + dir * settings.reach;

                if clears(point, &buckets, settings.min_separation, self.look_back) {
                    let bucket = buckets.len() - 1;
                    buckets[bucket].push(point);
                    accepted.push(Candidate {
                        point,
                        origin,
                        tangent,
                        frac,
                        bucket,
                    });
                    found = true;
                    if accepted.len() >= settings.max_count {
                        break 'scan;
                    }
                }
            }
            if !found {
                pos += 1;
                buckets.push(Vec::new());
            }
        }
        accepted
    }
}

/// Whether `point` keeps `min_separation` from every point in the last `look_back` buckets
fn clears(point: Vec3, buckets: &[Vec<Vec3>], min_separation: f32, look_back: usize) -> bool {
    buckets
        .iter()
        .rev()
        .take(look_back)
        .flatten()
        .all(|p| p.distance(point) >= min_separation)
}

impl PlaceGuides for ScoredSampler {
    fn place_guides(&self, request: &GuideRequest<'_>, rng: &mut Pcg32) -> Result<Vec<GuidePack>> {
        let Some(sub) = SubSpine::for_request(request)? else {
            return Ok(Vec::new());
        };

        let settings = ScanSettings {
            reach: request.morph.length * request.shape.child_scaling / 3.0,
            min_separation: sub.arc_length() / request.count as f32,
            max_count: request.count as usize,
            horizontal_bias: request.shape.horizontal_bias,
        };
        let candidates = self.sample(&sub, &settings, rng);
        trace!(
            "accepted {} candidates over {} buckets",
            candidates.len(),
            candidates.last().map_or(0, |c| c.bucket + 1)
        );

        Ok(candidates
            .iter()
            .filter_map(|c| {
                let fallback = normalize_or(c.tangent, UP).any_orthonormal_vector();
                let dir = normalize_or(c.point - c.origin, fallback);
                launch(
                    request,
                    c.origin,
                    c.tangent,
                    dir,
                    sub.parent_height(c.frac),
                    rng,
                )
            })
            .collect())
    }
}
