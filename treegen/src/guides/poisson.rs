//! Fast blue-noise guide placement

use rand_pcg::Pcg32;

use super::disc::{DartThrowing, DiscSampler};
use super::{GuidePack, GuideRequest, PlaceGuides, SubSpine, launch, outward};
use crate::error::Result;

/// Maps disc samples onto the parent spine
///
/// Each disc point's radius becomes a position along the usable part of the
/// spine and its angle the azimuth of the child around the parent. Produces
/// exactly `count` attachment points in O(count), at the price of only
/// approximate spacing.
#[derive(Debug, Clone, Copy, Default)]
pub struct PoissonSampler<D = DartThrowing> {
    pub disc: D,
}

impl<D: DiscSampler> PlaceGuides for PoissonSampler<D> {
    fn place_guides(&self, request: &GuideRequest<'_>, rng: &mut Pcg32) -> Result<Vec<GuidePack>> {
        let Some(sub) = SubSpine::for_request(request)? else {
            return Ok(Vec::new());
        };
        let start = request.shape.start_height;
        let samples = self.disc.sample_disc(request.count as usize, rng);

        Ok(samples
            .iter()
            .filter_map(|sample| {
                let frac = sample.radius * sub.segments() as f32;
                let (origin, tangent) = sub.locate(frac);
                let h = sub.parent_height(frac);
                let height = (h / (1.0 - start) - start).clamp(0.0, 1.0);
                let dir = outward(tangent, sample.angle, request.shape.horizontal_bias);
                launch(request, origin, tangent, dir, height, rng)
            })
            .collect())
    }
}
