//! A single branch: spine, morphology and pending child placements

use glam::Vec3;
use tracing::trace;

use crate::error::{Result, TreeGenError};
use crate::guides::{GuidePack, GuidePlacer, GuideRequest, PlaceGuides};
use crate::math::{UP, normalize_or};
use crate::params::{MorphParams, TreeParams};
use crate::seed;
use crate::spine::{Bend, Jiggle, Spine, SpineModifier, Weight, segment_count};

/// One branch of the hierarchy
///
/// Life cycle: constructed from a [`GuidePack`], then [`generate`](Self::generate)
/// grows and shapes the spine (or, for a trunk supplied from outside,
/// [`regenerate`](Self::regenerate) shapes the given one), then
/// [`guides_gen`](Self::guides_gen) samples the children's placements, and
/// finally [`interpolate`](Self::interpolate) may refine the spine for output.
#[derive(Debug, Clone)]
pub struct Branch {
    pack: GuidePack,
    morph: MorphParams,
    child_morph: MorphParams,
    spine: Spine,
    is_trunk: bool,
    lineage: u64,
    guidepacks: Vec<GuidePack>,
}

impl Branch {
    /// Branch growing from `pack`
    ///
    /// The target length comes from the pack's direction vector and the base
    /// radius from its radius; `parent_morph` supplies the rest.
    pub fn new(
        pack: GuidePack,
        parent_morph: &MorphParams,
        is_trunk: bool,
        lineage: u64,
    ) -> Result<Self> {
        let length = pack.direction.length();
        let morph = MorphParams {
            length,
            base_radius: pack.radius.max(parent_morph.tip_radius),
            segment_length: parent_morph.segment_length.min(length / 2.0),
            ..*parent_morph
        };
        morph.validate()?;

        Ok(Self {
            pack,
            morph,
            child_morph: morph.child(),
            spine: Spine::default(),
            is_trunk,
            lineage,
            guidepacks: Vec::new(),
        })
    }

    /// Trunk shaped from an externally supplied spine
    pub fn from_spine(points: Vec<Vec3>, morph: &MorphParams, lineage: u64) -> Result<Self> {
        if points.len() < 3 {
            return Err(TreeGenError::InsufficientSpineLength {
                points: points.len(),
                required: 3,
            });
        }
        if !points.iter().all(|p| p.is_finite()) {
            return Err(TreeGenError::InvalidParams(
                "trunk spine contains non-finite coordinates".into(),
            ));
        }
        let origin = points[0];
        let Some(far) = points.iter().copied().find(|p| *p != origin) else {
            return Err(TreeGenError::DegenerateGeometry(
                "all trunk spine points coincide".into(),
            ));
        };
        let initial = normalize_or(points[1] - origin, normalize_or(far - origin, UP));

        let pack = GuidePack {
            origin,
            direction: initial * morph.length,
            radius: morph.base_radius,
        };
        let mut branch = Self::new(pack, morph, true, lineage)?;
        branch.spine = Spine::from_points(points);
        Ok(branch)
    }

    /// Trunk grown as a straight vertical spine at the origin
    pub fn straight_trunk(morph: &MorphParams, lineage: u64) -> Result<Self> {
        let spine = Spine::grow_straight(Vec3::ZERO, UP, morph.length, morph.segment_length)?;
        Self::from_spine(spine.into_points(), morph, lineage)
    }

    fn bend(&self, params: &TreeParams, point_count: usize) -> Bend {
        Bend::new(
            &params.bend,
            self.morph.segment_length,
            point_count,
            self.pack.direction,
            seed::noise_seed(params.bend.seed, self.lineage),
        )
    }

    fn jiggle(&self, params: &TreeParams) -> Jiggle {
        Jiggle::new(
            params.jiggle.amplitude,
            params.jiggle.frequency,
            self.morph.segment_length,
            self.morph.length,
            seed::noise_seed(params.jiggle.seed, self.lineage),
        )
    }

    fn weight(&self, params: &TreeParams) -> Weight {
        Weight::new(
            self.morph.segment_length,
            self.morph.base_radius,
            params.bend.weight_bias,
            params.bend.curl_bias,
            self.is_trunk,
        )
    }

    /// Grow the spine segment by segment, bending each step, then jiggle and weigh it
    pub fn generate(&mut self, params: &TreeParams) -> &mut Self {
        let seg = self.morph.segment_length;
        let n = segment_count(self.morph.length, seg);
        let bend = self.bend(params, n);

        let mut spine = Spine::seed(Vec3::ZERO, self.pack.direction, seg);
        while spine.len() < n {
            spine.extend(seg);
            bend.step(&mut spine);
        }
        self.jiggle(params).apply(&mut spine);
        self.weight(params).apply(&mut spine);
        spine.translate(self.pack.origin);

        self.spine = spine;
        self
    }

    /// Re-shape the current spine in place: bend every segment, jiggle, weigh
    pub fn regenerate(&mut self, params: &TreeParams) -> &mut Self {
        let Some(origin) = self.spine.first() else {
            return self;
        };
        let n = self.spine.len();
        let bend = self.bend(params, n);
        let jiggle = self.jiggle(params);
        let weight = self.weight(params);

        let spine = &mut self.spine;
        spine.translate(-origin);
        bend.apply(spine);
        jiggle.apply(spine);
        weight.apply(spine);
        spine.translate(origin);
        self
    }

    /// Sample placements for up to `count` children
    ///
    /// A spine too short above `start_height` yields no guides; out-of-range
    /// shape parameters are an error.
    pub fn guides_gen(&mut self, count: u32, params: &TreeParams) -> Result<&[GuidePack]> {
        params.shape.validate()?;
        self.child_morph = self.morph.child();

        let placer = GuidePlacer::from_params(&params.sampling);
        let request = GuideRequest {
            spine: self.spine.points(),
            morph: &self.morph,
            shape: &params.shape,
            curves: &params.curves,
            count,
        };
        let mut rng = seed::guide_rng(params.shape.seed, self.lineage);

        self.guidepacks = match placer.place_guides(&request, &mut rng) {
            Ok(guides) => guides,
            Err(TreeGenError::InsufficientSpineLength { points, required }) => {
                trace!(
                    "branch {:016x}: {} usable spine points, {} needed for guides",
                    self.lineage,
                    points,
                    required
                );
                Vec::new()
            }
            Err(e) => return Err(e),
        };
        Ok(&self.guidepacks)
    }

    /// Refine the spine for smoother output
    pub fn interpolate(&mut self, levels: u32) {
        self.spine.interpolate(levels);
    }

    pub fn spine(&self) -> &Spine {
        &self.spine
    }

    pub fn morph(&self) -> &MorphParams {
        &self.morph
    }

    /// Morphology handed down to children
    pub fn child_morph(&self) -> &MorphParams {
        &self.child_morph
    }

    pub fn guidepacks(&self) -> &[GuidePack] {
        &self.guidepacks
    }

    pub fn is_trunk(&self) -> bool {
        self.is_trunk
    }

    pub fn lineage(&self) -> u64 {
        self.lineage
    }
}
