//! Generation parameters
//!
//! Every section deserializes with `#[serde(default)]`, so a parameter file only
//! needs the keys it wants to change.

use serde::{Deserialize, Serialize};

use crate::curves::CurveKind;
use crate::error::{Result, TreeGenError};

/// Complete parameter set for one `generate()` call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct TreeParams {
    #[serde(default)]
    pub morph: MorphParams,
    #[serde(default)]
    pub bend: BendParams,
    #[serde(default)]
    pub jiggle: JiggleParams,
    #[serde(default)]
    pub shape: BranchShapeParams,
    #[serde(default)]
    pub sampling: SamplingParams,
    #[serde(default)]
    pub curves: CurveParams,
    #[serde(default)]
    pub output: OutputParams,
    #[serde(default)]
    pub trunk: TrunkParams,
}

impl TreeParams {
    /// Check every section, reporting the first problem found
    pub fn validate(&self) -> Result<()> {
        self.morph.validate()?;
        self.shape.validate()?;
        self.sampling.validate()?;
        self.curves.validate()?;
        if !self.bend.is_finite() || !self.jiggle.is_finite() {
            return Err(TreeGenError::InvalidParams(
                "bend and jiggle parameters must be finite".into(),
            ));
        }
        Ok(())
    }

    /// Use `seed` for bend noise, jiggle noise and guide placement
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.bend.seed = seed;
        self.jiggle.seed = seed;
        self.shape.seed = seed;
        self
    }
}

/// Per-branch morphology
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MorphParams {
    /// Vertices per bark ring
    pub sides: u32,
    /// Target spine length
    pub length: f32,
    /// Radius at the base of the branch
    pub base_radius: f32,
    /// Smallest radius anywhere on the branch
    pub tip_radius: f32,
    /// Uniform scale applied to the final mesh
    pub scale: f32,
    /// Distance between consecutive spine points
    pub segment_length: f32,
}

impl Default for MorphParams {
    fn default() -> Self {
        Self {
            sides: 12,
            length: 10.0,
            base_radius: 0.44,
            tip_radius: 0.0044,
            scale: 1.0,
            segment_length: 10.0 / 30.0,
        }
    }
}

impl MorphParams {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TreeGenError::InvalidMorphParams(msg));

        if self.sides < 3 {
            return invalid(format!("sides must be >= 3, got {}", self.sides));
        }
        for (name, value) in [
            ("length", self.length),
            ("segment_length", self.segment_length),
            ("base_radius", self.base_radius),
            ("tip_radius", self.tip_radius),
            ("scale", self.scale),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return invalid(format!("{name} must be positive, got {value}"));
            }
        }
        if self.tip_radius > self.base_radius {
            return invalid(format!(
                "tip_radius {} exceeds base_radius {}",
                self.tip_radius, self.base_radius
            ));
        }
        Ok(())
    }

    /// Morphology inherited by children of a branch with these parameters
    pub fn child(&self) -> Self {
        Self {
            sides: (self.sides / 2 + 1).max(4),
            ..*self
        }
    }
}

/// How quickly the bend pass steers the growing tip upright
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BendProgress {
    /// Divide by the number of points still to grow (stronger near the tip)
    #[default]
    Remaining,
    /// Divide by the total point count
    Normalized,
}

/// Bend and weight controls shared by every branch of a run
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BendParams {
    /// Strength of the noisy bend direction
    pub amplitude: f32,
    /// Pull of the tip toward vertical
    pub upright_bias: f32,
    /// Trunk-only re-centering of the mass toward vertical
    pub curl_bias: f32,
    /// Noise frequency along the spine
    pub noise_frequency: f32,
    /// Strength of the droop under weight
    pub weight_bias: f32,
    pub progress: BendProgress,
    pub seed: u32,
}

impl Default for BendParams {
    fn default() -> Self {
        Self {
            amplitude: 0.5,
            upright_bias: 0.2,
            curl_bias: 0.5,
            noise_frequency: 0.3,
            weight_bias: 0.02,
            progress: BendProgress::Remaining,
            seed: 0,
        }
    }
}

impl BendParams {
    fn is_finite(&self) -> bool {
        [
            self.amplitude,
            self.upright_bias,
            self.curl_bias,
            self.noise_frequency,
            self.weight_bias,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Small-scale lateral roughness
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct JiggleParams {
    pub amplitude: f32,
    pub frequency: f32,
    pub seed: u32,
}

impl Default for JiggleParams {
    fn default() -> Self {
        Self {
            amplitude: 0.1,
            frequency: 1.0,
            seed: 0,
        }
    }
}

impl JiggleParams {
    fn is_finite(&self) -> bool {
        self.amplitude.is_finite() && self.frequency.is_finite()
    }
}

/// Placement and proportions of child branches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BranchShapeParams {
    /// Number of child levels below the trunk
    pub max_depth: u32,
    /// Launch angle from the parent at its tip (radians)
    pub min_angle: f32,
    /// Launch angle from the parent at its base (radians)
    pub max_angle: f32,
    /// Fraction of the parent, from its base, that bears no children
    pub start_height: f32,
    /// Flattening of child directions toward the horizontal plane, 0..=1
    pub horizontal_bias: f32,
    /// Relative jitter of angles, lengths and radii, 0..1
    pub variance: f32,
    /// Child length relative to the parent
    pub child_scaling: f32,
    /// Target child count per parent, one entry per level
    pub branch_counts: Vec<u32>,
    pub seed: u32,
}

impl Default for BranchShapeParams {
    fn default() -> Self {
        Self {
            max_depth: 2,
            min_angle: 30f32.to_radians(),
            max_angle: 60f32.to_radians(),
            start_height: 0.3,
            horizontal_bias: 0.2,
            variance: 0.1,
            child_scaling: 0.3,
            branch_counts: vec![6, 4],
            seed: 0,
        }
    }
}

impl BranchShapeParams {
    pub fn validate(&self) -> Result<()> {
        let invalid = |msg: String| Err(TreeGenError::InvalidParams(msg));

        if !(0.0..1.0).contains(&self.variance) {
            return invalid(format!("variance must be in [0, 1), got {}", self.variance));
        }
        if !(0.0..1.0).contains(&self.start_height) {
            return invalid(format!(
                "start_height must be in [0, 1), got {}",
                self.start_height
            ));
        }
        if !(0.0..=1.0).contains(&self.horizontal_bias) {
            return invalid(format!(
                "horizontal_bias must be in [0, 1], got {}",
                self.horizontal_bias
            ));
        }
        if !self.min_angle.is_finite() || !self.max_angle.is_finite() {
            return invalid("branch angles must be finite".into());
        }
        if self.min_angle > self.max_angle {
            return invalid(format!(
                "min_angle {} exceeds max_angle {}",
                self.min_angle, self.max_angle
            ));
        }
        if !self.child_scaling.is_finite() || self.child_scaling < 0.0 {
            return invalid(format!(
                "child_scaling must be non-negative, got {}",
                self.child_scaling
            ));
        }
        if self.branch_counts.len() < self.max_depth as usize {
            return invalid(format!(
                "{} branch counts given for max_depth {}",
                self.branch_counts.len(),
                self.max_depth
            ));
        }
        Ok(())
    }

    /// Target child count for parents on `level`
    pub fn count_for_level(&self, level: usize) -> u32 {
        self.branch_counts.get(level).copied().unwrap_or(0)
    }
}

/// Which guide placer to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum GuideStrategy {
    /// Quality-scored rejection sampling along the parent spine
    #[default]
    Scored,
    /// Blue-noise disc samples mapped onto the parent spine
    Poisson,
}

/// Direction of the scored sampler's scan along the parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ScanOrder {
    #[default]
    TipToRoot,
    RootToTip,
}

/// Guide sampling controls
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingParams {
    pub strategy: GuideStrategy,
    /// Candidates proposed per scan position
    pub quality: u32,
    /// Number of recent buckets checked for spacing
    pub look_back: usize,
    pub scan_order: ScanOrder,
    /// Upper bound on candidate proposals per parent
    pub max_attempts: u32,
}

impl Default for SamplingParams {
    fn default() -> Self {
        Self {
            strategy: GuideStrategy::Scored,
            quality: 12,
            look_back: 10,
            scan_order: ScanOrder::TipToRoot,
            max_attempts: 20_000,
        }
    }
}

impl SamplingParams {
    pub fn validate(&self) -> Result<()> {
        if self.quality == 0 {
            return Err(TreeGenError::InvalidParams("quality must be >= 1".into()));
        }
        if self.look_back == 0 {
            return Err(TreeGenError::InvalidParams("look_back must be >= 1".into()));
        }
        Ok(())
    }
}

/// The two shaping curves
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurveParams {
    /// Radius factor by normalized height
    pub taper: CurveKind,
    /// Child length factor by attachment height
    pub length_scale: CurveKind,
}

impl Default for CurveParams {
    fn default() -> Self {
        Self {
            taper: CurveKind::default_taper(),
            length_scale: CurveKind::default_length_scale(),
        }
    }
}

impl CurveParams {
    pub fn validate(&self) -> Result<()> {
        self.taper.validate()?;
        self.length_scale.validate()
    }
}

/// What `generate()` emits
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputParams {
    /// Bark mesh with faces when true, bare spines with edges otherwise
    pub faces: bool,
    /// Spine refinement passes before meshing
    pub interpolation_levels: u32,
}

impl Default for OutputParams {
    fn default() -> Self {
        Self {
            faces: true,
            interpolation_levels: 0,
        }
    }
}

/// Optional externally supplied trunk
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct TrunkParams {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spine: Option<Vec<[f32; 3]>>,
}
