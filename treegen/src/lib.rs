//! Procedural tree mesh generation
//!
//! A tree is grown as a hierarchy of branches. Each branch is a spine (a
//! polyline) grown segment by segment and shaped by bend, jiggle and weight
//! passes; children are placed along their parent by a guide placer, and the
//! finished spines are either meshed as ring-extruded bark or emitted as a bare
//! skeleton.
//!
//! ```
//! use treegen::{TreeParams, generate};
//!
//! let mut params = TreeParams::default().with_seed(3);
//! params.shape.max_depth = 1;
//! let mesh = generate(&params)?;
//! assert!(!mesh.faces.is_empty());
//! # Ok::<(), treegen::TreeGenError>(())
//! ```

pub mod assemble;
pub mod bark;
pub mod branch;
pub mod curves;
pub mod error;
pub mod export;
pub mod guides;
pub mod hierarchy;
pub mod math;
pub mod noise_field;
pub mod params;
pub mod seed;
pub mod spine;

pub use assemble::TreeMesh;
pub use branch::Branch;
pub use curves::{Curve, CurveKind};
pub use error::{Result, TreeGenError};
pub use export::write_obj;
pub use guides::{GuidePack, GuidePlacer, PlaceGuides};
pub use hierarchy::Hierarchy;
pub use params::{
    BendParams, BendProgress, BranchShapeParams, CurveParams, GuideStrategy, JiggleParams,
    MorphParams, OutputParams, SamplingParams, ScanOrder, TreeParams, TrunkParams,
};
pub use spine::Spine;

use tracing::info;

/// Grow a tree and assemble its mesh
///
/// Fails without partial output on invalid parameters or a malformed trunk
/// spine.
pub fn generate(params: &TreeParams) -> Result<TreeMesh> {
    params.validate()?;

    let mut tree = Hierarchy::build(params)?;
    tree.refine(params.output.interpolation_levels);
    let mesh = assemble::assemble(&tree, params);

    info!(
        "generated {} branches over {} levels: {} vertices, {} faces, {} edges",
        tree.branch_count(),
        tree.levels().len(),
        mesh.vertices.len(),
        mesh.faces.len(),
        mesh.edges.len()
    );
    Ok(mesh)
}
