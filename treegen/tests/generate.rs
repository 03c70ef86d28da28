//! Integration tests for treegen
//!
//! Runs full generations and checks the properties every output must have.

use glam::Vec3;
use tempfile::tempdir;
use treegen::bark::Bark;
use treegen::seed::child_lineage;
use treegen::spine::{Jiggle, SpineModifier};
use treegen::{
    Branch, CurveKind, GuideStrategy, Hierarchy, Spine, TreeGenError, TreeParams, generate,
    write_obj,
};

fn trunk_only() -> TreeParams {
    let mut params = TreeParams::default();
    params.morph.length = 10.0;
    params.morph.segment_length = 1.0;
    params.shape.max_depth = 0;
    params
}

#[test]
fn test_generate_is_reproducible() {
    let params = TreeParams::default().with_seed(1234);
    let a = generate(&params).expect("generation failed");
    let b = generate(&params).expect("generation failed");
    assert_eq!(a, b);

    let c = generate(&TreeParams::default().with_seed(1235)).expect("generation failed");
    assert_ne!(a.vertices, c.vertices);
}

#[test]
fn test_trunk_only_scenario() {
    let params = trunk_only();
    let tree = Hierarchy::build(&params).unwrap();
    assert_eq!(tree.trunk().spine().len(), 11);
    assert_eq!(tree.trunk().spine().points()[0], Vec3::ZERO);

    let mesh = generate(&params).unwrap();
    assert_eq!(mesh.vertices.len(), params.morph.sides as usize * 11);
    assert_eq!(mesh.faces.len(), params.morph.sides as usize * 10);
    assert!(mesh.edges.is_empty());
}

#[test]
fn test_skeleton_has_edges_only() {
    let mut params = trunk_only();
    params.output.faces = false;
    let mesh = generate(&params).unwrap();
    assert_eq!(mesh.vertices.len(), 11);
    assert_eq!(mesh.edges.len(), 10);
    assert!(mesh.faces.is_empty());
    assert!(mesh.selection.is_empty());
}

#[test]
fn test_depth_two_branch_counts() {
    let mut params = TreeParams::default().with_seed(77);
    params.shape.max_depth = 2;
    params.shape.branch_counts = vec![3, 2];
    params.sampling.strategy = GuideStrategy::Poisson;

    let tree = Hierarchy::build(&params).unwrap();
    let levels = tree.levels();
    assert_eq!(levels[0].len(), 1);
    assert_eq!(levels[1].len(), 3);
    assert!(levels.get(2).map_or(0, Vec::len) <= 6);

    // the scored sampler may accept fewer than requested, never more
    params.sampling.strategy = GuideStrategy::Scored;
    let tree = Hierarchy::build(&params).unwrap();
    assert!(tree.levels().get(1).map_or(0, Vec::len) <= 3);
    assert!(tree.levels().get(2).map_or(0, Vec::len) <= 6);
}

#[test]
fn test_taper_bounds_every_branch() {
    let params = TreeParams::default().with_seed(5);
    let tree = Hierarchy::build(&params).unwrap();
    for branch in tree.branches() {
        let morph = branch.morph();
        let points = branch.spine().points();
        let bark = Bark::build(points, morph, &params.curves.taper);
        for (i, center) in points.iter().enumerate() {
            let ring = &bark.vertices[i * bark.sides..(i + 1) * bark.sides];
            for v in ring {
                let r = v.distance(*center);
                assert!(r >= morph.tip_radius * 0.999 && r <= morph.base_radius * 1.001);
            }
        }
    }
}

#[test]
fn test_face_indices_valid() {
    let mut params = TreeParams::default().with_seed(9);
    params.output.interpolation_levels = 1;
    let tree = Hierarchy::build(&params).unwrap();
    let mesh = generate(&params).unwrap();

    let n = mesh.vertices.len() as u32;
    assert!(mesh.faces.iter().flatten().all(|&i| i < n));

    // one closed strip per branch: sides * (points - 1) quads after refinement
    let mut refined = tree.clone();
    refined.refine(1);
    let expected: usize = refined
        .branches()
        .map(|b| b.morph().sides as usize * (b.spine().len() - 1))
        .sum();
    assert_eq!(mesh.faces.len(), expected);
}

#[test]
fn test_selection_covers_deepest_level() {
    let mut params = TreeParams::default().with_seed(2);
    params.shape.max_depth = 1;
    params.shape.branch_counts = vec![4];
    params.sampling.strategy = GuideStrategy::Poisson;
    let tree = Hierarchy::build(&params).unwrap();
    let mesh = generate(&params).unwrap();

    let trunk_vertices = tree.trunk().spine().len() * params.morph.sides as usize;
    assert_eq!(mesh.selection, trunk_vertices..mesh.vertices.len());
}

#[test]
fn test_ground_flattening() {
    let mut params = TreeParams::default();
    params.shape.max_depth = 1;
    params.trunk.spine = Some((0..25).map(|i| [0.3, -0.2, 2.5 + i as f32 * 0.4]).collect());
    let mesh = generate(&params).unwrap();

    let sides = params.morph.sides as usize;
    for v in &mesh.vertices[..sides] {
        assert_eq!(v.z, 0.0);
    }
    assert!(mesh.vertices[sides..].iter().any(|v| v.z > 0.0));

    params.output.faces = false;
    let skeleton = generate(&params).unwrap();
    assert_eq!(skeleton.vertices[0].z, 0.0);
}

#[test]
fn test_scale_applies_uniformly() {
    let params = trunk_only();
    let mut scaled = params.clone();
    scaled.morph.scale = 2.0;
    let a = generate(&params).unwrap();
    let b = generate(&scaled).unwrap();
    for (u, v) in a.vertices.iter().zip(&b.vertices) {
        assert!((*u * 2.0 - *v).length() < 1e-4);
    }
}

#[test]
fn test_no_children_at_tip_radius() {
    let mut params = TreeParams::default();
    params.morph.tip_radius = params.morph.base_radius;
    let tree = Hierarchy::build(&params).unwrap();
    assert_eq!(tree.branch_count(), 1);
}

#[test]
fn test_zero_jiggle_is_identity() {
    let mut spine = Spine::grow_straight(Vec3::ZERO, Vec3::new(0.2, 0.1, 1.0), 5.0, 0.5).unwrap();
    let before = spine.clone();
    Jiggle::new(0.0, 1.0, 0.5, 5.0, 99).apply(&mut spine);
    assert_eq!(spine, before);
}

#[test]
fn test_branch_independent_of_siblings() {
    let mut params = TreeParams::default().with_seed(31);
    params.shape.max_depth = 1;
    params.shape.branch_counts = vec![5];
    params.sampling.strategy = GuideStrategy::Poisson;
    let tree = Hierarchy::build(&params).unwrap();
    let trunk = tree.trunk();

    // regrow the last sibling on its own
    let index = trunk.guidepacks().len() - 1;
    let mut alone = Branch::new(
        trunk.guidepacks()[index],
        trunk.child_morph(),
        false,
        child_lineage(trunk.lineage(), index),
    )
    .unwrap();
    alone.generate(&params);
    assert_eq!(alone.spine(), tree.levels()[1][index].spine());
}

#[test]
fn test_invalid_params_fail_whole_call() {
    let mut params = TreeParams::default();
    params.morph.segment_length = -1.0;
    assert!(matches!(
        generate(&params),
        Err(TreeGenError::InvalidMorphParams(_))
    ));

    let mut params = TreeParams::default();
    params.trunk.spine = Some(vec![[1.0, 1.0, 1.0]; 5]);
    assert!(matches!(
        generate(&params),
        Err(TreeGenError::DegenerateGeometry(_))
    ));
}

#[test]
fn test_custom_curves() {
    let mut params = trunk_only();
    params.curves.taper = CurveKind::Samples {
        points: vec![[0.0, 1.0], [0.5, 0.5], [1.0, 0.0]],
    };
    let mesh = generate(&params).unwrap();
    assert_eq!(mesh.vertices.len(), params.morph.sides as usize * 11);
}

#[test]
fn test_obj_export() {
    let dir = tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("tree.obj");
    let mut params = TreeParams::default().with_seed(4);
    params.shape.max_depth = 1;
    let mesh = generate(&params).unwrap();

    write_obj(&mesh, &path, "tree").expect("Failed to write OBJ");
    let text = std::fs::read_to_string(&path).expect("Failed to read OBJ");
    assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), mesh.vertices.len());
    assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), mesh.faces.len());
}
