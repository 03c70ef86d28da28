//! Merging branch geometry into one mesh

use std::ops::Range;

use glam::Vec3;

use crate::bark::Bark;
use crate::hierarchy::Hierarchy;
use crate::params::TreeParams;

/// Output of a generation run
///
/// Exactly one of `edges` (skeleton output) and `faces` (bark output) is
/// populated.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TreeMesh {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<[u32; 2]>,
    pub faces: Vec<[u32; 4]>,
    /// Vertex range of the deepest level's branches
    pub selection: Range<usize>,
}

impl TreeMesh {
    /// Append a bark mesh, offsetting its face indices
    pub fn push_bark(&mut self, bark: &Bark) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&bark.vertices);
        self.faces
            .extend(bark.faces.iter().map(|face| face.map(|i| i + offset)));
    }

    /// Append a spine as a chain of edges
    pub fn push_polyline(&mut self, points: &[Vec3]) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(points);
        self.edges.extend(
            (0..points.len().saturating_sub(1) as u32).map(|i| [offset + i, offset + i + 1]),
        );
    }

    /// Set the height of the first `count` vertices to zero
    pub fn flatten_base(&mut self, count: usize) {
        for v in self.vertices.iter_mut().take(count) {
            v.z = 0.0;
        }
    }

    /// Scale every vertex about the origin
    pub fn scale(&mut self, factor: f32) {
        for v in &mut self.vertices {
            *v *= factor;
        }
    }

    pub fn is_skeleton(&self) -> bool {
        self.faces.is_empty() && !self.edges.is_empty()
    }
}

/// Collect the hierarchy into one mesh, trunk first, level by level
pub fn assemble(tree: &Hierarchy, params: &TreeParams) -> TreeMesh {
    let mut mesh = TreeMesh::default();
    let deepest = tree.levels().len().saturating_sub(1);
    let mut ground_count = 0;

    for (depth, level) in tree.levels().iter().enumerate() {
        let level_start = mesh.vertices.len();
        for branch in level {
            let points = branch.spine().points();
            if params.output.faces {
                let bark = Bark::build(points, branch.morph(), &params.curves.taper);
                if branch.is_trunk() {
                    ground_count = bark.sides;
                }
                mesh.push_bark(&bark);
            } else {
                if branch.is_trunk() {
                    ground_count = 1;
                }
                mesh.push_polyline(points);
            }
        }
        if params.output.faces && depth == deepest {
            mesh.selection = level_start..mesh.vertices.len();
        }
    }

    mesh.flatten_base(ground_count);
    mesh.scale(params.morph.scale);
    mesh
}
