//! Level-by-level growth of the branch hierarchy

use glam::Vec3;
use tracing::debug;

use crate::branch::Branch;
use crate::error::Result;
use crate::params::TreeParams;
use crate::seed::{ROOT_LINEAGE, child_lineage};

/// All branches of a tree, grouped by depth
///
/// `levels[0]` holds the trunk alone; `levels[d + 1]` holds the children of
/// every branch in `levels[d]`, parent by parent in order.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    levels: Vec<Vec<Branch>>,
}

impl Hierarchy {
    /// Grow the trunk and then `shape.max_depth` levels of children
    pub fn build(params: &TreeParams) -> Result<Self> {
        params.validate()?;

        let mut trunk = match &params.trunk.spine {
            Some(points) => {
                let points: Vec<Vec3> = points.iter().copied().map(Vec3::from_array).collect();
                Branch::from_spine(points, &params.morph, ROOT_LINEAGE)?
            }
            None => Branch::straight_trunk(&params.morph, ROOT_LINEAGE)?,
        };
        trunk.regenerate(params);
        debug!("trunk: {} spine points", trunk.spine().len());

        let mut levels = vec![vec![trunk]];
        for depth in 0..params.shape.max_depth as usize {
            let count = params.shape.count_for_level(depth);
            let Some(parents) = levels.last_mut() else {
                break;
            };

            let mut children = Vec::new();
            for parent in parents.iter_mut() {
                parent.guides_gen(count, params)?;
                for (index, pack) in parent.guidepacks().iter().enumerate() {
                    let lineage = child_lineage(parent.lineage(), index);
                    let mut child = Branch::new(*pack, parent.child_morph(), false, lineage)?;
                    child.generate(params);
                    children.push(child);
                }
            }

            debug!(
                "level {}: {} branches from {} parents ({} requested each)",
                depth + 1,
                children.len(),
                parents.len(),
                count
            );
            if children.is_empty() {
                break;
            }
            levels.push(children);
        }

        Ok(Self { levels })
    }

    /// Interpolate every spine `levels` times
    pub fn refine(&mut self, levels: u32) {
        if levels == 0 {
            return;
        }
        for branch in self.levels.iter_mut().flatten() {
            branch.interpolate(levels);
        }
    }

    pub fn levels(&self) -> &[Vec<Branch>] {
        &self.levels
    }

    pub fn trunk(&self) -> &Branch {
        &self.levels[0][0]
    }

    /// Number of branches including the trunk
    pub fn branch_count(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    /// Every branch, trunk first, level by level
    pub fn branches(&self) -> impl Iterator<Item = &Branch> {
        self.levels.iter().flatten()
    }
}
