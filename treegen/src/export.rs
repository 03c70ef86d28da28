//! Wavefront OBJ output

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::assemble::TreeMesh;

/// Write `mesh` as a single OBJ object named `name`
///
/// Bark meshes are written as quad faces, skeletons as line elements.
pub fn write_obj(mesh: &TreeMesh, path: &Path, name: &str) -> io::Result<()> {
    let mut out = BufWriter::new(File::create(path)?);
    write_obj_to(mesh, &mut out, name)?;
    out.flush()
}

/// Write `mesh` in OBJ format to any writer
pub fn write_obj_to<W: Write>(mesh: &TreeMesh, out: &mut W, name: &str) -> io::Result<()> {
    writeln!(out, "# treegen: {} vertices", mesh.vertices.len())?;
    writeln!(out, "o {name}")?;
    for v in &mesh.vertices {
        writeln!(out, "v {} {} {}", v.x, v.y, v.z)?;
    }
    // OBJ indices are 1-based
    for [a, b, c, d] in &mesh.faces {
        writeln!(out, "f {} {} {} {}", a + 1, b + 1, c + 1, d + 1)?;
    }
    for [a, b] in &mesh.edges {
        writeln!(out, "l {} {}", a + 1, b + 1)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    #[test]
    fn test_quads_one_based() {
        let mesh = TreeMesh {
            vertices: vec![Vec3::ZERO, Vec3::X, Vec3::ONE, Vec3::Y],
            faces: vec![[0, 1, 2, 3]],
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_obj_to(&mesh, &mut buf, "tree").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("o tree\n"));
        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 4);
        assert!(text.contains("f 1 2 3 4\n"));
        assert!(!text.contains("\nl "));
    }

    #[test]
    fn test_skeleton_lines() {
        let mesh = TreeMesh {
            vertices: vec![Vec3::ZERO, Vec3::Z],
            edges: vec![[0, 1]],
            ..Default::default()
        };
        let mut buf = Vec::new();
        write_obj_to(&mesh, &mut buf, "skeleton").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("l 1 2\n"));
        assert!(!text.contains("\nf "));
    }
}
