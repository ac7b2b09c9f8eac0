//! Mesh and outline buffers handed to the embedding renderer.
//!
//! Positions are world space, normals all +Y (the shapes sit on a
//! horizontal surface), double-siding duplicates index triples in reverse
//! winding rather than duplicating vertices.

use glam::DVec3;

use crate::geometry::{self, BoxCorners};

/// Triangle mesh buffers: positions, flat index triples, one normal per
/// vertex.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<DVec3>,
    pub indices: Vec<u32>,
    pub normals: Vec<DVec3>,
}

impl Mesh {
    pub fn empty() -> Mesh {
        Mesh::default()
    }

    /// Single-sided fan over a boundary point loop (the disc mesh)
    pub fn fan(points: &[DVec3]) -> Mesh {
        let indices = geometry::fan_triangulate(points.len());
        Mesh {
            positions: points.to_vec(),
            normals: up_normals(points.len()),
            indices,
        }
    }

    /// Fan over a boundary loop, visible from both sides
    pub fn double_sided_fan(points: &[DVec3]) -> Mesh {
        let mut mesh = Mesh::fan(points);
        mesh.double_side();
        mesh
    }

    /// Double-sided cuboid over eight corners, bottom ring then top ring
    pub fn cuboid(corners: &BoxCorners) -> Mesh {
        let mut positions = Vec::with_capacity(8);
        positions.extend_from_slice(&corners.bottom);
        positions.extend_from_slice(&corners.top);

        let mut mesh = Mesh {
            normals: up_normals(positions.len()),
            positions,
            indices: Vec::with_capacity(72),
        };
        mesh.push_quad(0, 1, 2, 3); // bottom
        mesh.push_quad(4, 5, 6, 7); // top
        mesh.push_quad(0, 1, 5, 4);
        mesh.push_quad(1, 2, 6, 5);
        mesh.push_quad(2, 3, 7, 6);
        mesh.push_quad(3, 0, 4, 7);
        mesh.double_side();
        mesh
    }

    /// Append both triangles of the quad `a b c d`
    fn push_quad(&mut self, a: u32, b: u32, c: u32, d: u32) {
        self.indices.extend_from_slice(&[a, b, c, a, c, d]);
    }

    /// Append every current triangle again with reversed winding
    pub fn double_side(&mut self) {
        let one_side = self.indices.len();
        self.indices.reserve(one_side);
        for triple in 0..one_side / 3 {
            let base = triple * 3;
            self.indices.push(self.indices[base + 2]);
            self.indices.push(self.indices[base + 1]);
            self.indices.push(self.indices[base]);
        }
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }
}

fn up_normals(count: usize) -> Vec<DVec3> {
    vec![DVec3::Y; count]
}

/// An outline polyline with a render width
#[derive(Debug, Clone, PartialEq)]
pub struct EdgeLine {
    pub points: Vec<DVec3>,
    pub width: f64,
}

impl EdgeLine {
    pub fn new(points: Vec<DVec3>, width: f64) -> EdgeLine {
        EdgeLine { points, width }
    }

    /// Number of drawn segments
    pub fn segment_count(&self) -> usize {
        self.points.len().saturating_sub(1)
    }
}
