//! Triangle mesh with per-face attributes and seam topology

use crate::point::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// An undirected edge between two vertices, stored with the smaller index
/// first so that `(a, b)` and `(b, a)` compare equal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeKey(pub usize, pub usize);

impl EdgeKey {
    pub fn new(a: usize, b: usize) -> Self {
        if a <= b {
            Self(a, b)
        } else {
            Self(b, a)
        }
    }

    /// True if both endpoints are the same vertex.
    pub fn is_degenerate(&self) -> bool {
        self.0 == self.1
    }
}

/// Per-face surface attributes carried through decimation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FaceAttributes {
    pub material_index: u32,
    pub smooth: bool,
}

impl Default for FaceAttributes {
    fn default() -> Self {
        Self {
            material_index: 0,
            smooth: false,
        }
    }
}

/// A triangle mesh with vertices, faces, per-face attributes and a set of
/// seam edges (UV-island boundaries used as decimation delimiters).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    /// One entry per face; kept in lockstep with `faces`.
    pub face_attributes: Vec<FaceAttributes>,
    pub seam_edges: HashSet<EdgeKey>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            face_attributes: Vec::new(),
            seam_edges: HashSet::new(),
        }
    }

    /// Create a mesh from vertices and faces with default face attributes
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        let face_attributes = vec![FaceAttributes::default(); faces.len()];
        Self {
            vertices,
            faces,
            face_attributes,
            seam_edges: HashSet::new(),
        }
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Replace the per-face attributes. Ignored if the length does not match
    /// the face count.
    pub fn set_face_attributes(&mut self, attributes: Vec<FaceAttributes>) {
        if attributes.len() == self.faces.len() {
            self.face_attributes = attributes;
        }
    }

    /// Mark an edge as a seam.
    pub fn mark_seam(&mut self, a: usize, b: usize) {
        self.seam_edges.insert(EdgeKey::new(a, b));
    }

    /// True if the edge between `a` and `b` is marked as a seam.
    pub fn is_seam(&self, a: usize, b: usize) -> bool {
        self.seam_edges.contains(&EdgeKey::new(a, b))
    }

    /// Centroid of a single face.
    pub fn face_centroid(&self, face_index: usize) -> Point3f {
        let [a, b, c] = self.faces[face_index];
        let sum = self.vertices[a].coords + self.vertices[b].coords + self.vertices[c].coords;
        Point3f::from(sum / 3.0)
    }

    /// Centroids of every face, in face order.
    pub fn face_centroids(&self) -> Vec<Point3f> {
        (0..self.faces.len()).map(|i| self.face_centroid(i)).collect()
    }

    /// All undirected edges of the mesh, deduplicated.
    pub fn edges(&self) -> HashSet<EdgeKey> {
        let mut edges = HashSet::with_capacity(self.faces.len() * 3 / 2);
        for face in &self.faces {
            edges.insert(EdgeKey::new(face[0], face[1]));
            edges.insert(EdgeKey::new(face[1], face[2]));
            edges.insert(EdgeKey::new(face[2], face[0]));
        }
        edges
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn two_triangles() -> TriangleMesh {
        TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(1.0, 1.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        )
    }

    #[test]
    fn edge_key_is_order_independent() {
        assert_eq!(EdgeKey::new(3, 1), EdgeKey::new(1, 3));
        assert!(EdgeKey::new(2, 2).is_degenerate());
    }

    #[test]
    fn face_attributes_track_faces() {
        let mesh = two_triangles();
        assert_eq!(mesh.face_attributes.len(), mesh.face_count());

        let mut mesh = mesh;
        mesh.set_face_attributes(vec![FaceAttributes {
            material_index: 2,
            smooth: true,
        }]);
        // Wrong length is ignored
        assert_eq!(mesh.face_attributes.len(), 2);
    }

    #[test]
    fn centroid_is_vertex_average() {
        let mesh = two_triangles();
        let c = mesh.face_centroid(0);
        assert!((c.x - 2.0 / 3.0).abs() < 1e-6);
        assert!((c.y - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(c.z, 0.0);
        assert_eq!(mesh.face_centroids().len(), 2);
    }

    #[test]
    fn seams_are_undirected() {
        let mut mesh = two_triangles();
        mesh.mark_seam(2, 0);
        assert!(mesh.is_seam(0, 2));
        assert!(!mesh.is_seam(0, 1));
    }

    #[test]
    fn edges_are_deduplicated() {
        let mesh = two_triangles();
        // 6 directed half-edges, shared diagonal counted once
        assert_eq!(mesh.edges().len(), 5);
    }
}
