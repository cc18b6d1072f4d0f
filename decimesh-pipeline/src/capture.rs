//! Source mesh snapshot
//!
//! Everything the later stages need from the pre-simplification mesh is
//! copied out up front. The capture is immutable for the rest of the run, so
//! correspondences and attribute resampling always see the same source state.

use decimesh_core::{FaceAttributes, Point3f, ShapeKey, Transform3D, TriangleMesh};
use tracing::warn;

/// Frozen snapshot of the source object taken before simplification.
#[derive(Debug, Clone)]
pub struct SourceCapture {
    pub points: Vec<Point3f>,
    pub face_centroids: Vec<Point3f>,
    pub face_attributes: Vec<FaceAttributes>,
    pub shape_keys: Vec<ShapeKey>,
    pub transform: Transform3D,
}

impl SourceCapture {
    /// Snapshot `mesh` together with its shape keys and world transform.
    ///
    /// Shape keys whose length disagrees with the vertex count are still
    /// captured; the mismatch is logged here and resampling later zero-fills
    /// the affected entries rather than failing the run.
    pub fn from_mesh(
        mesh: &TriangleMesh,
        shape_keys: &[ShapeKey],
        transform: Transform3D,
    ) -> Self {
        for key in shape_keys {
            if let Err(err) = key.check_cardinality(mesh.vertex_count()) {
                warn!(%err, "capturing shape key with mismatched vertex count");
            }
        }
        Self {
            points: mesh.vertices.clone(),
            face_centroids: mesh.face_centroids(),
            face_attributes: mesh.face_attributes.clone(),
            shape_keys: shape_keys.to_vec(),
            transform,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.points.len()
    }

    pub fn face_count(&self) -> usize {
        self.face_centroids.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decimesh_core::Vector3f;
    use nalgebra::Point3;

    #[test]
    fn capture_snapshots_all_source_state() {
        let mut mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        mesh.face_attributes[0].material_index = 3;

        let keys = vec![ShapeKey::new("Basis", vec![Vector3f::zeros(); 3]).with_value(0.5)];
        let capture = SourceCapture::from_mesh(&mesh, &keys, Transform3D::identity());

        assert_eq!(capture.vertex_count(), 3);
        assert_eq!(capture.face_count(), 1);
        assert_eq!(capture.face_attributes[0].material_index, 3);
        assert_eq!(capture.shape_keys[0].value, 0.5);
    }

    #[test]
    fn mismatched_shape_key_is_still_captured() {
        let mesh = TriangleMesh::from_vertices_and_faces(
            vec![
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.0, 0.0, 0.0),
                Point3::new(0.0, 1.0, 0.0),
            ],
            vec![[0, 1, 2]],
        );
        let keys = vec![ShapeKey::new("Stale", vec![Vector3f::zeros(); 7])];
        let capture = SourceCapture::from_mesh(&mesh, &keys, Transform3D::identity());
        assert_eq!(capture.shape_keys.len(), 1);
        assert_eq!(capture.shape_keys[0].len(), 7);
    }
}
