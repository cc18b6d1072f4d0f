//! Seam preservation around the simplification call
//!
//! UV-island boundary edges are marked as seams so the simplifier's
//! delimiter follows them, then the mesh's pre-existing seam set is restored
//! exactly. Deriving the island boundaries themselves is the caller's
//! (host-side) concern; this adapter only scopes the marking.

use decimesh_core::{EdgeKey, TriangleMesh};
use std::collections::HashSet;
use tracing::debug;

/// Scoped seam marking: remembers the mesh's seam set at apply time and puts
/// it back verbatim on restore.
#[derive(Debug)]
pub struct SeamScope {
    original: HashSet<EdgeKey>,
}

impl SeamScope {
    /// Mark `island_boundaries` as seams on top of whatever is already
    /// marked, remembering the pre-existing set.
    pub fn apply(mesh: &mut TriangleMesh, island_boundaries: &HashSet<EdgeKey>) -> Self {
        let original = mesh.seam_edges.clone();
        let mut marked = 0usize;
        for edge in island_boundaries {
            if mesh.seam_edges.insert(*edge) {
                marked += 1;
            }
        }
        debug!(marked, existing = original.len(), "applied island boundary seams");
        Self { original }
    }

    /// Restore exactly the seam set present before `apply`.
    pub fn restore(self, mesh: &mut TriangleMesh) {
        mesh.seam_edges = self.original;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    fn quad() -> TriangleMesh {
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
    fn apply_marks_on_top_of_existing_seams() {
        let mut mesh = quad();
        mesh.mark_seam(0, 1);

        let boundaries: HashSet<EdgeKey> =
            [EdgeKey::new(0, 2), EdgeKey::new(2, 3)].into_iter().collect();
        let scope = SeamScope::apply(&mut mesh, &boundaries);

        assert!(mesh.is_seam(0, 1));
        assert!(mesh.is_seam(0, 2));
        assert!(mesh.is_seam(2, 3));

        scope.restore(&mut mesh);
        assert!(mesh.is_seam(0, 1));
        assert!(!mesh.is_seam(0, 2));
        assert!(!mesh.is_seam(2, 3));
    }

    #[test]
    fn restore_is_exact_even_with_overlap() {
        let mut mesh = quad();
        mesh.mark_seam(0, 2);
        let before = mesh.seam_edges.clone();

        // Island boundary overlaps a pre-existing seam
        let boundaries: HashSet<EdgeKey> =
            [EdgeKey::new(0, 2), EdgeKey::new(1, 2)].into_iter().collect();
        let scope = SeamScope::apply(&mut mesh, &boundaries);
        scope.restore(&mut mesh);

        assert_eq!(mesh.seam_edges, before);
    }
}
