//! Nearest-point-on-surface projection
//!
//! Iterative reduction snaps surviving vertices back onto a frozen reference
//! surface after every step. The projector finds the closest point on the
//! surface itself, not the closest vertex, which is what keeps accumulated
//! collapse drift in check.

use decimesh_core::{distance, NearestNeighborSearch, Point3f, Result, TriangleMesh};
use decimesh_spatial::SpatialIndex;

/// Closest point to `p` on the triangle `(a, b, c)`.
///
/// Region-based point-triangle test: classifies `p` against the triangle's
/// vertex, edge and interior Voronoi regions.
pub fn closest_point_on_triangle(p: &Point3f, a: &Point3f, b: &Point3f, c: &Point3f) -> Point3f {
    let ab = b - a;
    let ac = c - a;
    let ap = p - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return *a;
    }

    let bp = p - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return *b;
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return a + ab * v;
    }

    let cp = p - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return *c;
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return a + ac * w;
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return b + (c - b) * w;
    }

    let denom = va + vb + vc;
    if denom.abs() < f32::EPSILON {
        // Degenerate triangle: fall back to the nearest vertex
        let da = (p - a).norm_squared();
        let db = (p - b).norm_squared();
        let dc = (p - c).norm_squared();
        return if da <= db && da <= dc {
            *a
        } else if db <= dc {
            *b
        } else {
            *c
        };
    }
    let v = vb / denom;
    let w = vc / denom;
    a + ab * v + ac * w
}

/// Projects points onto a frozen reference mesh surface.
///
/// The face with the nearest centroid seeds an upper bound on the surface
/// distance; every face whose centroid lies within that bound plus the
/// largest centroid-to-vertex radius is then tested exactly, so no triangle
/// holding a closer point can be skipped. The reference mesh is read-only
/// for the projector's lifetime.
pub struct SurfaceProjector<'a> {
    mesh: &'a TriangleMesh,
    centroids: SpatialIndex,
    /// Largest distance from any face's centroid to one of its vertices.
    max_face_radius: f32,
}

impl<'a> SurfaceProjector<'a> {
    /// Build a projector over `mesh`. Fails with `EmptyIndex` if the mesh has
    /// no faces.
    pub fn new(mesh: &'a TriangleMesh) -> Result<Self> {
        let centroids = mesh.face_centroids();
        let mut max_face_radius = 0.0f32;
        for (fi, face) in mesh.faces.iter().enumerate() {
            for &vi in face {
                let r = distance(&centroids[fi], &mesh.vertices[vi]);
                max_face_radius = max_face_radius.max(r);
            }
        }
        let centroids = SpatialIndex::build(&centroids)?;
        Ok(Self {
            mesh,
            centroids,
            max_face_radius,
        })
    }

    fn closest_on_face(&self, fi: usize, p: &Point3f) -> Point3f {
        let [a, b, c] = self.mesh.faces[fi];
        closest_point_on_triangle(
            p,
            &self.mesh.vertices[a],
            &self.mesh.vertices[b],
            &self.mesh.vertices[c],
        )
    }

    /// Nearest point on the reference surface to `p`.
    pub fn project(&self, p: &Point3f) -> Point3f {
        let (seed, _) = self.centroids.query_nearest(p);
        let mut best_point = self.closest_on_face(seed, p);
        let mut best_dist = distance(&best_point, p);

        // A face holding a point closer than the bound must have its
        // centroid within the bound plus its own radius.
        let radius = best_dist + self.max_face_radius;
        for (fi, _) in self.centroids.within(p, radius) {
            if fi == seed {
                continue;
            }
            let q = self.closest_on_face(fi, p);
            let d = distance(&q, p);
            if d < best_dist {
                best_dist = d;
                best_point = q;
            }
        }
        best_point
    }
}
