//! Mesh simplification for decimesh
//!
//! This crate provides the simplification operator boundary the decimation
//! pipeline drives, together with a seam-aware quadric edge-collapse
//! implementation of it and the nearest-point-on-surface projection used to
//! counteract drift in iterative reduction.

pub mod collapse;
pub mod projection;

pub use collapse::*;
pub use projection::*;

use decimesh_core::{Result, TriangleMesh};

/// Polygon-count reduction operator.
///
/// Implementations reduce a mesh toward a face budget and are free to choose
/// how. The pipeline treats them as a black box: the call either returns a
/// reduced mesh or fails, and is never retried.
pub trait MeshSimplifier {
    /// Reduce `mesh` so that roughly `target_ratio` of its faces remain.
    ///
    /// `target_ratio` is the retained fraction: 1.0 is an exact no-op, 0.0
    /// asks for maximal reduction (an empty result is valid, not an error).
    /// When `seam_delimited` is true the operator must not collapse across
    /// any edge in the mesh's seam set.
    fn simplify(
        &self,
        mesh: &TriangleMesh,
        target_ratio: f32,
        seam_delimited: bool,
    ) -> Result<TriangleMesh>;
}
