//! Attribute resampling through correspondences
//!
//! Per-vertex data is pulled through the vertex correspondence one source
//! vertex per target vertex; per-face data is copied wholesale from the
//! mapped source face. Nothing is ever blended.

use crate::correspondence::{FaceCorrespondence, VertexCorrespondence};
use decimesh_core::{FaceAttributes, Vector3f};
use tracing::warn;

/// Resample a per-vertex vector attribute onto the target vertex set.
///
/// Output has one entry per target vertex, zero-initialized. A mapped source
/// index outside `source_attribute` (a shape key captured with a different
/// vertex count than the correspondence's source mesh) leaves the zero
/// vector in place and is reported as a warning, never an abort: losing one
/// stale layer should not block the rest of the run.
pub fn resample_vertex_attribute(
    source_attribute: &[Vector3f],
    mapping: &VertexCorrespondence,
) -> Vec<Vector3f> {
    let mut out = vec![Vector3f::zeros(); mapping.len()];
    let mut skipped = 0usize;
    for (t, s) in mapping.iter().enumerate() {
        if let Some(value) = source_attribute.get(s) {
            out[t] = *value;
        } else {
            skipped += 1;
        }
    }
    if skipped > 0 {
        warn!(
            skipped,
            attribute_len = source_attribute.len(),
            "vertex attribute shorter than mapped source range; zero-filled"
        );
    }
    out
}

/// Re-derive per-face attributes on the target from the face correspondence.
///
/// Each target face receives its mapped source face's `{material_index,
/// smooth}` pair as one atomic copy.
pub fn rederive_face_attributes(
    source_attributes: &[FaceAttributes],
    mapping: &FaceCorrespondence,
) -> Vec<FaceAttributes> {
    mapping
        .iter()
        .map(|s| source_attributes.get(s).copied().unwrap_or_default())
        .collect()
}
