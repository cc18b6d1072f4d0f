//! End-to-end decimation run
//!
//! One blocking sequence per invocation: capture the source, simplify, build
//! the correspondences, resample attributes, reassemble. Any failure before
//! reassembly aborts the run with no partial object; attribute-level
//! mismatches degrade locally instead.

use crate::capture::SourceCapture;
use crate::correspondence::{FaceCorrespondence, VertexCorrespondence};
use crate::driver::{DriverConfig, SimplificationDriver, DEFAULT_STEP_FRACTION};
use crate::resample::{rederive_face_attributes, resample_vertex_attribute};
use crate::seam::SeamScope;
use decimesh_core::{EdgeKey, Result, ShapeKey, Transform3D, TriangleMesh};
use decimesh_simplification::MeshSimplifier;
use decimesh_spatial::SpatialIndex;
use std::collections::HashSet;
use std::time::Instant;
use tracing::info;

/// Configuration surface for a decimation run.
#[derive(Debug, Clone)]
pub struct DecimateConfig {
    /// Fraction of faces to retain, in [0, 1].
    pub target_ratio: f32,
    /// Reduce in small steps with surface reprojection instead of one jump.
    pub iterative: bool,
    /// Iterative per-step removal budget, as a fraction of the original face
    /// count.
    pub step_fraction: f32,
    /// Hard cap on iterative steps; a default proportional to
    /// `1 / step_fraction` applies when unset.
    pub max_steps: Option<usize>,
    /// Keep the simplifier from collapsing across seam edges.
    pub seam_delimited: bool,
}

impl Default for DecimateConfig {
    fn default() -> Self {
        Self {
            target_ratio: 0.5,
            iterative: false,
            step_fraction: DEFAULT_STEP_FRACTION,
            max_steps: None,
            seam_delimited: true,
        }
    }
}

impl DecimateConfig {
    fn driver_config(&self) -> DriverConfig {
        DriverConfig {
            target_ratio: self.target_ratio,
            iterative: self.iterative,
            step_fraction: self.step_fraction,
            max_steps: self.max_steps,
            seam_delimited: self.seam_delimited,
        }
    }
}

/// The reassembled result of a successful run: one reduced mesh with its
/// rebuilt shape keys and the source object's world transform.
#[derive(Debug, Clone)]
pub struct DecimatedObject {
    pub mesh: TriangleMesh,
    pub shape_keys: Vec<ShapeKey>,
    pub transform: Transform3D,
}

/// Decimate `mesh` while preserving per-vertex and per-face attribute data.
///
/// `island_boundaries` are UV-island boundary edges derived by the caller;
/// they are marked as seams on a disposable working copy so the simplifier's
/// delimiter follows them without touching the caller's mesh. The output
/// object is aligned to the source `transform`.
pub fn decimate_preserving(
    mesh: &TriangleMesh,
    shape_keys: &[ShapeKey],
    island_boundaries: &HashSet<EdgeKey>,
    transform: &Transform3D,
    simplifier: &dyn MeshSimplifier,
    config: &DecimateConfig,
) -> Result<DecimatedObject> {
    let started = Instant::now();

    // Capture the source snapshot; the index doubles as the empty-input guard
    let capture = SourceCapture::from_mesh(mesh, shape_keys, *transform);
    let source_index = SpatialIndex::build(&capture.points)?;

    // Simplify a working copy with island boundaries marked as seams
    let mut work = mesh.clone();
    SeamScope::apply(&mut work, island_boundaries);
    let driver = SimplificationDriver::new(simplifier, config.driver_config());
    let mut reduced = driver.run(&work)?;

    // Map every reduced vertex and face back to its nearest source element
    let vertex_map = VertexCorrespondence::from_index(&source_index, &reduced.vertices);
    let face_map = if reduced.face_count() > 0 && capture.face_count() > 0 {
        Some(FaceCorrespondence::build(
            &capture.face_centroids,
            &reduced.face_centroids(),
            &capture.transform,
            &capture.transform,
        )?)
    } else {
        None
    };

    // Rebuild shape keys through the vertex mapping, restoring their values
    let shape_keys: Vec<ShapeKey> = capture
        .shape_keys
        .iter()
        .map(|key| {
            let data = resample_vertex_attribute(&key.data, &vertex_map);
            ShapeKey::new(key.name.clone(), data).with_value(key.value)
        })
        .collect();

    // Re-derive per-face attributes from the nearest source face
    if let Some(face_map) = &face_map {
        reduced.set_face_attributes(rederive_face_attributes(
            &capture.face_attributes,
            face_map,
        ));
    }

    info!(
        source_vertices = capture.vertex_count(),
        target_vertices = reduced.vertex_count(),
        source_faces = capture.face_count(),
        target_faces = reduced.face_count(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "decimation run complete"
    );

    Ok(DecimatedObject {
        mesh: reduced,
        shape_keys,
        transform: capture.transform,
    })
}
