//! Simplification driver
//!
//! Wraps a [`MeshSimplifier`] in the two reduction strategies the pipeline
//! exposes: a single direct call, or a bounded sequence of small steps with
//! reprojection onto a frozen copy of the starting surface. Iterative mode
//! trades time for geometric fidelity on aggressive ratios, where one big
//! jump lets collapses drift far from the original shape.

use decimesh_core::{Error, Result, TriangleMesh};
use decimesh_simplification::{MeshSimplifier, SurfaceProjector};
use tracing::{debug, warn};

/// Fraction of the original face count removed per iterative step.
pub const DEFAULT_STEP_FRACTION: f32 = 0.01;

/// Driver configuration.
#[derive(Debug, Clone)]
pub struct DriverConfig {
    /// Fraction of faces to retain, in [0, 1].
    pub target_ratio: f32,
    /// Iterative stepping with surface reprojection instead of one call.
    pub iterative: bool,
    /// Per-step removal budget as a fraction of the original face count.
    pub step_fraction: f32,
    /// Hard cap on iterative steps. Defaults to a bound proportional to
    /// `1 / step_fraction` when unset.
    pub max_steps: Option<usize>,
    /// Forward the seam-delimiter constraint to the simplifier.
    pub seam_delimited: bool,
}

impl Default for DriverConfig {
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

impl DriverConfig {
    fn validate(&self) -> Result<()> {
        if !self.target_ratio.is_finite() || !(0.0..=1.0).contains(&self.target_ratio) {
            return Err(Error::InvalidInput(format!(
                "target ratio {} outside [0, 1]",
                self.target_ratio
            )));
        }
        if !self.step_fraction.is_finite() || !(0.0..1.0).contains(&self.step_fraction)
            || self.step_fraction == 0.0
        {
            return Err(Error::InvalidInput(format!(
                "step fraction {} outside (0, 1)",
                self.step_fraction
            )));
        }
        Ok(())
    }

    fn step_bound(&self) -> usize {
        self.max_steps
            .unwrap_or_else(|| (1.0 / self.step_fraction).ceil() as usize + 10)
    }
}

/// Drives an external simplification operator to a target face budget.
pub struct SimplificationDriver<'a, S: MeshSimplifier + ?Sized> {
    simplifier: &'a S,
    config: DriverConfig,
}

impl<'a, S: MeshSimplifier + ?Sized> SimplificationDriver<'a, S> {
    pub fn new(simplifier: &'a S, config: DriverConfig) -> Self {
        Self { simplifier, config }
    }

    /// Reduce `mesh` per the configured mode. Operator failures surface
    /// immediately and are never retried; an iterative stall terminates with
    /// the best achievable result instead of spinning.
    pub fn run(&self, mesh: &TriangleMesh) -> Result<TriangleMesh> {
        self.config.validate()?;
        if self.config.iterative {
            self.run_iterative(mesh)
        } else {
            self.simplifier
                .simplify(mesh, self.config.target_ratio, self.config.seam_delimited)
        }
    }

    fn run_iterative(&self, mesh: &TriangleMesh) -> Result<TriangleMesh> {
        let initial_faces = mesh.face_count();
        if initial_faces == 0 {
            return Ok(mesh.clone());
        }

        let target_faces = (initial_faces as f32 * self.config.target_ratio).round() as usize;
        if target_faces >= initial_faces {
            return Ok(mesh.clone());
        }

        // Removal budget is fixed against the original count, not the
        // shrinking one
        let step_budget = ((initial_faces as f32 * self.config.step_fraction).ceil() as usize).max(1);

        // Frozen reference for reprojection; dropped when the loop exits
        let reference = mesh.clone();
        let projector = SurfaceProjector::new(&reference)?;

        let mut current = mesh.clone();
        let step_bound = self.config.step_bound();

        for step in 0..step_bound {
            let faces = current.face_count();
            if faces <= target_faces {
                break;
            }

            let removal = step_budget.min(faces - target_faces);
            let local_ratio = (removal as f32 / faces as f32).clamp(0.0, 1.0);
            if local_ratio <= 0.0 {
                warn!(faces, target_faces, "iterative step computed zero ratio; stopping");
                break;
            }

            let retained = (1.0 - local_ratio).clamp(0.0, 1.0);
            let reduced =
                self.simplifier
                    .simplify(&current, retained, self.config.seam_delimited)?;

            if reduced.face_count() >= faces {
                warn!(
                    faces,
                    target_faces,
                    "simplifier could not reduce further; returning best effort"
                );
                break;
            }
            debug!(step, faces = reduced.face_count(), "iterative reduction step");

            current = reduced;
            for vertex in &mut current.vertices {
                *vertex = projector.project(vertex);
            }
        }

        if current.face_count() > target_faces {
            warn!(
                faces = current.face_count(),
                target_faces, "iterative reduction stopped above target"
            );
        }
        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use decimesh_simplification::QuadricCollapseSimplifier;
    use nalgebra::Point3;
    use std::sync::Mutex;

    fn make_grid(size: usize) -> TriangleMesh {
        let mut vertices = Vec::new();
        for y in 0..size {
            for x in 0..size {
                vertices.push(Point3::new(x as f32, y as f32, 0.0));
            }
        }
        let mut faces = Vec::new();
        for y in 0..(size - 1) {
            for x in 0..(size - 1) {
                let tl = y * size + x;
                let tr = tl + 1;
                let bl = (y + 1) * size + x;
                let br = bl + 1;
                faces.push([tl, bl, tr]);
                faces.push([tr, bl, br]);
            }
        }
        TriangleMesh::from_vertices_and_faces(vertices, faces)
    }

    /// Records the face count of every mesh it is asked to simplify.
    struct RecordingSimplifier {
        inner: QuadricCollapseSimplifier,
        calls: Mutex<Vec<usize>>,
    }

    impl RecordingSimplifier {
        fn new() -> Self {
            Self {
                inner: QuadricCollapseSimplifier::new(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    impl MeshSimplifier for RecordingSimplifier {
        fn simplify(
            &self,
            mesh: &TriangleMesh,
            target_ratio: f32,
            seam_delimited: bool,
        ) -> Result<TriangleMesh> {
            self.calls.lock().unwrap().push(mesh.face_count());
            self.inner.simplify(mesh, target_ratio, seam_delimited)
        }
    }

    /// Never reduces anything.
    struct StubbornSimplifier;

    impl MeshSimplifier for StubbornSimplifier {
        fn simplify(
            &self,
            mesh: &TriangleMesh,
            _target_ratio: f32,
            _seam_delimited: bool,
        ) -> Result<TriangleMesh> {
            Ok(mesh.clone())
        }
    }

    /// Always fails.
    struct FailingSimplifier;

    impl MeshSimplifier for FailingSimplifier {
        fn simplify(
            &self,
            _mesh: &TriangleMesh,
            _target_ratio: f32,
            _seam_delimited: bool,
        ) -> Result<TriangleMesh> {
            Err(Error::Simplification("unsupported topology".into()))
        }
    }

    #[test]
    fn direct_mode_ratio_one_is_identity() {
        let mesh = make_grid(5);
        let simplifier = QuadricCollapseSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 1.0,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        assert_eq!(out.face_count(), mesh.face_count());
        assert_eq!(out.vertex_count(), mesh.vertex_count());
    }

    #[test]
    fn direct_mode_hits_target() {
        let mesh = make_grid(8);
        let simplifier = QuadricCollapseSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 0.5,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        let target = (mesh.face_count() as f32 * 0.5).round() as usize;
        assert!(out.face_count() <= target);
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mesh = make_grid(3);
        let simplifier = QuadricCollapseSimplifier::new();
        for config in [
            DriverConfig {
                target_ratio: 1.5,
                ..DriverConfig::default()
            },
            DriverConfig {
                target_ratio: -0.5,
                ..DriverConfig::default()
            },
            DriverConfig {
                step_fraction: 0.0,
                iterative: true,
                ..DriverConfig::default()
            },
        ] {
            let driver = SimplificationDriver::new(&simplifier, config);
            assert!(driver.run(&mesh).is_err());
        }
    }

    #[test]
    fn iterative_steps_are_monotonic() {
        let mesh = make_grid(12);
        let simplifier = RecordingSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 0.3,
                iterative: true,
                step_fraction: 0.05,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        let target = (mesh.face_count() as f32 * 0.3).round() as usize;
        assert!(out.face_count() <= target);

        let calls = simplifier.calls.lock().unwrap();
        assert!(calls.len() > 1, "expected multiple incremental steps");
        for pair in calls.windows(2) {
            assert!(pair[1] < pair[0], "face counts must strictly decrease");
        }
    }

    #[test]
    fn iterative_step_count_is_bounded() {
        let mesh = make_grid(10);
        let simplifier = RecordingSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 0.2,
                iterative: true,
                step_fraction: 0.02,
                ..DriverConfig::default()
            },
        );
        driver.run(&mesh).unwrap();
        let calls = simplifier.calls.lock().unwrap();
        assert!(calls.len() <= (1.0f32 / 0.02).ceil() as usize + 10);
    }

    #[test]
    fn iterative_stall_returns_best_effort() {
        let mesh = make_grid(4);
        let driver = SimplificationDriver::new(
            &StubbornSimplifier,
            DriverConfig {
                target_ratio: 0.5,
                iterative: true,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        // Stalled immediately: unchanged mesh, no error
        assert_eq!(out.face_count(), mesh.face_count());
    }

    #[test]
    fn operator_failure_is_surfaced() {
        let mesh = make_grid(4);
        for iterative in [false, true] {
            let driver = SimplificationDriver::new(
                &FailingSimplifier,
                DriverConfig {
                    target_ratio: 0.5,
                    iterative,
                    ..DriverConfig::default()
                },
            );
            assert!(matches!(
                driver.run(&mesh),
                Err(Error::Simplification(_))
            ));
        }
    }

    #[test]
    fn iterative_empty_mesh_is_a_no_op() {
        let mesh = TriangleMesh::new();
        let simplifier = QuadricCollapseSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 0.5,
                iterative: true,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        assert_eq!(out.face_count(), 0);
    }

    #[test]
    fn iterative_vertices_stay_on_reference_plane() {
        let mesh = make_grid(8);
        let simplifier = QuadricCollapseSimplifier::new();
        let driver = SimplificationDriver::new(
            &simplifier,
            DriverConfig {
                target_ratio: 0.4,
                iterative: true,
                step_fraction: 0.05,
                ..DriverConfig::default()
            },
        );
        let out = driver.run(&mesh).unwrap();
        // The reference surface is the z = 0 plane
        for v in &out.vertices {
            approx::assert_abs_diff_eq!(v.z, 0.0, epsilon = 1e-4);
        }
    }
}
