//! Quadric edge-collapse simplification
//!
//! Iteratively collapses the cheapest edge under the quadric error metric
//! (QEM) until the face budget is met. Seam edges act as delimiters: with
//! `seam_delimited` set, a marked edge is never collapsed and a collapse
//! never pulls a seam vertex off its seam.

use crate::MeshSimplifier;
use decimesh_core::{EdgeKey, Error, Point3f, Result, TriangleMesh};
use nalgebra::{Matrix4, Vector4};
use priority_queue::PriorityQueue;
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::debug;

/// Candidate collapse with its QEM cost at queue time.
///
/// Costs go stale as surrounding collapses land; entries are revalidated and
/// the target position recomputed when popped.
#[derive(Debug, Clone, PartialEq)]
struct EdgeCost {
    v1: usize,
    v2: usize,
    cost: f64,
}

impl Eq for EdgeCost {}

impl PartialOrd for EdgeCost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for EdgeCost {
    fn cmp(&self, other: &Self) -> Ordering {
        // Inverted so the priority queue pops the cheapest edge first
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
    }
}

/// Working state of one simplification call.
struct CollapseState {
    positions: Vec<Point3f>,
    quadrics: Vec<Matrix4<f64>>,
    faces: Vec<[usize; 3]>,
    face_alive: Vec<bool>,
    /// Alive faces incident to each vertex.
    vertex_faces: Vec<HashSet<usize>>,
    seams: HashSet<EdgeKey>,
    seam_vertices: HashSet<usize>,
    alive_faces: usize,
}

impl CollapseState {
    fn new(mesh: &TriangleMesh) -> Self {
        let nv = mesh.vertices.len();
        let nf = mesh.faces.len();

        let mut vertex_faces = vec![HashSet::new(); nv];
        for (fi, face) in mesh.faces.iter().enumerate() {
            for &vi in face {
                vertex_faces[vi].insert(fi);
            }
        }

        let mut seam_vertices = HashSet::new();
        for edge in &mesh.seam_edges {
            seam_vertices.insert(edge.0);
            seam_vertices.insert(edge.1);
        }

        let mut state = Self {
            positions: mesh.vertices.clone(),
            quadrics: vec![Matrix4::zeros(); nv],
            faces: mesh.faces.clone(),
            face_alive: vec![true; nf],
            vertex_faces,
            seams: mesh.seam_edges.clone(),
            seam_vertices,
            alive_faces: nf,
        };
        state.initialize_quadrics();
        state
    }

    fn initialize_quadrics(&mut self) {
        for fi in 0..self.faces.len() {
            let [a, b, c] = self.faces[fi];
            if let Some(plane) =
                face_plane(&self.positions[a], &self.positions[b], &self.positions[c])
            {
                let q = plane_to_quadric(&plane);
                self.quadrics[a] += q;
                self.quadrics[b] += q;
                self.quadrics[c] += q;
            }
        }
    }

    /// True while the vertex still touches at least one alive face.
    fn vertex_alive(&self, v: usize) -> bool {
        !self.vertex_faces[v].is_empty()
    }

    /// True if `u` and `v` still share an alive face.
    fn adjacent(&self, u: usize, v: usize) -> bool {
        let (small, large) = if self.vertex_faces[u].len() <= self.vertex_faces[v].len() {
            (u, v)
        } else {
            (v, u)
        };
        self.vertex_faces[small]
            .iter()
            .any(|&fi| self.faces[fi].contains(&large))
    }

    /// Alive neighbors of `v`, excluding `v` itself.
    fn neighbors(&self, v: usize) -> HashSet<usize> {
        let mut out = HashSet::new();
        for &fi in &self.vertex_faces[v] {
            for &vi in &self.faces[fi] {
                if vi != v {
                    out.insert(vi);
                }
            }
        }
        out
    }

    /// QEM-optimal collapse target for the edge `(u, v)` with its cost.
    ///
    /// Solves the combined quadric where it is well conditioned and falls
    /// back to the best of the endpoints and the midpoint otherwise.
    fn collapse_target(&self, u: usize, v: usize) -> (Point3f, f64) {
        let q = self.quadrics[u] + self.quadrics[v];

        let pu = self.positions[u];
        let pv = self.positions[v];
        let mid = Point3f::from((pu.coords + pv.coords) / 2.0);
        let mut candidates = vec![pu, pv, mid];

        let a = q.fixed_view::<3, 3>(0, 0).into_owned();
        let b = nalgebra::Vector3::new(-q[(0, 3)], -q[(1, 3)], -q[(2, 3)]);
        if let Some(inv) = a.try_inverse() {
            let solved = inv * b;
            if solved.iter().all(|x| x.is_finite()) {
                candidates.push(Point3f::new(
                    solved.x as f32,
                    solved.y as f32,
                    solved.z as f32,
                ));
            }
        }

        let mut best = (pu, f64::INFINITY);
        for p in candidates {
            let err = vertex_error(&q, &p);
            if err < best.1 {
                best = (p, err);
            }
        }
        best
    }

    /// Collapse `gone` into `keep`, placing `keep` at `position`.
    ///
    /// Faces straddling the edge die; remaining faces of `gone` are rewired
    /// to `keep`. Seam edges incident to `gone` are remapped so delimiting
    /// stays valid for later collapses.
    fn collapse(&mut self, keep: usize, gone: usize, position: Point3f) {
        self.positions[keep] = position;
        let absorbed = self.quadrics[gone];
        self.quadrics[keep] += absorbed;

        let affected: Vec<usize> = self.vertex_faces[gone].iter().copied().collect();
        for fi in affected {
            if !self.face_alive[fi] {
                continue;
            }
            if self.faces[fi].contains(&keep) {
                // Face spanned the collapsed edge
                self.face_alive[fi] = false;
                self.alive_faces -= 1;
                for &vi in &self.faces[fi] {
                    self.vertex_faces[vi].remove(&fi);
                }
            } else {
                for slot in self.faces[fi].iter_mut() {
                    if *slot == gone {
                        *slot = keep;
                    }
                }
                self.vertex_faces[gone].remove(&fi);
                self.vertex_faces[keep].insert(fi);
            }
        }
        self.vertex_faces[gone].clear();

        if self.seam_vertices.remove(&gone) {
            let moved: Vec<EdgeKey> = self
                .seams
                .iter()
                .filter(|e| e.0 == gone || e.1 == gone)
                .copied()
                .collect();
            for old in moved {
                self.seams.remove(&old);
                let a = if old.0 == gone { keep } else { old.0 };
                let b = if old.1 == gone { keep } else { old.1 };
                let remapped = EdgeKey::new(a, b);
                if !remapped.is_degenerate() {
                    self.seams.insert(remapped);
                    self.seam_vertices.insert(keep);
                }
            }
        }
    }

    /// Compact the surviving geometry into a fresh mesh, carrying each
    /// surviving face's attributes over from the input mesh.
    fn into_mesh(self, source: &TriangleMesh) -> TriangleMesh {
        const UNSET: usize = usize::MAX;
        let mut remap = vec![UNSET; self.positions.len()];
        let mut mesh = TriangleMesh::new();

        for (fi, face) in self.faces.iter().enumerate() {
            if !self.face_alive[fi] {
                continue;
            }
            let mut out = [0usize; 3];
            for (slot, &vi) in face.iter().enumerate() {
                if remap[vi] == UNSET {
                    remap[vi] = mesh.vertices.len();
                    mesh.vertices.push(self.positions[vi]);
                }
                out[slot] = remap[vi];
            }
            mesh.faces.push(out);
            mesh.face_attributes
                .push(source.face_attributes.get(fi).copied().unwrap_or_default());
        }

        for edge in &self.seams {
            if edge.is_degenerate() {
                continue;
            }
            if remap[edge.0] != UNSET && remap[edge.1] != UNSET {
                mesh.seam_edges.insert(EdgeKey::new(remap[edge.0], remap[edge.1]));
            }
        }
        mesh
    }
}

fn face_plane(v0: &Point3f, v1: &Point3f, v2: &Point3f) -> Option<Vector4<f64>> {
    let e1 = v1 - v0;
    let e2 = v2 - v0;
    let n = e1.cross(&e2);
    let len = n.norm();
    if len < 1e-12 || !len.is_finite() {
        return None;
    }
    let n = n / len;
    let d = -n.dot(&v0.coords);
    Some(Vector4::new(n.x as f64, n.y as f64, n.z as f64, d as f64))
}

fn plane_to_quadric(p: &Vector4<f64>) -> Matrix4<f64> {
    let (a, b, c, d) = (p[0], p[1], p[2], p[3]);
    Matrix4::new(
        a * a, a * b, a * c, a * d,
        a * b, b * b, b * c, b * d,
        a * c, b * c, c * c, c * d,
        a * d, b * d, c * d, d * d,
    )
}

fn vertex_error(q: &Matrix4<f64>, p: &Point3f) -> f64 {
    let v = Vector4::new(p.x as f64, p.y as f64, p.z as f64, 1.0);
    v.dot(&(q * v))
}

/// Quadric error metric edge-collapse simplifier.
///
/// The workspace's default [`MeshSimplifier`]. Collapses are lazily
/// revalidated at pop time, so stale queue entries are discarded rather than
/// kept in sync.
#[derive(Debug, Clone, Default)]
pub struct QuadricCollapseSimplifier {
    /// Stop collapsing once the cheapest remaining edge exceeds this error,
    /// even if the face budget has not been reached.
    pub error_threshold: Option<f64>,
}

impl QuadricCollapseSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    fn push_edge(
        &self,
        state: &CollapseState,
        queue: &mut PriorityQueue<usize, EdgeCost>,
        next_id: &mut usize,
        u: usize,
        v: usize,
    ) {
        if u == v {
            return;
        }
        let (_, cost) = state.collapse_target(u, v);
        queue.push(*next_id, EdgeCost { v1: u, v2: v, cost });
        *next_id += 1;
    }
}

impl MeshSimplifier for QuadricCollapseSimplifier {
    fn simplify(
        &self,
        mesh: &TriangleMesh,
        target_ratio: f32,
        seam_delimited: bool,
    ) -> Result<TriangleMesh> {
        if !(0.0..=1.0).contains(&target_ratio) || !target_ratio.is_finite() {
            return Err(Error::InvalidInput(format!(
                "target ratio {target_ratio} outside [0, 1]"
            )));
        }
        if mesh.face_count() == 0 {
            return Ok(mesh.clone());
        }

        let target_faces = (mesh.face_count() as f32 * target_ratio).round() as usize;
        if target_faces >= mesh.face_count() {
            return Ok(mesh.clone());
        }

        let mut state = CollapseState::new(mesh);
        let mut queue: PriorityQueue<usize, EdgeCost> = PriorityQueue::new();
        let mut next_id = 0usize;
        for edge in mesh.edges() {
            self.push_edge(&state, &mut queue, &mut next_id, edge.0, edge.1);
        }

        while state.alive_faces > target_faces {
            let Some((_, top)) = queue.pop() else {
                debug!(
                    remaining = state.alive_faces,
                    target = target_faces,
                    "collapse queue exhausted before reaching face budget"
                );
                break;
            };

            if let Some(threshold) = self.error_threshold {
                if top.cost > threshold {
                    debug!(cost = top.cost, "cheapest edge above error threshold");
                    break;
                }
            }

            let (u, v) = (top.v1, top.v2);
            if !state.vertex_alive(u) || !state.vertex_alive(v) || !state.adjacent(u, v) {
                continue;
            }

            // Pick collapse direction and target, honoring seam delimiters
            let (keep, gone, position) = if seam_delimited {
                if state.seams.contains(&EdgeKey::new(u, v)) {
                    continue;
                }
                let on_seam_u = state.seam_vertices.contains(&u);
                let on_seam_v = state.seam_vertices.contains(&v);
                match (on_seam_u, on_seam_v) {
                    // Both endpoints sit on seams: collapsing would bridge islands
                    (true, true) => continue,
                    // Collapse into the seam vertex so the seam keeps its shape
                    (true, false) => (u, v, state.positions[u]),
                    (false, true) => (v, u, state.positions[v]),
                    (false, false) => {
                        let (position, _) = state.collapse_target(u, v);
                        (u, v, position)
                    }
                }
            } else {
                // Queue entries can be stale; recompute the target now
                let (position, _) = state.collapse_target(u, v);
                (u, v, position)
            };

            state.collapse(keep, gone, position);
            for n in state.neighbors(keep) {
                self.push_edge(&state, &mut queue, &mut next_id, keep, n);
            }
        }

        Ok(state.into_mesh(mesh))
    }
}
