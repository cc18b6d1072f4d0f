//! Nearest neighbor index implementations

use decimesh_core::{distance_squared, Error, NearestNeighborSearch, Point3f, Result};
use kiddo::float::kdtree::KdTree;
use kiddo::SquaredEuclidean;

/// Bucket size for the kd-tree. Kiddo panics during construction if more
/// points than the bucket size share a coordinate on one axis, which planar
/// meshes (all vertices at the same z, say) hit easily with the default of 32.
const BUCKET_SIZE: usize = 512;

/// Balanced kd-tree index over a fixed point set.
///
/// Built once from a snapshot of mesh vertices or face centroids and queried
/// any number of times afterward. Queries run in O(log n) expected time and
/// return the exact nearest point.
pub struct SpatialIndex {
    tree: KdTree<f32, u64, 3, BUCKET_SIZE, u32>,
    len: usize,
}

impl SpatialIndex {
    /// Build an index over `points`. The point order is the identity key:
    /// query results refer back to indices in this slice.
    pub fn build(points: &[Point3f]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyIndex);
        }
        let mut tree: KdTree<f32, u64, 3, BUCKET_SIZE, u32> = KdTree::with_capacity(points.len());
        for (i, p) in points.iter().enumerate() {
            tree.add(&[p.x, p.y, p.z], i as u64);
        }
        Ok(Self {
            tree,
            len: points.len(),
        })
    }

    /// All indexed points within `radius` of `query`, unordered, as
    /// `(index, distance)` pairs.
    pub fn within(&self, query: &Point3f, radius: f32) -> Vec<(usize, f32)> {
        self.tree
            .within_unsorted::<SquaredEuclidean>(&[query.x, query.y, query.z], radius * radius)
            .into_iter()
            .map(|n| (n.item as usize, n.distance.sqrt()))
            .collect()
    }
}

impl NearestNeighborSearch for SpatialIndex {
    fn query_nearest(&self, query: &Point3f) -> (usize, f32) {
        let nearest = self
            .tree
            .nearest_one::<SquaredEuclidean>(&[query.x, query.y, query.z]);
        (nearest.item as usize, nearest.distance.sqrt())
    }

    fn len(&self) -> usize {
        self.len
    }
}

/// Linear-scan index with the same contract as [`SpatialIndex`].
///
/// Only sensible for small point sets; kept as the reference implementation
/// the kd-tree is validated against.
pub struct BruteForceIndex {
    points: Vec<Point3f>,
}

impl BruteForceIndex {
    pub fn build(points: &[Point3f]) -> Result<Self> {
        if points.is_empty() {
            return Err(Error::EmptyIndex);
        }
        Ok(Self {
            points: points.to_vec(),
        })
    }
}

impl NearestNeighborSearch for BruteForceIndex {
    fn query_nearest(&self, query: &Point3f) -> (usize, f32) {
        let mut best = (0usize, f32::INFINITY);
        for (i, p) in self.points.iter().enumerate() {
            let dist_sq = distance_squared(p, query);
            if dist_sq < best.1 {
                best = (i, dist_sq);
            }
        }
        (best.0, best.1.sqrt())
    }

    fn len(&self) -> usize {
        self.points.len()
    }
}
