//! Core traits for decimesh

use crate::point::Point3f;

/// Exact nearest-neighbor search over a fixed point set.
///
/// Implementations must return a true global minimum-distance point, never an
/// approximate or sampled neighbor. Ties may resolve to any of the tied
/// points. Queries are read-only and repeatable.
pub trait NearestNeighborSearch {
    /// Find the index of the nearest point to `query` and its Euclidean
    /// distance.
    fn query_nearest(&self, query: &Point3f) -> (usize, f32);

    /// Number of indexed points.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
