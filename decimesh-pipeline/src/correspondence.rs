//! Nearest-neighbor correspondences between target and source elements
//!
//! Both correspondences map reduced-mesh elements back to the pre-reduction
//! mesh: vertices by position, faces by centroid. They are built once against
//! the same source snapshot attributes were captured from and never mutated
//! afterward. The mappings are total over the target but need not be
//! injective or surjective over the source.

use decimesh_core::{NearestNeighborSearch, Point3f, Result, Transform3D};
use decimesh_spatial::SpatialIndex;
use rayon::prelude::*;

/// Total mapping from every target vertex index to its nearest source vertex
/// index.
#[derive(Debug, Clone)]
pub struct VertexCorrespondence {
    map: Vec<usize>,
}

impl VertexCorrespondence {
    /// Map every target point through an index already built over the source
    /// points.
    pub fn from_index(source_index: &SpatialIndex, target_points: &[Point3f]) -> Self {
        let map = target_points
            .par_iter()
            .map(|p| source_index.query_nearest(p).0)
            .collect();
        Self { map }
    }

    /// Build the source index and map every target point through it.
    pub fn build(source_points: &[Point3f], target_points: &[Point3f]) -> Result<Self> {
        let index = SpatialIndex::build(source_points)?;
        Ok(Self::from_index(&index, target_points))
    }

    /// Source vertex mapped to target vertex `t`.
    pub fn source_of(&self, t: usize) -> usize {
        self.map[t]
    }

    /// Number of target vertices covered.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.map.iter().copied()
    }
}

/// Mapping from every target face index to its nearest source face index,
/// keyed by centroid distance in world space.
#[derive(Debug, Clone)]
pub struct FaceCorrespondence {
    map: Vec<usize>,
}

impl FaceCorrespondence {
    /// Build the face mapping from centroids given in each mesh's local
    /// frame. Centroids are moved into world space through their respective
    /// transforms first; comparing across differing local frames would make
    /// nearest-face results meaningless.
    pub fn build(
        source_centroids: &[Point3f],
        target_centroids: &[Point3f],
        source_transform: &Transform3D,
        target_transform: &Transform3D,
    ) -> Result<Self> {
        let source_world: Vec<Point3f> = source_centroids
            .iter()
            .map(|c| source_transform.transform_point(c))
            .collect();
        let index = SpatialIndex::build(&source_world)?;

        let map = target_centroids
            .par_iter()
            .map(|c| {
                let world = target_transform.transform_point(c);
                index.query_nearest(&world).0
            })
            .collect();
        Ok(Self { map })
    }

    /// Source face mapped to target face `t`.
    pub fn source_of(&self, t: usize) -> usize {
        self.map[t]
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.map.iter().copied()
    }
}
