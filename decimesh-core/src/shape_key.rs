//! Shape keys (morph targets)

use crate::error::{Error, Result};
use crate::point::Vector3f;
use serde::{Deserialize, Serialize};

/// A named per-vertex vector layer blended against the base mesh by a scalar
/// weight. `data` holds one vector per vertex of the mesh the key was
/// captured from, index-for-index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShapeKey {
    pub name: String,
    pub data: Vec<Vector3f>,
    /// Blend weight the key was captured with.
    pub value: f32,
}

impl ShapeKey {
    pub fn new(name: impl Into<String>, data: Vec<Vector3f>) -> Self {
        Self {
            name: name.into(),
            data,
            value: 0.0,
        }
    }

    pub fn with_value(mut self, value: f32) -> Self {
        self.value = value;
        self
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Check this key against the vertex count of the mesh it is supposed to
    /// describe. A mismatch is recoverable (resampling zero-fills), so the
    /// caller decides whether to warn or abort.
    pub fn check_cardinality(&self, vertex_count: usize) -> Result<()> {
        if self.data.len() == vertex_count {
            Ok(())
        } else {
            Err(Error::AttributeCardinality {
                name: self.name.clone(),
                expected: vertex_count,
                actual: self.data.len(),
            })
        }
    }
}
