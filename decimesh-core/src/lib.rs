//! Core data structures for decimesh
//!
//! This crate provides the fundamental types shared by the decimesh
//! workspace: points, triangle meshes with per-face attributes and seam
//! topology, shape keys, transforms and the common error taxonomy.

pub mod point;
pub mod mesh;
pub mod shape_key;
pub mod traits;
pub mod transform;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use shape_key::*;
pub use traits::*;
pub use transform::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Matrix3, Matrix4, Point3, Vector3, Vector4};

/// Common result type for decimesh operations
pub type Result<T> = std::result::Result<T, Error>;

/// Type alias for easier imports
pub type Mesh = TriangleMesh;
