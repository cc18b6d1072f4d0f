//! Point and vector type aliases

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// Squared Euclidean distance between two points.
#[inline]
pub fn distance_squared(a: &Point3f, b: &Point3f) -> f32 {
    let d = a - b;
    d.x * d.x + d.y * d.y + d.z * d.z
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: &Point3f, b: &Point3f) -> f32 {
    distance_squared(a, b).sqrt()
}
