//! # decimesh-spatial
//!
//! Static nearest-neighbor indexing over fixed point sets.
//!
//! The indexes here are built once and never mutated; a mesh edit means a
//! rebuild. Queries return the exact nearest point, which attribute transfer
//! relies on for correctness.

pub mod index;

pub use index::*;
