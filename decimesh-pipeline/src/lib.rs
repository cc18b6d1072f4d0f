//! # decimesh-pipeline
//!
//! The attribute-preserving decimation pipeline: captures a source mesh
//! snapshot, drives the simplification operator (directly or iteratively with
//! surface reprojection), maps every reduced vertex and face back to its
//! nearest source counterpart, and resamples shape keys and per-face
//! attributes through that mapping.
//!
//! A run is one blocking sequence: capture, simplify, correspond, resample,
//! reassemble. It either completes with a single new object or fails with no
//! partial artifact.

pub mod capture;
pub mod correspondence;
pub mod driver;
pub mod resample;
pub mod run;
pub mod seam;

pub use capture::*;
pub use correspondence::*;
pub use driver::*;
pub use resample::*;
pub use run::*;
pub use seam::*;
