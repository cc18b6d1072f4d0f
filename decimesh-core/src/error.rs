//! Error types for decimesh

use thiserror::Error;

/// Main error type for decimesh operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Spatial index built over zero points")]
    EmptyIndex,

    #[error("Simplification failed: {0}")]
    Simplification(String),

    #[error("Attribute '{name}' has {actual} entries, expected {expected}")]
    AttributeCardinality {
        name: String,
        expected: usize,
        actual: usize,
    },
}

/// Result type alias for decimesh operations
pub type Result<T> = std::result::Result<T, Error>;
