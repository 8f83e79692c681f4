//! Error types for the geoattr library.

use thiserror::Error;

use super::AttrType;

/// Main error type for geoattr operations.
///
/// Attribute dispatch itself never returns this type: lookups report misses through
/// `Option` and mutations through `bool`. Errors are raised by the supporting value,
/// array and layer containers.
#[derive(Error, Debug)]
pub enum Error {
    /// Two builtin providers registered under the same name
    #[error("Duplicate builtin attribute: {0}")]
    DuplicateBuiltin(String),

    /// Element type does not match
    #[error("Type mismatch: expected {expected}, got {actual}")]
    TypeMismatch { expected: AttrType, actual: AttrType },

    /// Raw byte buffer has the wrong size for its type
    #[error("Size mismatch: expected {expected} bytes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Array has the wrong number of elements
    #[error("Length mismatch: expected {expected} elements, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    /// A layer with this name is already present
    #[error("Layer already exists: {0}")]
    LayerExists(String),

    /// Attribute type name could not be parsed
    #[error("Unknown attribute type: {0}")]
    UnknownType(String),

    /// Domain name could not be parsed
    #[error("Unknown attribute domain: {0}")]
    UnknownDomain(String),

    /// Geometry kind is not one of the known kinds
    #[error("Unknown geometry: {0}")]
    UnknownGeometry(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an "other" error from a string.
    pub fn other(msg: impl Into<String>) -> Self {
        Self::Other(msg.into())
    }
}

/// Result type alias for geoattr operations.
pub type Result<T> = std::result::Result<T, Error>;
