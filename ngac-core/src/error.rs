//! Error types for ngac-core

use thiserror::Error;

/// Result type alias using our Error
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
///
/// Store implementations must keep `NotFound` distinguishable from the
/// I/O class of failures: the engine treats a missing intermediate node as
/// a tolerable dangling reference but treats `Storage`/`Io` as fatal.
#[derive(Error, Debug)]
pub enum Error {
    /// Entity, relationship, or association not present in the store
    #[error("Not found: {0}")]
    NotFound(String),

    /// Backing-store failure (query error, corrupt row, ...)
    #[error("Storage error: {0}")]
    Storage(String),

    /// I/O failure reaching the store
    #[error("I/O error: {0}")]
    Io(String),

    /// Unparseable entity or relationship kind string
    #[error("Invalid kind: {0}")]
    InvalidKind(String),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a not found error
    pub fn not_found(msg: impl Into<String>) -> Self {
        Error::NotFound(msg.into())
    }

    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Error::Storage(msg.into())
    }

    /// Create an I/O error
    pub fn io(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// Create an invalid kind error
    pub fn invalid_kind(msg: impl Into<String>) -> Self {
        Error::InvalidKind(msg.into())
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// True if this is the `NotFound` variant
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound(_))
    }
}
