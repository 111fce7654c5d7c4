//! Error types for filesystem operations.

use thiserror::Error;

/// Errors that can occur during virtual filesystem operations.
#[derive(Debug, Error)]
pub enum VfsError {
    /// The file does not exist.
    #[error("file not found: {0}")]
    NotFound(String),

    /// The string could not be parsed as an absolute path.
    #[error("invalid path: {0:?}")]
    InvalidPath(String),

    /// A child name is not valid for the path's naming strategy.
    #[error("invalid name {name:?}: {reason}")]
    InvalidName { name: String, reason: String },

    /// A physical root was given as a relative path.
    #[error("path must be absolute: {0}")]
    NotAbsolute(String),

    /// The backend refused a write.
    #[error("write access denied: {0}")]
    WriteDenied(String),

    /// I/O error from the underlying backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience type alias for filesystem operations.
pub type VfsResult<T> = std::result::Result<T, VfsError>;
