//! Common error types used throughout reelforge.
//!
//! Covers the failure cases of input discovery: missing inputs and bad
//! selections.

use std::path::PathBuf;

/// Common error type for reelforge.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An input path does not exist.
    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Invalid input was provided.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a new NotFound error.
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::NotFound(path.into())
    }

    /// Create a new InvalidInput error.
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
