//! Error types for reelforge-av.

use std::path::PathBuf;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while planning transcodes.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A required external tool is not available.
    #[error("tool not found: {tool}")]
    ToolNotFound { tool: String },

    /// The file extension does not map to a known container.
    #[error("unsupported file extension `{extension}`: {}", .path.display())]
    UnsupportedFormat { path: PathBuf, extension: String },

    /// An output template referenced a variable that does not exist.
    #[error("unknown template variable `{{{name}}}` in `{template}`")]
    UnknownVariable { name: String, template: String },

    /// Invalid input provided.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create a tool not found error.
    pub fn tool_not_found(tool: impl Into<String>) -> Self {
        Self::ToolNotFound { tool: tool.into() }
    }

    /// Create an unsupported format error.
    pub fn unsupported_format(path: impl Into<PathBuf>, extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            path: path.into(),
            extension: extension.into(),
        }
    }

    /// Create an unknown variable error.
    pub fn unknown_variable(name: impl Into<String>, template: impl Into<String>) -> Self {
        Self::UnknownVariable {
            name: name.into(),
            template: template.into(),
        }
    }
}
