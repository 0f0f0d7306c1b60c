//! Unified error type for the clipkit engine.
//!
//! All crates funnel their failures into [`Error`]. The variants map onto the
//! engine's terminal outcome taxonomy: validation failures, scratch-file
//! resource failures, external-tool failures, decode failures, unknown
//! operations, and cooperative-cancellation propagation.

/// Unified error type covering all failure modes in clipkit.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data failed validation before any work began.
    #[error("validation error: {0}")]
    Validation(String),

    /// A scratch-file write or read failed.
    #[error("resource error [{path}]: {message}")]
    Resource {
        /// Path of the scratch file involved.
        path: String,
        /// Human-readable error description.
        message: String,
    },

    /// An external tool invocation failed (non-zero exit or missing output).
    ///
    /// Diagnostic output from the tool is discarded, not captured; the
    /// message is a fixed per-operation description.
    #[error("tool error [{tool}]: {message}")]
    Tool {
        /// Name of the tool that failed.
        tool: String,
        /// Human-readable error description.
        message: String,
    },

    /// Image or font data could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// No handler is registered for the requested operation.
    #[error("unknown operation: {0}")]
    UnknownOperation(String),

    /// The job observed its cancellation flag and stopped early.
    #[error("job killed")]
    Killed,
}

impl Error {
    /// Convenience constructor for [`Error::Validation`].
    pub fn validation(message: impl Into<String>) -> Self {
        Error::Validation(message.into())
    }

    /// Convenience constructor for [`Error::Resource`].
    pub fn resource(path: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Resource {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Convenience constructor for [`Error::Tool`].
    pub fn tool(tool: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Tool {
            tool: tool.into(),
            message: message.into(),
        }
    }

    /// Supplementary detail for failure reporting, where a variant carries one.
    pub fn detail(&self) -> Option<String> {
        match self {
            Error::Resource { path, .. } => Some(path.clone()),
            Error::Tool { tool, .. } => Some(tool.clone()),
            _ => None,
        }
    }
}

/// Result alias using the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
