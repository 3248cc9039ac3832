//! Error types for mesh loading.

use std::path::PathBuf;
use thiserror::Error;

use crate::MeshFormat;

/// Result type for mesh loading.
pub type IoResult<T> = Result<T, IoError>;

/// Errors that can occur while loading a mesh.
#[derive(Debug, Error)]
pub enum IoError {
    /// The file extension is not one of the supported formats.
    #[error("unsupported file type: .{extension} (use STL, OBJ, or 3MF)")]
    UnsupportedFormat {
        /// The unrecognized extension, lowercased; empty if there was none.
        extension: String,
    },

    /// The bytes are malformed for the claimed format.
    #[error("invalid {format} file: {message}")]
    Parse {
        /// Format the bytes were parsed as.
        format: MeshFormat,
        /// Description of what was invalid.
        message: String,
    },

    /// File not found.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was not found.
        path: PathBuf,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create a `Parse` error for `format`.
    #[must_use]
    pub fn parse(format: MeshFormat, message: impl Into<String>) -> Self {
        Self::Parse {
            format,
            message: message.into(),
        }
    }

    /// Create an `UnsupportedFormat` error.
    #[must_use]
    pub fn unsupported(extension: impl Into<String>) -> Self {
        Self::UnsupportedFormat {
            extension: extension.into(),
        }
    }

    /// Whether this error is an `UnsupportedFormat`.
    #[must_use]
    pub const fn is_unsupported_format(&self) -> bool {
        matches!(self, Self::UnsupportedFormat { .. })
    }

    /// Whether this error is a `Parse` error.
    #[must_use]
    pub const fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
