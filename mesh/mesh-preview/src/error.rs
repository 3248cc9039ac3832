//! Error types for preview rendering.

use thiserror::Error;

/// Result type for preview rendering.
pub type PreviewResult<T> = Result<T, PreviewError>;

/// Errors that can occur while rendering or encoding a preview.
///
/// A failed preview never affects the estimate; callers are expected to log
/// and move on.
#[derive(Debug, Error)]
pub enum PreviewError {
    /// The mesh has no triangles.
    #[error("cannot render an empty mesh")]
    EmptyMesh,

    /// The bounding box has no extent or is not finite.
    #[error("mesh bounds are degenerate (diagonal {diagonal})")]
    DegenerateBounds {
        /// Bounding box diagonal in mm.
        diagonal: f64,
    },

    /// The requested image has a zero dimension.
    #[error("invalid preview size {width}x{height}")]
    InvalidSize {
        /// Requested width in pixels.
        width: u32,
        /// Requested height in pixels.
        height: u32,
    },

    /// PNG encoding failed.
    #[error("failed to encode preview: {0}")]
    Encode(#[from] image::ImageError),
}
