//! Error types for mesh construction and expansion.

use thiserror::Error;

/// Result type for mesh type operations.
pub type MeshTypesResult<T> = Result<T, MeshTypesError>;

/// Errors raised while building or expanding meshes.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshTypesError {
    /// A flat position list whose length is not a multiple of three.
    #[error("triangle list has {len} points, which is not a multiple of 3")]
    RaggedTriangleList {
        /// Number of points supplied.
        len: usize,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {index}, but the mesh has {vertex_count} vertices")]
    IndexOutOfRange {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        index: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}
