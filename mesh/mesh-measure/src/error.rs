//! Error types for measurement operations.

use mesh_types::MeshTypesError;
use thiserror::Error;

/// Result type alias for measurement operations.
pub type MeasureResult<T> = Result<T, MeasureError>;

/// Errors that can occur during measurement operations.
///
/// Computing metrics on a flat triangle list never fails; only expanding an
/// indexed mesh with bad indices does.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeasureError {
    /// The mesh could not be expanded to a flat triangle list.
    #[error("cannot measure mesh: {0}")]
    InvalidMesh(#[from] MeshTypesError),
}
