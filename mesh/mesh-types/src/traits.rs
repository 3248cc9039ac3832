//! Traits shared by the mesh representations.

use crate::{Aabb, MeshTypesResult, TriangleSoup};
use nalgebra::Point3;

/// Anything that can be expanded into a flat triangle list.
///
/// Metrics are only ever computed on a [`TriangleSoup`], so both mesh
/// representations implement this. Expanding a soup is the identity.
pub trait TriangleSource {
    /// Number of triangles this source describes.
    fn triangle_count(&self) -> usize;

    /// Expand into a flat triangle soup where every triangle owns its corners.
    ///
    /// # Errors
    ///
    /// Returns [`crate::MeshTypesError::IndexOutOfRange`] if a face of an
    /// indexed mesh references a vertex that does not exist.
    fn to_soup(&self) -> MeshTypesResult<TriangleSoup>;
}

/// Trait for types that can compute a bounding box.
pub trait MeshBounds {
    /// Compute the axis-aligned bounding box.
    ///
    /// Returns an empty AABB if the mesh has no vertices.
    fn bounds(&self) -> Aabb;

    /// Compute the bounding box, returning `None` if empty.
    fn bounds_opt(&self) -> Option<Aabb> {
        let b = self.bounds();
        if b.is_empty() { None } else { Some(b) }
    }

    /// Get the center of the bounding box.
    fn center(&self) -> Point3<f64> {
        self.bounds().center()
    }
}
