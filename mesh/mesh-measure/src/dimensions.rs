//! Part dimensions.
//!
//! Axis-aligned extents of a part, as shown next to its weight and price.

use mesh_types::MeshBounds;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Axis-aligned extents of a mesh in mm.
///
/// # Example
///
/// ```
/// use mesh_types::cuboid;
/// use mesh_measure::dimensions;
///
/// let dims = dimensions(&cuboid(20.0, 10.0, 5.0));
///
/// assert!((dims.width - 20.0).abs() < 1e-10);
/// assert!((dims.depth - 10.0).abs() < 1e-10);
/// assert!((dims.height - 5.0).abs() < 1e-10);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Dimensions {
    /// Width (X dimension).
    pub width: f64,
    /// Depth (Y dimension).
    pub depth: f64,
    /// Height (Z dimension).
    pub height: f64,
}

/// Extract dimensions of a mesh.
///
/// An empty mesh has all-zero dimensions.
#[must_use]
pub fn dimensions<M: MeshBounds + ?Sized>(mesh: &M) -> Dimensions {
    let Some(bounds) = mesh.bounds_opt() else {
        return Dimensions::default();
    };

    let size = bounds.size();
    Dimensions {
        width: size.x,
        depth: size.y,
        height: size.z,
    }
}
