//! Enclosed volume and surface area.
//!
//! Each triangle `(p1, p2, p3)` contributes the signed volume of the
//! tetrahedron it spans with the origin, `p1 · (p2 × p3) / 6`, and its area
//! `|(p2 − p1) × (p3 − p1)| / 2`. For a closed, consistently wound surface
//! the signed volumes sum to the enclosed volume regardless of where the
//! origin lies.
//!
//! Open and non-manifold meshes still produce numbers; they are not
//! meaningful volumes but are never an error.

use mesh_types::{Point3, TriangleSoup, TriangleSource};
use tracing::{debug, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::dimensions::{dimensions, Dimensions};
use crate::error::MeasureResult;
use crate::format::FormattedMetrics;

/// Geometric metrics of a triangulated part.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MeshMetrics {
    /// Enclosed volume in mm³, `|signed_volume|`.
    pub volume: f64,
    /// Total surface area in mm².
    pub surface_area: f64,
    /// Sum of signed tetrahedron volumes. Negative for inside-out winding.
    pub signed_volume: f64,
    /// Number of triangles measured.
    pub triangle_count: usize,
    /// Axis-aligned extents.
    pub dimensions: Dimensions,
}

impl MeshMetrics {
    /// Whether the triangles are wound inward (negative signed volume).
    #[must_use]
    pub fn is_inside_out(&self) -> bool {
        self.signed_volume < 0.0
    }

    /// Two-decimal display strings for volume and surface area.
    #[must_use]
    pub fn formatted(&self) -> FormattedMetrics {
        FormattedMetrics::new(self.volume, self.surface_area)
    }
}

/// Signed volume of the tetrahedron `(origin, p1, p2, p3)`.
///
/// ```
/// use mesh_measure::signed_tetrahedron_volume;
/// use mesh_types::Point3;
///
/// let v = signed_tetrahedron_volume(
///     &Point3::new(1.0, 0.0, 0.0),
///     &Point3::new(0.0, 1.0, 0.0),
///     &Point3::new(0.0, 0.0, 1.0),
/// );
/// assert!((v - 1.0 / 6.0).abs() < 1e-12);
/// ```
#[inline]
#[must_use]
pub fn signed_tetrahedron_volume(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    p1.coords.dot(&p2.coords.cross(&p3.coords)) / 6.0
}

/// Area of the triangle `(p1, p2, p3)`.
#[inline]
#[must_use]
pub fn triangle_area(p1: &Point3<f64>, p2: &Point3<f64>, p3: &Point3<f64>) -> f64 {
    (p2 - p1).cross(&(p3 - p1)).norm() / 2.0
}

/// Compute metrics of a flat triangle list.
///
/// Zero triangles give zero volume and area.
///
/// # Example
///
/// ```
/// use mesh_measure::compute_metrics;
/// use mesh_types::{cuboid, TriangleSource};
///
/// let soup = cuboid(10.0, 10.0, 10.0).to_soup().unwrap();
/// let metrics = compute_metrics(&soup);
///
/// assert!((metrics.volume - 1000.0).abs() < 1e-9);
/// assert!((metrics.surface_area - 600.0).abs() < 1e-9);
/// ```
#[must_use]
pub fn compute_metrics(soup: &TriangleSoup) -> MeshMetrics {
    let (signed_volume, surface_area) = soup
        .positions()
        .chunks_exact(3)
        .fold((0.0_f64, 0.0_f64), |(vol, area), tri| {
            (
                vol + signed_tetrahedron_volume(&tri[0], &tri[1], &tri[2]),
                area + triangle_area(&tri[0], &tri[1], &tri[2]),
            )
        });

    let metrics = MeshMetrics {
        volume: signed_volume.abs(),
        surface_area,
        signed_volume,
        triangle_count: soup.triangle_count(),
        dimensions: dimensions(soup),
    };

    debug!(
        triangles = metrics.triangle_count,
        volume = metrics.volume,
        surface_area = metrics.surface_area,
        "Computed mesh metrics"
    );
    if metrics.is_inside_out() {
        warn!(
            signed_volume = metrics.signed_volume,
            "Mesh winding is inside-out; using absolute volume"
        );
    }

    metrics
}

/// Expand any mesh representation and compute its metrics.
///
/// # Errors
///
/// Returns [`crate::MeasureError::InvalidMesh`] if an indexed mesh has
/// out-of-range face indices.
pub fn measure<M: TriangleSource + ?Sized>(mesh: &M) -> MeasureResult<MeshMetrics> {
    let soup = mesh.to_soup()?;
    Ok(compute_metrics(&soup))
}
