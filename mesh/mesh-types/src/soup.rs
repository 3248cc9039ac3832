//! Flat (non-indexed) triangle list.

use crate::{Aabb, MeshBounds, MeshTypesError, MeshTypesResult, Triangle, TriangleSource};
use nalgebra::{Matrix4, Point3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A triangulated surface stored as a flat list of corner positions.
///
/// Every consecutive triple of positions is one triangle. No vertex is
/// shared between triangles, so duplicate and degenerate triangles are kept
/// exactly as the source file wrote them.
///
/// The length of the position list is always a multiple of three; the
/// constructors that accept raw positions reject anything else.
///
/// # Example
///
/// ```
/// use mesh_types::{TriangleSoup, Point3};
///
/// let soup = TriangleSoup::from_positions(vec![
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
///     Point3::new(0.0, 1.0, 0.0),
/// ])
/// .unwrap();
///
/// assert_eq!(soup.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TriangleSoup {
    positions: Vec<Point3<f64>>,
}

impl TriangleSoup {
    /// Create an empty soup.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
        }
    }

    /// Create an empty soup with room for `triangles` triangles.
    #[inline]
    #[must_use]
    pub fn with_capacity(triangles: usize) -> Self {
        Self {
            positions: Vec::with_capacity(triangles * 3),
        }
    }

    /// Build a soup from a flat list of corner positions.
    ///
    /// # Errors
    ///
    /// Returns [`MeshTypesError::RaggedTriangleList`] if the number of
    /// positions is not a multiple of three.
    pub fn from_positions(positions: Vec<Point3<f64>>) -> MeshTypesResult<Self> {
        if positions.len() % 3 != 0 {
            return Err(MeshTypesError::RaggedTriangleList {
                len: positions.len(),
            });
        }
        Ok(Self { positions })
    }

    /// Build a soup from raw `[x0, y0, z0, x1, ...]` coordinates.
    ///
    /// # Errors
    ///
    /// Returns [`MeshTypesError::RaggedTriangleList`] if the coordinates do
    /// not describe whole triangles.
    pub fn from_coords(coords: &[f64]) -> MeshTypesResult<Self> {
        if coords.len() % 9 != 0 {
            return Err(MeshTypesError::RaggedTriangleList {
                len: coords.len() / 3,
            });
        }
        let positions = coords
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();
        Ok(Self { positions })
    }

    /// Append one triangle.
    pub fn push(&mut self, triangle: Triangle) {
        self.positions
            .extend_from_slice(&[triangle.v0, triangle.v1, triangle.v2]);
    }

    /// Append every triangle of `other`.
    pub fn append(&mut self, other: &Self) {
        self.positions.extend_from_slice(&other.positions);
    }

    /// Number of triangles.
    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Whether the soup has no triangles.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// The flat corner list; its length is a multiple of three.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Consume the soup, returning the flat corner list.
    #[must_use]
    pub fn into_positions(self) -> Vec<Point3<f64>> {
        self.positions
    }

    /// Get a triangle by index.
    #[must_use]
    pub fn triangle(&self, index: usize) -> Option<Triangle> {
        let corners = self.positions.get(index * 3..index * 3 + 3)?;
        Some(Triangle::new(corners[0], corners[1], corners[2]))
    }

    /// Iterate over all triangles.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        self.positions
            .chunks_exact(3)
            .map(|c| Triangle::new(c[0], c[1], c[2]))
    }

    /// Reverse the winding of every triangle.
    pub fn flip_winding(&mut self) {
        for corners in self.positions.chunks_exact_mut(3) {
            corners.swap(1, 2);
        }
    }

    /// Apply an affine transform (homogeneous, column-vector convention).
    ///
    /// A transform with a negative determinant mirrors the geometry, which
    /// turns every triangle inside-out; the winding is flipped back so the
    /// triangles keep facing the same way relative to the solid.
    pub fn transform(&mut self, matrix: &Matrix4<f64>) {
        for p in &mut self.positions {
            *p = matrix.transform_point(p);
        }
        if matrix.fixed_view::<3, 3>(0, 0).determinant() < 0.0 {
            self.flip_winding();
        }
    }

    /// Scale every coordinate uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.positions {
            p.coords *= factor;
        }
    }
}

impl TriangleSource for TriangleSoup {
    #[inline]
    fn triangle_count(&self) -> usize {
        Self::triangle_count(self)
    }

    fn to_soup(&self) -> MeshTypesResult<TriangleSoup> {
        Ok(self.clone())
    }
}

impl MeshBounds for TriangleSoup {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.positions.iter())
    }
}

impl FromIterator<Triangle> for TriangleSoup {
    fn from_iter<I: IntoIterator<Item = Triangle>>(iter: I) -> Self {
        let mut soup = Self::new();
        for tri in iter {
            soup.push(tri);
        }
        soup
    }
}

impl Extend<Triangle> for TriangleSoup {
    fn extend<I: IntoIterator<Item = Triangle>>(&mut self, iter: I) {
        for tri in iter {
            self.push(tri);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::Vector3;

    fn one_triangle() -> TriangleSoup {
        TriangleSoup::from_coords(&[0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0]).unwrap()
    }

    #[test]
    fn ragged_positions_are_rejected() {
        let err = TriangleSoup::from_positions(vec![Point3::origin(); 4]).unwrap_err();
        assert_eq!(err, MeshTypesError::RaggedTriangleList { len: 4 });
    }

    #[test]
    fn ragged_coords_are_rejected() {
        assert!(TriangleSoup::from_coords(&[0.0; 6]).is_err());
        assert!(TriangleSoup::from_coords(&[0.0; 10]).is_err());
        assert!(TriangleSoup::from_coords(&[]).unwrap().is_empty());
    }

    #[test]
    fn triangle_access() {
        let soup = one_triangle();
        assert_eq!(soup.triangle_count(), 1);
        assert!(soup.triangle(0).is_some());
        assert!(soup.triangle(1).is_none());
        assert_eq!(soup.triangles().count(), 1);
    }

    #[test]
    fn expanding_a_soup_is_identity() {
        let soup = one_triangle();
        let expanded = soup.to_soup().unwrap();
        assert_eq!(expanded, soup);
        assert_eq!(expanded.to_soup().unwrap(), soup);
    }

    #[test]
    fn flip_winding_swaps_last_two_corners() {
        let mut soup = one_triangle();
        soup.flip_winding();
        let tri = soup.triangle(0).unwrap();
        assert_eq!(tri.v1, Point3::new(0.0, 1.0, 0.0));
        assert_eq!(tri.v2, Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn translation_keeps_winding() {
        let mut soup = one_triangle();
        let before = soup.triangle(0).unwrap().normal().unwrap();
        soup.transform(&Matrix4::new_translation(&Vector3::new(5.0, 0.0, 0.0)));
        let after = soup.triangle(0).unwrap();
        assert_relative_eq!(after.v0.x, 5.0);
        assert_relative_eq!(after.normal().unwrap(), before);
    }

    #[test]
    fn mirror_transform_restores_facing() {
        let mut soup = one_triangle();
        soup.transform(&Matrix4::new_nonuniform_scaling(&Vector3::new(-1.0, 1.0, 1.0)));
        // Mirrored in X, then rewound: the normal still points +Z.
        let n = soup.triangle(0).unwrap().normal().unwrap();
        assert_relative_eq!(n.z, 1.0);
    }

    #[test]
    fn append_and_collect() {
        let mut soup = one_triangle();
        let other: TriangleSoup = one_triangle().triangles().collect();
        soup.append(&other);
        assert_eq!(soup.triangle_count(), 2);
    }

    #[test]
    fn bounds_of_soup() {
        let soup = one_triangle();
        let b = soup.bounds();
        assert_eq!(b.max, Point3::new(1.0, 1.0, 0.0));
        assert!(TriangleSoup::new().bounds_opt().is_none());
    }
}
