//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTypesError, MeshTypesResult, TriangleSoup, TriangleSource};
use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices are stored once and faces reference them by index. This is the
/// natural shape of OBJ and 3MF data; it must be expanded with
/// [`TriangleSource::to_soup`] before any metric is computed.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, Point3, TriangleSource};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(mesh.to_soup().unwrap().triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Shared vertex positions.
    pub vertices: Vec<Point3<f64>>,

    /// Triangle faces as indices into `vertices`.
    /// Each face is `[v0, v1, v2]` with counter-clockwise winding.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Number of faces.
    #[inline]
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Whether the mesh has no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Reverse the winding of every face.
    pub fn flip_winding(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }

    /// Append another mesh, offsetting its face indices.
    ///
    /// # Note
    ///
    /// Indices are `u32`; meshes beyond ~4 billion vertices are unsupported.
    #[allow(clippy::cast_possible_truncation)]
    pub fn merge(&mut self, other: &Self) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|f| [f[0] + offset, f[1] + offset, f[2] + offset]),
        );
    }
}

impl TriangleSource for IndexedMesh {
    #[inline]
    fn triangle_count(&self) -> usize {
        self.faces.len()
    }

    fn to_soup(&self) -> MeshTypesResult<TriangleSoup> {
        let vertex_count = self.vertices.len();
        let mut positions = Vec::with_capacity(self.faces.len() * 3);

        for (face_idx, face) in self.faces.iter().enumerate() {
            for &index in face {
                let vertex = self.vertices.get(index as usize).ok_or(
                    MeshTypesError::IndexOutOfRange {
                        face: face_idx,
                        index,
                        vertex_count,
                    },
                )?;
                positions.push(*vertex);
            }
        }

        TriangleSoup::from_positions(positions)
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter())
    }
}

/// Create an axis-aligned box from `(0,0,0)` to `(a,b,c)` with outward winding.
///
/// # Example
///
/// ```
/// use mesh_types::cuboid;
///
/// let block = cuboid(2.0, 3.0, 4.0);
/// assert_eq!(block.vertex_count(), 8);
/// assert_eq!(block.face_count(), 12);
/// ```
#[must_use]
pub fn cuboid(a: f64, b: f64, c: f64) -> IndexedMesh {
    let vertices = vec![
        Point3::new(0.0, 0.0, 0.0), // 0
        Point3::new(a, 0.0, 0.0),   // 1
        Point3::new(a, b, 0.0),     // 2
        Point3::new(0.0, b, 0.0),   // 3
        Point3::new(0.0, 0.0, c),   // 4
        Point3::new(a, 0.0, c),     // 5
        Point3::new(a, b, c),       // 6
        Point3::new(0.0, b, c),     // 7
    ];

    // Two triangles per side, CCW when viewed from outside
    let faces = vec![
        [0, 2, 1],
        [0, 3, 2], // bottom (-Z)
        [4, 5, 6],
        [4, 6, 7], // top (+Z)
        [0, 1, 5],
        [0, 5, 4], // front (-Y)
        [3, 7, 6],
        [3, 6, 2], // back (+Y)
        [0, 4, 7],
        [0, 7, 3], // left (-X)
        [1, 2, 6],
        [1, 6, 5], // right (+X)
    ];

    IndexedMesh::from_parts(vertices, faces)
}

/// A unit cube from `(0,0,0)` to `(1,1,1)`.
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    cuboid(1.0, 1.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_mesh() {
        let mesh = IndexedMesh::new();
        assert!(mesh.is_empty());
        assert!(mesh.to_soup().unwrap().is_empty());
        assert!(mesh.bounds().is_empty());
    }

    #[test]
    fn expansion_copies_every_corner() {
        let cube = unit_cube();
        let soup = cube.to_soup().unwrap();
        assert_eq!(soup.triangle_count(), 12);
        assert_eq!(soup.positions().len(), 36);

        let first = soup.triangle(0).unwrap();
        assert_eq!(first.v0, cube.vertices[0]);
        assert_eq!(first.v1, cube.vertices[2]);
        assert_eq!(first.v2, cube.vertices[1]);
    }

    #[test]
    fn expansion_rejects_bad_index() {
        let mesh = IndexedMesh::from_parts(vec![Point3::origin(); 3], vec![[0, 1, 2], [0, 1, 3]]);
        let err = mesh.to_soup().unwrap_err();
        assert_eq!(
            err,
            MeshTypesError::IndexOutOfRange {
                face: 1,
                index: 3,
                vertex_count: 3
            }
        );
    }

    #[test]
    fn expansion_is_idempotent() {
        let soup = unit_cube().to_soup().unwrap();
        let again = soup.to_soup().unwrap();
        assert_eq!(again.triangle_count(), soup.triangle_count());
        assert_eq!(again.positions(), soup.positions());
    }

    #[test]
    fn cuboid_faces_point_outward() {
        let block = cuboid(2.0, 3.0, 4.0);
        let center = block.center();
        for tri in block.to_soup().unwrap().triangles() {
            let n = tri.normal().unwrap();
            assert!(n.dot(&(tri.centroid() - center)) > 0.0);
        }
    }

    #[test]
    fn merge_offsets_indices() {
        let mut a = unit_cube();
        let b = unit_cube();
        a.merge(&b);
        assert_eq!(a.vertex_count(), 16);
        assert_eq!(a.face_count(), 24);
        assert_eq!(a.faces[12], [8, 10, 9]);
    }

    #[test]
    fn flip_winding_reverses_soup_volume_sign() {
        let mut cube = unit_cube();
        let before: f64 = cube.to_soup().unwrap().triangles().map(|t| t.signed_volume()).sum();
        cube.flip_winding();
        let after: f64 = cube.to_soup().unwrap().triangles().map(|t| t.signed_volume()).sum();
        assert_relative_eq!(before, 1.0, epsilon = 1e-12);
        assert_relative_eq!(after, -1.0, epsilon = 1e-12);
    }
}
