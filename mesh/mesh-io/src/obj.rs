//! Wavefront OBJ decoding.
//!
//! Parsing is done by `tobj`. Every `o`/`g` statement that owns faces becomes
//! one [`ObjGroup`]; polygons are fan-triangulated and points and lines are
//! dropped. Normals, texture coordinates and materials are not used.
//!
//! Faces may reference vertices as `v`, `v/vt`, `v//vn` or `v/vt/vn`, and
//! negative indices count back from the most recently declared vertex.

use std::path::Path;

use mesh_types::{IndexedMesh, Point3, TriangleSoup, TriangleSource};
use tracing::debug;

use crate::error::{IoError, IoResult};
use crate::MeshFormat;

/// One named object or group and its triangulated faces.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjGroup {
    /// Name from the `o`/`g` statement.
    pub name: String,
    /// Vertices referenced by the group's faces, with 0-based faces into them.
    pub mesh: IndexedMesh,
}

/// A parsed OBJ file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjDocument {
    /// Groups with at least one face, in declaration order.
    pub groups: Vec<ObjGroup>,
}

impl ObjDocument {
    /// Total triangle count across all groups.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.groups.iter().map(|g| g.mesh.face_count()).sum()
    }

    /// Concatenate every group into one flat triangle list.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Parse`] if a face references a vertex its group
    /// does not have.
    pub fn to_soup(&self) -> IoResult<TriangleSoup> {
        let mut soup = TriangleSoup::with_capacity(self.triangle_count());
        for group in &self.groups {
            let part = group
                .mesh
                .to_soup()
                .map_err(|e| IoError::parse(MeshFormat::Obj, format!("{}: {e}", group.name)))?;
            soup.append(&part);
        }
        Ok(soup)
    }
}

fn load_options() -> tobj::LoadOptions {
    tobj::LoadOptions {
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    }
}

/// Parse OBJ text into its groups.
///
/// `mtllib` statements are not followed.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if the text is not UTF-8, a coordinate or face
/// index does not parse, or a face references a vertex that does not exist.
pub fn parse_obj_document(bytes: &[u8]) -> IoResult<ObjDocument> {
    let mut reader = bytes;
    let (models, _materials) = tobj::load_obj_buf(&mut reader, &load_options(), |_: &Path| {
        Err(tobj::LoadError::OpenFileFailed)
    })
    .map_err(|e| IoError::parse(MeshFormat::Obj, e.to_string()))?;

    let groups = models.into_iter().map(group_from_model).collect();
    Ok(ObjDocument { groups })
}

fn group_from_model(model: tobj::Model) -> ObjGroup {
    let vertices = model
        .mesh
        .positions
        .chunks_exact(3)
        .map(|p| Point3::new(p[0], p[1], p[2]))
        .collect();
    let faces = model
        .mesh
        .indices
        .chunks_exact(3)
        .map(|f| [f[0], f[1], f[2]])
        .collect();

    debug!(group = %model.name, "OBJ group");
    ObjGroup {
        name: model.name,
        mesh: IndexedMesh::from_parts(vertices, faces),
    }
}

/// Parse OBJ bytes into a flat triangle list.
///
/// # Errors
///
/// See [`parse_obj_document`].
///
/// # Example
///
/// ```
/// use mesh_io::parse_obj;
///
/// let text = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";
/// let soup = parse_obj(text).unwrap();
/// assert_eq!(soup.triangle_count(), 2);
/// ```
pub fn parse_obj(bytes: &[u8]) -> IoResult<TriangleSoup> {
    let doc = parse_obj_document(bytes)?;
    debug!(
        groups = doc.groups.len(),
        triangles = doc.triangle_count(),
        "Parsed OBJ"
    );
    doc.to_soup()
}
