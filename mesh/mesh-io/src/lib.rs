//! Mesh file loading for Price3D.
//!
//! This crate decodes raw file bytes into a [`TriangleSoup`], the flat
//! triangle list every metric is computed on:
//!
//! - **STL** (Stereolithography) - Binary and ASCII
//! - **OBJ** (Wavefront) - Shared vertex table, groups, polygons
//! - **3MF** (3D Manufacturing Format) - ZIP-packaged XML with build items
//!
//! Multi-object OBJ and 3MF files are merged into one soup.
//!
//! # Example
//!
//! ```
//! use mesh_io::{load, MeshFormat};
//!
//! let obj = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";
//! let soup = load(obj, MeshFormat::Obj).unwrap();
//! assert_eq!(soup.triangle_count(), 1);
//! ```
//!
//! # Format Detection
//!
//! The format comes from the file name extension, case-insensitively:
//!
//! ```
//! use mesh_io::load_named;
//!
//! let err = load_named(b"ISO-10303-21;", "bracket.step").unwrap_err();
//! assert!(err.is_unsupported_format());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod error;
mod format;
mod obj;
mod stl;
mod threemf;

pub use error::{IoError, IoResult};
pub use format::MeshFormat;
pub use obj::{parse_obj, parse_obj_document, ObjDocument, ObjGroup};
pub use stl::{detect_variant, parse_stl, StlVariant};
pub use threemf::{parse_3mf, unit_scale};

use std::path::Path;

use mesh_types::{MeshBounds, TriangleSoup};
use tracing::{debug, info, warn};

/// Largest extent below which a loaded part probably uses the wrong units.
const TINY_EXTENT_MM: f64 = 0.1;

/// Decode `bytes` as `format`.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if the bytes are malformed for `format`.
pub fn load(bytes: &[u8], format: MeshFormat) -> IoResult<TriangleSoup> {
    debug!(%format, bytes = bytes.len(), "Loading mesh");

    let soup = match format {
        MeshFormat::Stl => parse_stl(bytes)?,
        MeshFormat::Obj => parse_obj(bytes)?,
        MeshFormat::ThreeMf => parse_3mf(bytes)?,
    };

    if soup.is_empty() {
        warn!(%format, "Mesh has no triangles");
        return Ok(soup);
    }

    let bounds = soup.bounds();
    let size = bounds.size();
    info!(%format, triangles = soup.triangle_count(), "Loaded mesh");
    debug!(
        "Bounding box: [{:.1}, {:.1}, {:.1}] to [{:.1}, {:.1}, {:.1}]",
        bounds.min.x, bounds.min.y, bounds.min.z, bounds.max.x, bounds.max.y, bounds.max.z
    );

    let max_dim = size.x.max(size.y).max(size.z);
    if max_dim < TINY_EXTENT_MM {
        warn!("Mesh largest dimension is {:.6} mm - may need scaling", max_dim);
    }

    Ok(soup)
}

/// Decode `bytes`, picking the format from `file_name`'s extension.
///
/// # Errors
///
/// Returns [`IoError::UnsupportedFormat`] if the extension is not `stl`,
/// `obj` or `3mf`, or [`IoError::Parse`] if the bytes are malformed.
pub fn load_named(bytes: &[u8], file_name: &str) -> IoResult<TriangleSoup> {
    let path = Path::new(file_name);
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| IoError::unsupported(format::extension_of(path)))?;
    load(bytes, format)
}

/// Read a file from disk and decode it.
///
/// # Errors
///
/// Returns [`IoError::FileNotFound`] if the path does not exist,
/// [`IoError::Io`] on other read failures, and otherwise the errors of
/// [`load_named`].
///
/// # Example
///
/// ```no_run
/// use mesh_io::load_file;
///
/// let soup = load_file("bracket.3mf").unwrap();
/// println!("Loaded {} triangles", soup.triangle_count());
/// ```
pub fn load_file<P: AsRef<Path>>(path: P) -> IoResult<TriangleSoup> {
    let path = path.as_ref();
    let format = MeshFormat::from_path(path)
        .ok_or_else(|| IoError::unsupported(format::extension_of(path)))?;

    info!("Loading mesh from {:?} (format: {})", path, format);
    let bytes = std::fs::read(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            IoError::FileNotFound {
                path: path.to_path_buf(),
            }
        } else {
            IoError::Io(e)
        }
    })?;

    load(&bytes, format)
}
