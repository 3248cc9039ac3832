//! STL (Stereolithography) decoding.
//!
//! Both variants decode straight into a [`TriangleSoup`]; STL has no shared
//! vertices so there is nothing to expand.
//!
//! # Variant Detection
//!
//! - A buffer whose length is exactly `84 + 50 * n` for its declared count
//!   `n` is binary, even when the header happens to start with `solid`.
//! - A header containing NUL bytes is binary.
//! - Otherwise a buffer starting with `solid` (after whitespace) is ASCII.
//! - Anything else is binary.
//!
//! # Binary Format
//!
//! ```text
//! UINT8[80]    – Header (ignored)
//! UINT32       – Number of triangles
//! foreach triangle
//!     REAL32[3] – Normal vector (ignored)
//!     REAL32[3] – Vertex 1
//!     REAL32[3] – Vertex 2
//!     REAL32[3] – Vertex 3
//!     UINT16    – Attribute byte count
//! end
//! ```
//!
//! # ASCII Format
//!
//! ```text
//! solid name
//!   facet normal ni nj nk
//!     outer loop
//!       vertex v1x v1y v1z
//!       vertex v2x v2y v2z
//!       vertex v3x v3y v3z
//!     endloop
//!   endfacet
//! endsolid name
//! ```

use mesh_types::{Point3, Triangle, TriangleSoup};
use tracing::debug;

use crate::error::{IoError, IoResult};
use crate::MeshFormat;

/// STL binary header size in bytes.
const HEADER_SIZE: usize = 80;

/// Header plus the triangle count.
const PREAMBLE_SIZE: usize = HEADER_SIZE + 4;

/// Size of one triangle in binary STL (normal + 3 vertices + attribute).
const TRIANGLE_SIZE: usize = 50;

/// STL variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StlVariant {
    /// Little-endian binary.
    Binary,
    /// Text.
    Ascii,
}

/// Decide whether `bytes` hold a binary or ASCII STL.
#[must_use]
pub fn detect_variant(bytes: &[u8]) -> StlVariant {
    if let Some(count) = declared_count(bytes) {
        let expected = (count as usize)
            .checked_mul(TRIANGLE_SIZE)
            .and_then(|n| n.checked_add(PREAMBLE_SIZE));
        if expected == Some(bytes.len()) {
            return StlVariant::Binary;
        }
    }

    let header = &bytes[..bytes.len().min(HEADER_SIZE)];
    if header.contains(&0) {
        return StlVariant::Binary;
    }

    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    if bytes[start..].starts_with(b"solid") {
        StlVariant::Ascii
    } else {
        StlVariant::Binary
    }
}

/// Triangle count stored after the 80-byte header, if present.
fn declared_count(bytes: &[u8]) -> Option<u32> {
    let raw = bytes.get(HEADER_SIZE..PREAMBLE_SIZE)?;
    Some(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]]))
}

/// Decode an STL buffer of either variant.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if the buffer is truncated, not valid UTF-8
/// (ASCII), contains an unparsable number, or a facet does not have exactly
/// three vertices.
///
/// # Example
///
/// ```
/// use mesh_io::parse_stl;
///
/// let text = b"solid t
/// facet normal 0 0 1
///  outer loop
///   vertex 0 0 0
///   vertex 1 0 0
///   vertex 0 1 0
///  endloop
/// endfacet
/// endsolid t";
/// let soup = parse_stl(text).unwrap();
/// assert_eq!(soup.triangle_count(), 1);
/// ```
pub fn parse_stl(bytes: &[u8]) -> IoResult<TriangleSoup> {
    let variant = detect_variant(bytes);
    debug!(?variant, bytes = bytes.len(), "Decoding STL");
    match variant {
        StlVariant::Binary => parse_binary(bytes),
        StlVariant::Ascii => parse_ascii(bytes),
    }
}

fn parse_binary(bytes: &[u8]) -> IoResult<TriangleSoup> {
    let count = declared_count(bytes).ok_or_else(|| {
        IoError::parse(
            MeshFormat::Stl,
            format!(
                "binary file too small: expected at least {PREAMBLE_SIZE} bytes, got {}",
                bytes.len()
            ),
        )
    })?;

    let body = &bytes[PREAMBLE_SIZE..];
    let available = body.len() / TRIANGLE_SIZE;
    if (count as usize) > available {
        return Err(IoError::parse(
            MeshFormat::Stl,
            format!("declared {count} triangles but data holds only {available}"),
        ));
    }

    let mut soup = TriangleSoup::with_capacity(count as usize);
    for record in body.chunks_exact(TRIANGLE_SIZE).take(count as usize) {
        // Skip the normal (12 bytes), then three vertices
        soup.push(Triangle::new(
            read_point(&record[12..24]),
            read_point(&record[24..36]),
            read_point(&record[36..48]),
        ));
    }

    if body.len() > count as usize * TRIANGLE_SIZE {
        debug!(
            trailing = body.len() - count as usize * TRIANGLE_SIZE,
            "Ignoring trailing bytes after STL triangles"
        );
    }

    Ok(soup)
}

/// Read a point from 12 bytes (3 little-endian f32s).
fn read_point(buf: &[u8]) -> Point3<f64> {
    let x = f32::from_le_bytes([buf[0], buf[1], buf[2], buf[3]]);
    let y = f32::from_le_bytes([buf[4], buf[5], buf[6], buf[7]]);
    let z = f32::from_le_bytes([buf[8], buf[9], buf[10], buf[11]]);
    Point3::new(f64::from(x), f64::from(y), f64::from(z))
}

fn parse_ascii(bytes: &[u8]) -> IoResult<TriangleSoup> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| IoError::parse(MeshFormat::Stl, format!("ASCII file is not UTF-8: {e}")))?;

    let mut soup = TriangleSoup::new();
    let mut in_facet = false;
    let mut in_loop = false;
    let mut corners: Vec<Point3<f64>> = Vec::with_capacity(3);

    for (line_idx, line) in text.lines().enumerate() {
        let line_no = line_idx + 1;
        let mut parts = line.split_whitespace();
        let Some(keyword) = parts.next() else {
            continue;
        };

        match keyword.to_ascii_lowercase().as_str() {
            "facet" => {
                in_facet = true;
                corners.clear();
            }
            "outer" => {
                in_loop = true;
            }
            "vertex" => {
                if !in_loop {
                    return Err(IoError::parse(
                        MeshFormat::Stl,
                        format!("line {line_no}: vertex outside of a loop"),
                    ));
                }
                let mut coords = [0.0_f64; 3];
                for coord in &mut coords {
                    let token = parts.next().ok_or_else(|| {
                        IoError::parse(
                            MeshFormat::Stl,
                            format!("line {line_no}: vertex needs three coordinates"),
                        )
                    })?;
                    *coord = token.parse().map_err(|_| {
                        IoError::parse(
                            MeshFormat::Stl,
                            format!("line {line_no}: invalid number '{token}'"),
                        )
                    })?;
                }
                corners.push(Point3::new(coords[0], coords[1], coords[2]));
            }
            "endloop" => {
                in_loop = false;
            }
            "endfacet" => {
                if !in_facet {
                    continue;
                }
                if corners.len() != 3 {
                    return Err(IoError::parse(
                        MeshFormat::Stl,
                        format!(
                            "line {line_no}: facet has {} vertices, expected 3",
                            corners.len()
                        ),
                    ));
                }
                soup.push(Triangle::new(corners[0], corners[1], corners[2]));
                corners.clear();
                in_facet = false;
            }
            _ => {
                // solid/endsolid and anything unknown
            }
        }
    }

    if in_facet {
        return Err(IoError::parse(
            MeshFormat::Stl,
            format!("file ends inside a facet ({} vertices read)", corners.len()),
        ));
    }

    Ok(soup)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn binary_stl(header: &[u8], triangles: &[[[f32; 3]; 3]]) -> Vec<u8> {
        let mut bytes = vec![b' '; HEADER_SIZE];
        bytes[..header.len()].copy_from_slice(header);
        #[allow(clippy::cast_possible_truncation)]
        bytes.extend_from_slice(&(triangles.len() as u32).to_le_bytes());
        for tri in triangles {
            bytes.extend_from_slice(&[0u8; 12]);
            for corner in tri {
                for c in corner {
                    bytes.extend_from_slice(&c.to_le_bytes());
                }
            }
            bytes.extend_from_slice(&[0u8; 2]);
        }
        bytes
    }

    const ONE: [[f32; 3]; 3] = [[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]];

    #[test]
    fn binary_single_triangle() {
        let bytes = binary_stl(b"test", &[ONE]);
        assert_eq!(bytes.len(), 134);
        let soup = parse_stl(&bytes).unwrap();
        assert_eq!(soup.triangle_count(), 1);
        let tri = soup.triangle(0).unwrap();
        assert_relative_eq!(tri.v1.x, 1.0);
        assert_relative_eq!(tri.v2.y, 1.0);
    }

    #[test]
    fn binary_with_solid_header_is_binary() {
        let bytes = binary_stl(b"solid exported by some CAD tool", &[ONE, ONE]);
        assert_eq!(detect_variant(&bytes), StlVariant::Binary);
        assert_eq!(parse_stl(&bytes).unwrap().triangle_count(), 2);
    }

    #[test]
    fn binary_zero_triangles() {
        let bytes = binary_stl(b"", &[]);
        assert!(parse_stl(&bytes).unwrap().is_empty());
    }

    #[test]
    fn binary_too_short() {
        let err = parse_stl(&[0u8; 40]).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn binary_count_exceeds_data() {
        let mut bytes = binary_stl(b"", &[ONE]);
        bytes[HEADER_SIZE..PREAMBLE_SIZE].copy_from_slice(&5u32.to_le_bytes());
        let err = parse_stl(&bytes).unwrap_err();
        assert!(err.to_string().contains("declared 5 triangles"));
    }

    #[test]
    fn ascii_parsing() {
        let text = "  solid cube\n\
            facet normal 0 0 -1\n\
              outer loop\n\
                vertex 0 0 0\n\
                vertex 1 1 0\n\
                vertex 1 0 0\n\
              endloop\n\
            endfacet\n\
            FACET NORMAL 0 0 1\n\
              OUTER LOOP\n\
                VERTEX 0 0 1\n\
                VERTEX 1 0 1\n\
                VERTEX 1 1 1.5e0\n\
              ENDLOOP\n\
            ENDFACET\n\
            endsolid cube\n";
        assert_eq!(detect_variant(text.as_bytes()), StlVariant::Ascii);
        let soup = parse_stl(text.as_bytes()).unwrap();
        assert_eq!(soup.triangle_count(), 2);
        assert_relative_eq!(soup.triangle(1).unwrap().v2.z, 1.5);
    }

    #[test]
    fn ascii_multiple_solids() {
        let solid = "solid a\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\nendloop\nendfacet\nendsolid a\n";
        let text = format!("{solid}{solid}");
        assert_eq!(parse_stl(text.as_bytes()).unwrap().triangle_count(), 2);
    }

    #[test]
    fn ascii_bad_number() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 zero 0\n";
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("line 4"));
        assert!(err.to_string().contains("zero"));
    }

    #[test]
    fn ascii_facet_with_two_vertices() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nendloop\nendfacet\nendsolid t\n";
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(err.to_string().contains("facet has 2 vertices"));
    }

    #[test]
    fn ascii_truncated_facet() {
        let text = "solid t\nfacet normal 0 0 1\nouter loop\nvertex 0 0 0\nvertex 1 0 0\nvertex 0 1 0\n";
        let err = parse_stl(text.as_bytes()).unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("ends inside a facet"));
    }

    #[test]
    fn ascii_invalid_utf8() {
        let mut bytes = b"solid t\nfacet normal 0 0 1\n".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe, b'\n']);
        let err = parse_stl(&bytes).unwrap_err();
        assert!(err.is_parse());
    }

    #[test]
    fn empty_buffer_is_binary_and_fails() {
        assert_eq!(detect_variant(&[]), StlVariant::Binary);
        assert!(parse_stl(&[]).is_err());
    }
}
