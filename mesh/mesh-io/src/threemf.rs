//! 3MF (3D Manufacturing Format) decoding.
//!
//! A 3MF file is a ZIP package. The model part (usually
//! `3D/3dmodel.model`) is an XML document listing mesh objects under
//! `<resources>` and the objects to print under `<build>`.
//!
//! # Supported Features
//!
//! - Mesh objects (vertices and triangles)
//! - Component objects referencing other objects, with transforms
//! - Build items with transforms; mirrored transforms keep outward winding
//! - Model units, converted to millimeters
//!
//! Materials, colors, textures and extensions are ignored.

use std::io::{Cursor, Read};

use hashbrown::HashMap;
use mesh_types::{IndexedMesh, Point3, TriangleSoup, TriangleSource};
use nalgebra::Matrix4;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use tracing::{debug, warn};
use zip::ZipArchive;

use crate::error::{IoError, IoResult};
use crate::MeshFormat;

/// Components nested deeper than this are treated as a reference cycle.
const MAX_COMPONENT_DEPTH: usize = 16;

/// Conventional model part locations, tried when `_rels/.rels` does not name one.
const MODEL_PATHS: [&str; 3] = ["3D/3dmodel.model", "3d/3dmodel.model", "3D/3DModel.model"];

/// Millimeters per model unit.
///
/// Returns `None` for an unknown unit name.
#[must_use]
pub fn unit_scale(unit: &str) -> Option<f64> {
    match unit {
        "micron" => Some(0.001),
        "millimeter" => Some(1.0),
        "centimeter" => Some(10.0),
        "inch" => Some(25.4),
        "foot" => Some(304.8),
        "meter" => Some(1000.0),
        _ => None,
    }
}

/// Decode a 3MF package into a flat triangle list in millimeters.
///
/// # Errors
///
/// Returns [`IoError::Parse`] if the bytes are not a ZIP archive, no model
/// part exists, the XML is malformed, a number does not parse, a triangle
/// index is out of range, or a build item or component references an
/// unknown object or forms a cycle.
pub fn parse_3mf(bytes: &[u8]) -> IoResult<TriangleSoup> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| threemf_error(format!("not a ZIP archive: {e}")))?;

    let model_path = locate_model(&mut archive)?;
    debug!(part = %model_path, "Reading 3MF model part");

    let mut content = String::new();
    archive
        .by_name(&model_path)
        .map_err(|e| threemf_error(format!("failed to open {model_path}: {e}")))?
        .read_to_string(&mut content)
        .map_err(|e| threemf_error(format!("failed to read {model_path}: {e}")))?;

    let model = parse_model(&content)?;
    model.flatten()
}

/// Find the model part: the `3dmodel` relationship target, then the
/// conventional paths, then any `*.model` entry.
fn locate_model<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>) -> IoResult<String> {
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();

    if names.iter().any(|n| n == "_rels/.rels") {
        let mut rels = String::new();
        archive
            .by_name("_rels/.rels")
            .map_err(|e| threemf_error(format!("failed to open _rels/.rels: {e}")))?
            .read_to_string(&mut rels)
            .map_err(|e| threemf_error(format!("failed to read _rels/.rels: {e}")))?;

        if let Some(target) = model_relationship_target(&rels)? {
            if names.iter().any(|n| *n == target) {
                return Ok(target);
            }
            warn!(target = %target, "3MF relationship points to a missing part");
        }
    }

    if let Some(path) = MODEL_PATHS
        .iter()
        .find(|p| names.iter().any(|n| n == *p))
    {
        return Ok((*path).to_string());
    }

    names
        .into_iter()
        .find(|n| {
            std::path::Path::new(n)
                .extension()
                .is_some_and(|ext| ext.eq_ignore_ascii_case("model"))
        })
        .ok_or_else(|| threemf_error("archive does not contain a model part"))
}

/// Target of the relationship whose type ends in `3dmodel`, without the
/// leading slash.
fn model_relationship_target(rels: &str) -> IoResult<Option<String>> {
    let mut reader = Reader::from_str(rels);
    reader.config_mut().trim_text(true);

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e) | Event::Empty(ref e))
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let kind = attribute(e, b"Type")?;
                let target = attribute(e, b"Target")?;
                if let (Some(kind), Some(target)) = (kind, target) {
                    if kind.ends_with("3dmodel") {
                        return Ok(Some(target.trim_start_matches('/').to_string()));
                    }
                }
            }
            Ok(Event::Eof) => return Ok(None),
            Err(e) => return Err(threemf_error(format!("malformed _rels/.rels: {e}"))),
            _ => {}
        }
    }
}

/// One reference from a component or build item to an object.
#[derive(Debug, Clone)]
struct ObjectRef {
    object_id: String,
    transform: Matrix4<f64>,
}

/// A `<resources>` object: either a mesh or a list of components.
#[derive(Debug, Clone, Default)]
struct Object {
    vertices: Vec<Point3<f64>>,
    triangles: Vec<[u32; 3]>,
    components: Vec<ObjectRef>,
}

/// The parsed model part.
#[derive(Debug, Default)]
struct Model {
    unit: Option<String>,
    objects: HashMap<String, Object>,
    /// Object ids in declaration order.
    order: Vec<String>,
    build: Vec<ObjectRef>,
}

impl Model {
    /// Emit the printable geometry as one soup in millimeters.
    fn flatten(&self) -> IoResult<TriangleSoup> {
        let mut soup = TriangleSoup::new();

        if self.build.is_empty() {
            debug!(objects = self.order.len(), "3MF has no build items; using every mesh object");
            for id in &self.order {
                if let Some(object) = self.objects.get(id) {
                    if !object.triangles.is_empty() {
                        soup.append(&object_soup(id, object)?);
                    }
                }
            }
        } else {
            for item in &self.build {
                self.emit(&item.object_id, &item.transform, 0, &mut soup)?;
            }
        }

        let unit = self.unit.as_deref().unwrap_or("millimeter");
        let scale = unit_scale(unit).unwrap_or_else(|| {
            warn!(unit, "Unknown 3MF unit; assuming millimeters");
            1.0
        });
        if (scale - 1.0).abs() > f64::EPSILON {
            soup.scale(scale);
        }

        Ok(soup)
    }

    fn emit(
        &self,
        id: &str,
        transform: &Matrix4<f64>,
        depth: usize,
        out: &mut TriangleSoup,
    ) -> IoResult<()> {
        if depth > MAX_COMPONENT_DEPTH {
            return Err(threemf_error(format!(
                "component nesting deeper than {MAX_COMPONENT_DEPTH} at object {id} (cycle?)"
            )));
        }
        let object = self
            .objects
            .get(id)
            .ok_or_else(|| threemf_error(format!("reference to unknown object {id}")))?;

        if !object.triangles.is_empty() {
            let mut part = object_soup(id, object)?;
            part.transform(transform);
            out.append(&part);
        }
        for component in &object.components {
            let world = transform * component.transform;
            self.emit(&component.object_id, &world, depth + 1, out)?;
        }
        Ok(())
    }
}

fn object_soup(id: &str, object: &Object) -> IoResult<TriangleSoup> {
    IndexedMesh::from_parts(object.vertices.clone(), object.triangles.clone())
        .to_soup()
        .map_err(|e| threemf_error(format!("object {id}: {e}")))
}

/// Streaming state while reading the model XML.
#[derive(Default)]
struct ModelParser {
    model: Model,
    current: Option<(String, Object)>,
    in_build: bool,
}

impl ModelParser {
    fn open(&mut self, e: &BytesStart<'_>) -> IoResult<()> {
        match e.local_name().as_ref() {
            b"model" => {
                self.model.unit = attribute(e, b"unit")?;
            }
            b"object" => {
                let id = attribute(e, b"id")?
                    .ok_or_else(|| threemf_error("object without an id"))?;
                self.current = Some((id, Object::default()));
            }
            b"vertex" => {
                if let Some((_, object)) = self.current.as_mut() {
                    object.vertices.push(Point3::new(
                        number(e, b"x")?,
                        number(e, b"y")?,
                        number(e, b"z")?,
                    ));
                }
            }
            b"triangle" => {
                if let Some((_, object)) = self.current.as_mut() {
                    object
                        .triangles
                        .push([index(e, b"v1")?, index(e, b"v2")?, index(e, b"v3")?]);
                }
            }
            b"component" => {
                let reference = object_ref(e)?;
                if let Some((_, object)) = self.current.as_mut() {
                    object.components.push(reference);
                }
            }
            b"build" => self.in_build = true,
            b"item" if self.in_build => {
                self.model.build.push(object_ref(e)?);
            }
            _ => {}
        }
        Ok(())
    }

    fn close(&mut self, local_name: &[u8]) {
        match local_name {
            b"object" => {
                if let Some((id, object)) = self.current.take() {
                    if self.model.objects.insert(id.clone(), object).is_some() {
                        warn!(object = %id, "Duplicate 3MF object id; keeping the last");
                    } else {
                        self.model.order.push(id);
                    }
                }
            }
            b"build" => self.in_build = false,
            _ => {}
        }
    }
}

fn parse_model(content: &str) -> IoResult<Model> {
    let mut reader = Reader::from_str(content);
    reader.config_mut().trim_text(true);

    let mut parser = ModelParser::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => parser.open(e)?,
            Ok(Event::Empty(ref e)) => {
                parser.open(e)?;
                parser.close(e.local_name().as_ref());
            }
            Ok(Event::End(ref e)) => parser.close(e.local_name().as_ref()),
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(threemf_error(format!(
                    "XML parse error at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
            _ => {}
        }
    }

    debug!(
        objects = parser.model.objects.len(),
        build_items = parser.model.build.len(),
        unit = parser.model.unit.as_deref().unwrap_or("millimeter"),
        "Parsed 3MF model"
    );
    Ok(parser.model)
}

/// Read an attribute by local name as an owned string.
fn attribute(element: &BytesStart<'_>, name: &[u8]) -> IoResult<Option<String>> {
    for attr in element.attributes() {
        let attr = attr.map_err(|e| threemf_error(format!("malformed attribute: {e}")))?;
        if attr.key.local_name().as_ref() == name {
            let value = std::str::from_utf8(&attr.value)
                .map_err(|e| threemf_error(format!("invalid UTF-8 in attribute: {e}")))?;
            return Ok(Some(value.to_string()));
        }
    }
    Ok(None)
}

fn required(element: &BytesStart<'_>, name: &[u8]) -> IoResult<String> {
    attribute(element, name)?.ok_or_else(|| {
        threemf_error(format!(
            "<{}> is missing attribute '{}'",
            String::from_utf8_lossy(element.local_name().as_ref()),
            String::from_utf8_lossy(name)
        ))
    })
}

fn number(element: &BytesStart<'_>, name: &[u8]) -> IoResult<f64> {
    let value = required(element, name)?;
    value.trim().parse().map_err(|_| {
        threemf_error(format!(
            "invalid {} coordinate '{value}'",
            String::from_utf8_lossy(name)
        ))
    })
}

fn index(element: &BytesStart<'_>, name: &[u8]) -> IoResult<u32> {
    let value = required(element, name)?;
    value.trim().parse().map_err(|_| {
        threemf_error(format!(
            "invalid {} index '{value}'",
            String::from_utf8_lossy(name)
        ))
    })
}

fn object_ref(element: &BytesStart<'_>) -> IoResult<ObjectRef> {
    let object_id = required(element, b"objectid")?;
    let transform = match attribute(element, b"transform")? {
        Some(text) => parse_transform(&text)?,
        None => Matrix4::identity(),
    };
    Ok(ObjectRef {
        object_id,
        transform,
    })
}

/// Parse a 3MF `transform` attribute.
///
/// The twelve values are the row-vector affine matrix
/// `m00 m01 m02 m10 m11 m12 m20 m21 m22 m30 m31 m32`; the result applies to
/// column vectors.
fn parse_transform(text: &str) -> IoResult<Matrix4<f64>> {
    let values = text
        .split_whitespace()
        .map(|t| {
            t.parse::<f64>()
                .map_err(|_| threemf_error(format!("invalid transform value '{t}'")))
        })
        .collect::<IoResult<Vec<_>>>()?;

    let [m00, m01, m02, m10, m11, m12, m20, m21, m22, m30, m31, m32] = values[..] else {
        return Err(threemf_error(format!(
            "transform needs 12 values, got {}",
            values.len()
        )));
    };

    #[rustfmt::skip]
    let matrix = Matrix4::new(
        m00, m10, m20, m30,
        m01, m11, m21, m31,
        m02, m12, m22, m32,
        0.0, 0.0, 0.0, 1.0,
    );
    Ok(matrix)
}

fn threemf_error(message: impl Into<String>) -> IoError {
    IoError::parse(MeshFormat::ThreeMf, message)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::MeshBounds;
    use std::io::Write;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    const RELS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Target="/3D/3dmodel.model" Id="rel0" Type="http://schemas.microsoft.com/3dmanufacturing/2013/01/3dmodel"/>
</Relationships>"#;

    /// A closed unit tetrahedron as a 3MF `<object>`.
    pub(crate) fn tetra_object(id: u32) -> String {
        format!(
            r#"<object id="{id}" type="model"><mesh>
<vertices>
<vertex x="0" y="0" z="0"/><vertex x="1" y="0" z="0"/>
<vertex x="0" y="1" z="0"/><vertex x="0" y="0" z="1"/>
</vertices>
<triangles>
<triangle v1="0" v2="2" v3="1"/><triangle v1="0" v2="1" v3="3"/>
<triangle v1="0" v2="3" v3="2"/><triangle v1="1" v2="2" v3="3"/>
</triangles>
</mesh></object>"#
        )
    }

    pub(crate) fn model_xml(unit: &str, resources: &str, build: &str) -> String {
        format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<model unit="{unit}" xmlns="http://schemas.microsoft.com/3dmanufacturing/core/2015/02">
<resources>{resources}</resources>
<build>{build}</build>
</model>"#
        )
    }

    pub(crate) fn package(entries: &[(&str, &str)]) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);
        for (name, content) in entries {
            zip.start_file(*name, options).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        }
        zip.finish().unwrap().into_inner()
    }

    pub(crate) fn standard_package(model: &str) -> Vec<u8> {
        package(&[("_rels/.rels", RELS), ("3D/3dmodel.model", model)])
    }

    fn signed_volume(soup: &TriangleSoup) -> f64 {
        soup.triangles().map(|t| t.signed_volume()).sum()
    }

    #[test]
    fn single_object_build_item() {
        let xml = model_xml("millimeter", &tetra_object(1), r#"<item objectid="1"/>"#);
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_eq!(soup.triangle_count(), 4);
        assert_relative_eq!(signed_volume(&soup), 1.0 / 6.0, epsilon = 1e-12);
    }

    #[test]
    fn no_build_items_concatenates_objects() {
        let resources = format!("{}{}", tetra_object(1), tetra_object(2));
        let xml = model_xml("millimeter", &resources, "");
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_eq!(soup.triangle_count(), 8);
    }

    #[test]
    fn build_item_transform_translates() {
        let xml = model_xml(
            "millimeter",
            &tetra_object(1),
            r#"<item objectid="1" transform="1 0 0 0 1 0 0 0 1 10 20 30"/>"#,
        );
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        let bounds = soup.bounds();
        assert_relative_eq!(bounds.min.x, 10.0);
        assert_relative_eq!(bounds.min.y, 20.0);
        assert_relative_eq!(bounds.max.z, 31.0);
    }

    #[test]
    fn mirrored_item_keeps_outward_winding() {
        let xml = model_xml(
            "millimeter",
            &tetra_object(1),
            r#"<item objectid="1" transform="-1 0 0 0 1 0 0 0 1 0 0 0"/>"#,
        );
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_relative_eq!(signed_volume(&soup), 1.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(soup.bounds().min.x, -1.0);
    }

    #[test]
    fn components_are_expanded_with_transforms() {
        let resources = format!(
            r#"{}<object id="5" type="model"><components>
<component objectid="1"/>
<component objectid="1" transform="2 0 0 0 2 0 0 0 2 5 0 0"/>
</components></object>"#,
            tetra_object(1)
        );
        let xml = model_xml("millimeter", &resources, r#"<item objectid="5"/>"#);
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_eq!(soup.triangle_count(), 8);
        assert_relative_eq!(signed_volume(&soup), 9.0 / 6.0, epsilon = 1e-12);
        assert_relative_eq!(soup.bounds().max.x, 7.0);
    }

    #[test]
    fn units_scale_to_millimeters() {
        let xml = model_xml("centimeter", &tetra_object(1), r#"<item objectid="1"/>"#);
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_relative_eq!(soup.bounds().max.x, 10.0);

        let xml = model_xml("inch", &tetra_object(1), r#"<item objectid="1"/>"#);
        let soup = parse_3mf(&standard_package(&xml)).unwrap();
        assert_relative_eq!(soup.bounds().max.z, 25.4);
    }

    #[test]
    fn model_found_without_rels() {
        let xml = model_xml("millimeter", &tetra_object(1), "");
        let bytes = package(&[("3D/3dmodel.model", &xml)]);
        assert_eq!(parse_3mf(&bytes).unwrap().triangle_count(), 4);

        let bytes = package(&[("Models/part.model", &xml)]);
        assert_eq!(parse_3mf(&bytes).unwrap().triangle_count(), 4);
    }

    #[test]
    fn rels_target_is_followed() {
        let rels = RELS.replace("/3D/3dmodel.model", "/3D/custom.model");
        let xml = model_xml("millimeter", &tetra_object(1), "");
        let bytes = package(&[
            ("_rels/.rels", &rels),
            ("3D/custom.model", &xml),
            ("3D/3dmodel.model", "<model/>"),
        ]);
        assert_eq!(parse_3mf(&bytes).unwrap().triangle_count(), 4);
    }

    #[test]
    fn not_a_zip() {
        let err = parse_3mf(b"solid not a zip").unwrap_err();
        assert!(err.is_parse());
        assert!(err.to_string().contains("ZIP"));
    }

    #[test]
    fn missing_model_part() {
        let bytes = package(&[("readme.txt", "hello")]);
        let err = parse_3mf(&bytes).unwrap_err();
        assert!(err.to_string().contains("model part"));
    }

    #[test]
    fn malformed_xml() {
        let bytes = standard_package("<model><resources></model>");
        assert!(parse_3mf(&bytes).unwrap_err().is_parse());
    }

    #[test]
    fn bad_coordinate() {
        let xml = model_xml(
            "millimeter",
            r#"<object id="1"><mesh><vertices><vertex x="a" y="0" z="0"/></vertices></mesh></object>"#,
            "",
        );
        let err = parse_3mf(&standard_package(&xml)).unwrap_err();
        assert!(err.to_string().contains("invalid x coordinate 'a'"));
    }

    #[test]
    fn triangle_index_out_of_range() {
        let xml = model_xml(
            "millimeter",
            r#"<object id="1"><mesh><vertices><vertex x="0" y="0" z="0"/></vertices>
<triangles><triangle v1="0" v2="1" v3="2"/></triangles></mesh></object>"#,
            "",
        );
        let err = parse_3mf(&standard_package(&xml)).unwrap_err();
        assert!(err.to_string().contains("object 1"));
    }

    #[test]
    fn unknown_object_reference() {
        let xml = model_xml("millimeter", &tetra_object(1), r#"<item objectid="9"/>"#);
        let err = parse_3mf(&standard_package(&xml)).unwrap_err();
        assert!(err.to_string().contains("unknown object 9"));
    }

    #[test]
    fn component_cycle() {
        let resources = r#"<object id="1"><components><component objectid="2"/></components></object>
<object id="2"><components><component objectid="1"/></components></object>"#;
        let xml = model_xml("millimeter", resources, r#"<item objectid="1"/>"#);
        let err = parse_3mf(&standard_package(&xml)).unwrap_err();
        assert!(err.to_string().contains("cycle"));
    }

    #[test]
    fn transform_layout() {
        let m = parse_transform("1 2 3 4 5 6 7 8 9 10 11 12").unwrap();
        let p = m.transform_point(&Point3::new(1.0, 0.0, 0.0));
        // Row-vector convention: x maps to the first row plus translation
        assert_relative_eq!(p.x, 11.0);
        assert_relative_eq!(p.y, 13.0);
        assert_relative_eq!(p.z, 15.0);
        assert!(parse_transform("1 0 0").is_err());
    }

    #[test]
    fn unit_table() {
        assert_eq!(unit_scale("micron"), Some(0.001));
        assert_eq!(unit_scale("foot"), Some(304.8));
        assert_eq!(unit_scale("parsec"), None);
    }
}
