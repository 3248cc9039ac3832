//! Software rasterizer for isometric previews.
//!
//! The camera sits on the `(1, 1, 1)` diagonal of the bounding box center,
//! looks at the center with `+Z` up, and uses an orthographic projection
//! sized so the bounding sphere fits the viewport. Triangles are flat
//! shaded from both sides with one ambient and one directional light and
//! resolved with a depth buffer. Uncovered pixels stay fully transparent.

use image::{Rgba, RgbaImage};
use mesh_types::{MeshBounds, Point3, TriangleSoup, Vector3};
use tracing::debug;

use crate::error::{PreviewError, PreviewResult};
use crate::PreviewOptions;

/// Orthographic camera looking down the isometric diagonal.
#[derive(Debug, Clone)]
struct IsoCamera {
    center: Point3<f64>,
    right: Vector3<f64>,
    up: Vector3<f64>,
    forward: Vector3<f64>,
    /// Pixels per millimeter.
    scale: f64,
    half_width: f64,
    half_height: f64,
}

impl IsoCamera {
    fn frame(center: Point3<f64>, radius: f64, width: u32, height: u32) -> Self {
        let forward = -Vector3::new(1.0, 1.0, 1.0).normalize();
        let right = forward.cross(&Vector3::z()).normalize();
        let up = right.cross(&forward);
        let (w, h) = (f64::from(width), f64::from(height));
        Self {
            center,
            right,
            up,
            forward,
            scale: w.min(h) / (2.0 * radius),
            half_width: w / 2.0,
            half_height: h / 2.0,
        }
    }

    /// Screen position in pixels (y down) and view depth (larger is farther).
    fn project(&self, p: &Point3<f64>) -> (f64, f64, f64) {
        let d = p - self.center;
        (
            self.half_width + d.dot(&self.right) * self.scale,
            self.half_height - d.dot(&self.up) * self.scale,
            d.dot(&self.forward),
        )
    }
}

/// Render a flat-shaded isometric preview of `soup`.
///
/// # Errors
///
/// Returns [`PreviewError::InvalidSize`] for a zero-sized image,
/// [`PreviewError::EmptyMesh`] for a mesh without triangles, and
/// [`PreviewError::DegenerateBounds`] if the mesh has no extent.
///
/// # Example
///
/// ```
/// use mesh_preview::{render_preview, PreviewOptions};
/// use mesh_types::{cuboid, TriangleSource};
///
/// let soup = cuboid(10.0, 10.0, 10.0).to_soup().unwrap();
/// let image = render_preview(&soup, &PreviewOptions::thumbnail()).unwrap();
///
/// assert_eq!(image.dimensions(), (128, 128));
/// // The cube covers the center, the corners stay transparent
/// assert_eq!(image.get_pixel(64, 64)[3], 255);
/// assert_eq!(image.get_pixel(0, 0)[3], 0);
/// ```
pub fn render_preview(soup: &TriangleSoup, options: &PreviewOptions) -> PreviewResult<RgbaImage> {
    let (width, height) = (options.width, options.height);
    if width == 0 || height == 0 {
        return Err(PreviewError::InvalidSize { width, height });
    }
    if soup.is_empty() {
        return Err(PreviewError::EmptyMesh);
    }

    let bounds = soup.bounds();
    let diagonal = bounds.diagonal();
    if !(diagonal.is_finite() && diagonal > 0.0) {
        return Err(PreviewError::DegenerateBounds { diagonal });
    }

    let camera = IsoCamera::frame(bounds.center(), diagonal / 2.0, width, height);
    let light = options.light_direction.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::z);
    let to_camera = -camera.forward;

    let mut image = RgbaImage::new(width, height);
    let mut depth = vec![f64::INFINITY; width as usize * height as usize];
    let mut drawn = 0usize;

    for tri in soup.triangles() {
        let Some(mut normal) = tri.normal() else {
            continue;
        };
        if normal.dot(&to_camera) < 0.0 {
            normal = -normal;
        }
        let shade = (options.ambient + options.light_intensity * normal.dot(&light).max(0.0))
            .clamp(0.0, 1.0);
        let color = shaded(options.color, shade);

        let corners = [
            camera.project(&tri.v0),
            camera.project(&tri.v1),
            camera.project(&tri.v2),
        ];
        if rasterize(&corners, color, &mut image, &mut depth) {
            drawn += 1;
        }
    }

    debug!(
        width,
        height,
        triangles = soup.triangle_count(),
        drawn,
        "Rendered preview"
    );
    Ok(image)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn shaded(color: [u8; 3], shade: f64) -> Rgba<u8> {
    let channel = |c: u8| (f64::from(c) * shade).round().clamp(0.0, 255.0) as u8;
    Rgba([channel(color[0]), channel(color[1]), channel(color[2]), 255])
}

/// Fill one projected triangle, sampling at pixel centers.
///
/// Returns whether any pixel passed the depth test.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn rasterize(
    corners: &[(f64, f64, f64); 3],
    color: Rgba<u8>,
    image: &mut RgbaImage,
    depth: &mut [f64],
) -> bool {
    let [(x0, y0, z0), (x1, y1, z1), (x2, y2, z2)] = *corners;
    let area = edge(x0, y0, x1, y1, x2, y2);
    if area.abs() < f64::EPSILON {
        return false;
    }

    let (width, height) = image.dimensions();
    let min_x = x0.min(x1).min(x2).floor().max(0.0) as u32;
    let min_y = y0.min(y1).min(y2).floor().max(0.0) as u32;
    let max_x = (x0.max(x1).max(x2).ceil().min(f64::from(width) - 1.0)).max(0.0) as u32;
    let max_y = (y0.max(y1).max(y2).ceil().min(f64::from(height) - 1.0)).max(0.0) as u32;

    let mut any = false;
    for py in min_y..=max_y {
        for px in min_x..=max_x {
            let (sx, sy) = (f64::from(px) + 0.5, f64::from(py) + 0.5);
            let w0 = edge(x1, y1, x2, y2, sx, sy) / area;
            let w1 = edge(x2, y2, x0, y0, sx, sy) / area;
            let w2 = edge(x0, y0, x1, y1, sx, sy) / area;
            if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                continue;
            }

            let z = w0 * z0 + w1 * z1 + w2 * z2;
            let idx = py as usize * width as usize + px as usize;
            if z < depth[idx] {
                depth[idx] = z;
                image.put_pixel(px, py, color);
                any = true;
            }
        }
    }
    any
}

/// Twice the signed area of `(a, b, p)`.
fn edge(ax: f64, ay: f64, bx: f64, by: f64, px: f64, py: f64) -> f64 {
    (bx - ax) * (py - ay) - (by - ay) * (px - ax)
}
