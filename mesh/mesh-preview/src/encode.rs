//! PNG and data URL output.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::{ImageFormat, RgbaImage};
use mesh_types::TriangleSoup;

use crate::error::PreviewResult;
use crate::{render_preview, PreviewOptions};

/// Encode an image as PNG bytes.
///
/// # Errors
///
/// Returns [`crate::PreviewError::Encode`] if the encoder fails.
pub fn encode_png(image: &RgbaImage) -> PreviewResult<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png)?;
    Ok(buffer.into_inner())
}

/// Render and encode in one step.
///
/// # Errors
///
/// See [`render_preview`] and [`encode_png`].
pub fn render_png(soup: &TriangleSoup, options: &PreviewOptions) -> PreviewResult<Vec<u8>> {
    encode_png(&render_preview(soup, options)?)
}

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
#[must_use]
pub fn to_data_url(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
