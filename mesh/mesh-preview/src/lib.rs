//! Isometric preview thumbnails.
//!
//! Renders a [`TriangleSoup`](mesh_types::TriangleSoup) from a fixed
//! isometric angle into an RGBA image with a transparent background, then
//! encodes it as PNG bytes or a `data:` URL.
//!
//! Previews are cosmetic. A failed render must never block the volume,
//! weight or price of a part.
//!
//! # Example
//!
//! ```
//! use mesh_preview::{encode_png, render_preview, to_data_url, PreviewOptions};
//! use mesh_types::{cuboid, TriangleSource};
//!
//! let soup = cuboid(20.0, 10.0, 5.0).to_soup().unwrap();
//! let image = render_preview(&soup, &PreviewOptions::thumbnail()).unwrap();
//! let png = encode_png(&image).unwrap();
//!
//! assert!(to_data_url(&png).starts_with("data:image/png;base64,"));
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod encode;
mod error;
mod options;
mod render;

pub use encode::{encode_png, render_png, to_data_url};
pub use error::{PreviewError, PreviewResult};
pub use options::PreviewOptions;
pub use render::render_preview;
