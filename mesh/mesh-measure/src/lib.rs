//! Geometric metrics for triangulated parts.
//!
//! This crate measures what the estimator needs from a mesh:
//!
//! - **Volume**: enclosed volume from a signed-tetrahedron sum
//! - **Surface area**: sum of triangle areas
//! - **Dimensions**: axis-aligned extents of the part
//!
//! Metrics are always computed on a flat [`TriangleSoup`](mesh_types::TriangleSoup);
//! [`measure`] expands indexed meshes first.
//!
//! # Example
//!
//! ```
//! use mesh_types::cuboid;
//! use mesh_measure::measure;
//!
//! let metrics = measure(&cuboid(10.0, 10.0, 10.0)).unwrap();
//! let shown = metrics.formatted();
//!
//! assert_eq!(shown.volume, "1000.00");
//! assert_eq!(shown.surface_area, "600.00");
//! ```
//!
//! # Limitations
//!
//! The absolute value of the signed sum assumes one dominant, consistent
//! winding. Open meshes, mixed shells and self-intersections produce a
//! number but not a meaningful volume.
//!
//! # Coordinate System
//!
//! Uses a **right-handed coordinate system** in millimeters:
//! - X: width (left/right)
//! - Y: depth (front/back)
//! - Z: height (up/down)

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod dimensions;
mod error;
mod format;
mod metrics;

pub use dimensions::{dimensions, Dimensions};
pub use error::{MeasureError, MeasureResult};
pub use format::{format_fixed, format_grouped, group_thousands, FormattedMetrics};
pub use metrics::{
    compute_metrics, measure, signed_tetrahedron_volume, triangle_area, MeshMetrics,
};
