//! Core mesh types for Price3D.
//!
//! This crate provides the shared geometry representation used by every
//! stage of the estimation pipeline:
//!
//! - [`TriangleSoup`] - The flat triangle list every metric is computed on
//! - [`IndexedMesh`] - A shared-vertex mesh, as produced by OBJ and 3MF files
//! - [`Triangle`] - A concrete triangle with vertex positions
//! - [`Aabb`] - Axis-aligned bounding box
//!
//! # Flat vs. Indexed
//!
//! Loaders may build an [`IndexedMesh`] while parsing, but the metrics engine
//! only ever sees a [`TriangleSoup`]: every triangle owns independent copies
//! of its three corners. Use [`TriangleSource::to_soup`] to expand; expanding
//! a soup returns it unchanged.
//!
//! # Units
//!
//! All coordinates are `f64` millimeters.
//!
//! # Example
//!
//! ```
//! use mesh_types::{cuboid, TriangleSource};
//!
//! let block = cuboid(10.0, 20.0, 5.0);
//! let soup = block.to_soup().unwrap();
//! assert_eq!(soup.triangle_count(), 12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod bounds;
mod error;
mod mesh;
mod soup;
mod traits;
mod triangle;

pub use bounds::Aabb;
pub use error::{MeshTypesError, MeshTypesResult};
pub use mesh::{cuboid, unit_cube, IndexedMesh};
pub use soup::TriangleSoup;
pub use traits::{MeshBounds, TriangleSource};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
