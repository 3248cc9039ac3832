//! Printed weight and price estimation.
//!
//! Turns a part's enclosed volume and surface area into the weight of
//! filament needed and what it costs, given a handful of slicer-like
//! settings ([`PrintParams`]). This is an analytic approximation, not a
//! slicer: no toolpaths, supports or layers are simulated.
//!
//! # Example
//!
//! ```
//! use mesh_measure::measure;
//! use mesh_types::cuboid;
//! use print_estimate::{estimate_for, Material, PrintParams};
//!
//! let metrics = measure(&cuboid(10.0, 10.0, 10.0)).unwrap();
//! let params = PrintParams::for_material(Material::Pla).with_wall_count(0);
//! let est = estimate_for(&metrics, &params);
//!
//! assert_eq!(est.formatted().weight, "0.19");
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod estimate;
mod material;
mod params;

pub use estimate::{estimate, estimate_for, Estimate, FormattedEstimate};
pub use material::{Material, UnknownMaterial};
pub use params::PrintParams;
