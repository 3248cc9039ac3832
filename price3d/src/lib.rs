//! Material weight and cost estimates for 3D-printable parts.
//!
//! This umbrella crate re-exports the mesh and print crates behind one
//! import and adds the report rows printed by the `price3d` binary.
//!
//! # Quick Start
//!
//! ```no_run
//! use price3d::prelude::*;
//!
//! let soup = load_file("bracket.stl").unwrap();
//! let metrics = compute_metrics(&soup);
//! let est = estimate_for(&metrics, &PrintParams::for_material(Material::Petg));
//!
//! println!("{} g, {}", est.formatted().weight, est.formatted().price);
//! ```
//!
//! # Module Organization
//!
//! - [`types`] - Triangle soups, indexed meshes, bounds
//! - [`io`] - STL, OBJ and 3MF loaders
//! - [`measure`] - Volume, surface area, dimensions, display formatting
//! - [`preview`] - Isometric PNG thumbnails
//! - [`estimate`] - Print parameters, materials, weight and price
//! - [`job`] - Entries, edits, background loading and the job board
//! - [`report`] - Table and JSON rows for a job board

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

pub mod report;

// =============================================================================
// Re-exports
// =============================================================================

/// Triangle soups, indexed meshes and bounds.
pub use mesh_types as types;

/// STL, OBJ and 3MF loaders.
pub use mesh_io as io;

/// Volume, surface area, dimensions and display formatting.
pub use mesh_measure as measure;

/// Isometric PNG thumbnails.
pub use mesh_preview as preview;

/// Print parameters, materials, weight and price.
pub use print_estimate as estimate;

/// Entries, edits, background loading and the job board.
pub use print_job as job;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for estimating parts.
///
/// ```
/// use price3d::prelude::*;
/// ```
pub mod prelude {
    // Geometry
    pub use mesh_types::{cuboid, IndexedMesh, TriangleSoup, TriangleSource};

    // I/O
    pub use mesh_io::{load_file, load_named, MeshFormat};

    // Measurement
    pub use mesh_measure::{compute_metrics, measure, MeshMetrics};

    // Estimation
    pub use print_estimate::{estimate_for, Estimate, Material, PrintParams};

    // Jobs
    pub use print_job::{BackgroundLoader, FieldChange, JobBoard, LoaderConfig};

    pub use crate::report::{render_table, ReportRow};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prelude_imports() {
        use prelude::*;

        let metrics = measure(&cuboid(10.0, 10.0, 10.0)).unwrap();
        let est = estimate_for(&metrics, &PrintParams::default());
        assert_eq!(est.formatted().weight, "0.69");
    }

    #[test]
    fn test_module_reexports() {
        let _ = types::TriangleSoup::new();
        let _ = estimate::PrintParams::default();
        let _ = preview::PreviewOptions::thumbnail();
        let _ = job::JobBoard::new();
        assert_eq!(io::MeshFormat::ALL.len(), 3);
    }
}
