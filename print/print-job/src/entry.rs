//! Print job entries and the pure recompute step.

use std::fmt;

use mesh_io::IoError;
use mesh_measure::{format_fixed, MeshMetrics};
use print_estimate::{estimate_for, Estimate, PrintParams};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Stable identifier of an entry on a [`crate::JobBoard`].
///
/// Ids are handed out in import order and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntryId(pub u64);

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Why a file could not be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FailureKind {
    /// The extension is not STL, OBJ or 3MF.
    UnsupportedFormat,
    /// The bytes are malformed.
    Parse,
}

/// A failed load, kept on the entry. Failed entries are never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoadFailure {
    /// Failure category.
    pub kind: FailureKind,
    /// Human-readable reason.
    pub message: String,
}

impl From<&IoError> for LoadFailure {
    fn from(err: &IoError) -> Self {
        let kind = if err.is_unsupported_format() {
            FailureKind::UnsupportedFormat
        } else {
            FailureKind::Parse
        };
        Self {
            kind,
            message: err.to_string(),
        }
    }
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Derived data of a successfully loaded part.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ReadyPart {
    /// Geometry, computed once at load.
    pub metrics: MeshMetrics,
    /// Weight and price for the entry's current parameters.
    pub estimate: Estimate,
    /// PNG preview, if rendering succeeded.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub preview: Option<Vec<u8>>,
}

/// Lifecycle of an entry: `Loading` moves to `Ready` or `Failed` exactly once.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntryStatus {
    /// Waiting for the loader.
    Loading,
    /// Loaded and estimated.
    Ready(ReadyPart),
    /// Load failed.
    Failed(LoadFailure),
}

/// One imported file and its print parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct JobEntry {
    /// Board id.
    pub id: EntryId,
    /// File name as imported.
    pub file_name: String,
    /// User-editable parameters.
    pub params: PrintParams,
    /// Load state and derived values.
    pub status: EntryStatus,
}

/// Two-decimal display row for a ready entry.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct EntryReport {
    /// Volume in mm³.
    pub volume: String,
    /// Surface area in mm².
    pub surface_area: String,
    /// Extent along X in mm.
    pub width: String,
    /// Extent along Y in mm.
    pub depth: String,
    /// Extent along Z in mm.
    pub height: String,
    /// Triangles measured.
    pub triangles: usize,
    /// Weight in grams.
    pub weight: String,
    /// Price.
    pub price: String,
}

impl JobEntry {
    /// A new entry in the loading state.
    #[must_use]
    pub fn new(id: EntryId, file_name: impl Into<String>, params: PrintParams) -> Self {
        Self {
            id,
            file_name: file_name.into(),
            params,
            status: EntryStatus::Loading,
        }
    }

    /// Whether the entry is still waiting for its load.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        matches!(self.status, EntryStatus::Loading)
    }

    /// Ready data, if loaded.
    #[must_use]
    pub fn ready(&self) -> Option<&ReadyPart> {
        match &self.status {
            EntryStatus::Ready(part) => Some(part),
            _ => None,
        }
    }

    /// Failure, if the load failed.
    #[must_use]
    pub fn failure(&self) -> Option<&LoadFailure> {
        match &self.status {
            EntryStatus::Failed(failure) => Some(failure),
            _ => None,
        }
    }

    /// Enclosed volume in mm³, once loaded.
    #[must_use]
    pub fn volume(&self) -> Option<f64> {
        self.ready().map(|p| p.metrics.volume)
    }

    /// Surface area in mm², once loaded.
    #[must_use]
    pub fn surface_area(&self) -> Option<f64> {
        self.ready().map(|p| p.metrics.surface_area)
    }

    /// Total weight in grams, once loaded.
    #[must_use]
    pub fn weight(&self) -> Option<f64> {
        self.ready().map(|p| p.estimate.weight)
    }

    /// Total price, once loaded.
    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.ready().map(|p| p.estimate.price)
    }

    /// Display row, once loaded.
    #[must_use]
    pub fn report(&self) -> Option<EntryReport> {
        self.ready().map(|p| EntryReport {
            volume: format_fixed(p.metrics.volume),
            surface_area: format_fixed(p.metrics.surface_area),
            width: format_fixed(p.metrics.dimensions.width),
            depth: format_fixed(p.metrics.dimensions.depth),
            height: format_fixed(p.metrics.dimensions.height),
            triangles: p.metrics.triangle_count,
            weight: format_fixed(p.estimate.weight),
            price: format_fixed(p.estimate.price),
        })
    }
}

/// Re-run the estimate of a ready entry from its stored metrics and current
/// parameters.
///
/// Pure and idempotent. Loading and failed entries are returned unchanged;
/// the metrics are never recomputed.
#[must_use]
pub fn recompute(entry: JobEntry) -> JobEntry {
    match entry.status {
        EntryStatus::Ready(part) => {
            let estimate = estimate_for(&part.metrics, &entry.params);
            JobEntry {
                status: EntryStatus::Ready(ReadyPart { estimate, ..part }),
                ..entry
            }
        }
        EntryStatus::Loading | EntryStatus::Failed(_) => entry,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_measure::Dimensions;

    fn cube_metrics() -> MeshMetrics {
        MeshMetrics {
            volume: 1000.0,
            surface_area: 600.0,
            signed_volume: 1000.0,
            triangle_count: 12,
            dimensions: Dimensions {
                width: 10.0,
                depth: 10.0,
                height: 10.0,
            },
        }
    }

    fn ready_entry(params: PrintParams) -> JobEntry {
        let mut entry = JobEntry::new(EntryId(1), "cube.stl", params);
        entry.status = EntryStatus::Ready(ReadyPart {
            metrics: cube_metrics(),
            estimate: Estimate::default(),
            preview: None,
        });
        entry
    }

    #[test]
    fn recompute_fills_stale_estimate() {
        let entry = recompute(ready_entry(PrintParams::default()));
        assert_relative_eq!(entry.weight().unwrap(), 0.691_92, epsilon = 1e-9);
        assert_eq!(
            entry.report().unwrap(),
            EntryReport {
                volume: "1000.00".to_string(),
                surface_area: "600.00".to_string(),
                width: "10.00".to_string(),
                depth: "10.00".to_string(),
                height: "10.00".to_string(),
                triangles: 12,
                weight: "0.69".to_string(),
                price: "0.01".to_string(),
            }
        );
    }

    #[test]
    fn recompute_is_idempotent() {
        let once = recompute(ready_entry(PrintParams::default().with_amount(5)));
        let twice = recompute(once.clone());
        assert_eq!(once, twice);
    }

    #[test]
    fn recompute_keeps_metrics_and_preview() {
        let mut entry = ready_entry(PrintParams::default());
        if let EntryStatus::Ready(part) = &mut entry.status {
            part.preview = Some(vec![1, 2, 3]);
        }
        let entry = recompute(entry);
        let part = entry.ready().unwrap();
        assert_eq!(part.metrics, cube_metrics());
        assert_eq!(part.preview.as_deref(), Some(&[1u8, 2, 3][..]));
    }

    #[test]
    fn recompute_leaves_loading_and_failed_alone() {
        let loading = JobEntry::new(EntryId(2), "a.obj", PrintParams::default());
        assert_eq!(recompute(loading.clone()), loading);
        assert!(loading.weight().is_none());
        assert!(loading.report().is_none());

        let mut failed = loading;
        failed.status = EntryStatus::Failed(LoadFailure {
            kind: FailureKind::Parse,
            message: "bad".to_string(),
        });
        assert_eq!(recompute(failed.clone()), failed);
        assert_eq!(failed.failure().unwrap().kind, FailureKind::Parse);
    }

    #[test]
    fn failure_from_io_error() {
        let err = IoError::unsupported("step");
        let failure = LoadFailure::from(&err);
        assert_eq!(failure.kind, FailureKind::UnsupportedFormat);
        assert!(failure.to_string().contains(".step"));
    }

    #[test]
    fn id_display() {
        assert_eq!(EntryId(42).to_string(), "#42");
    }
}
