//! The ordered set of imported entries.

use std::collections::BTreeMap;

use print_estimate::{estimate_for, PrintParams};
use tracing::{debug, info};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::edit::{apply, FieldChange};
use crate::entry::{EntryId, EntryStatus, JobEntry, ReadyPart};
use crate::error::{JobError, JobResult};
use crate::loader::{BackgroundLoader, LoadOutcome};

/// Aggregates across the board.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Totals {
    /// Sum of weights of ready entries, in grams.
    pub weight: f64,
    /// Sum of prices of ready entries.
    pub price: f64,
    /// Entries with results.
    pub ready: usize,
    /// Entries still loading.
    pub loading: usize,
    /// Entries whose load failed.
    pub failed: usize,
}

/// Entries keyed by id, iterated in import order.
///
/// # Example
///
/// ```
/// use print_job::{FieldChange, JobBoard, LoadedPart};
/// use mesh_measure::MeshMetrics;
///
/// let mut board = JobBoard::new();
/// let id = board.import("cube.stl");
///
/// let metrics = MeshMetrics { volume: 1000.0, surface_area: 600.0, ..Default::default() };
/// board.complete(id, Ok(LoadedPart { metrics, preview: None }));
/// assert_eq!(board.get(id).unwrap().report().unwrap().weight, "0.69");
///
/// board.edit(id, FieldChange::Walls(0)).unwrap();
/// assert_eq!(board.get(id).unwrap().report().unwrap().weight, "0.19");
/// ```
#[derive(Debug, Clone, Default)]
pub struct JobBoard {
    entries: BTreeMap<EntryId, JobEntry>,
    next_id: u64,
    defaults: PrintParams,
}

impl JobBoard {
    /// An empty board using default print parameters for new entries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty board whose new entries start from `defaults`.
    #[must_use]
    pub fn with_defaults(defaults: PrintParams) -> Self {
        Self {
            defaults,
            ..Self::default()
        }
    }

    /// Parameters given to newly imported entries.
    #[must_use]
    pub fn defaults(&self) -> &PrintParams {
        &self.defaults
    }

    /// Add a loading entry with the board defaults.
    pub fn import(&mut self, file_name: impl Into<String>) -> EntryId {
        let params = self.defaults;
        self.import_with(file_name, params)
    }

    /// Add a loading entry with explicit parameters.
    pub fn import_with(&mut self, file_name: impl Into<String>, params: PrintParams) -> EntryId {
        let id = EntryId(self.next_id);
        self.next_id += 1;
        let entry = JobEntry::new(id, file_name, params);
        debug!(%id, file = %entry.file_name, "Imported entry");
        self.entries.insert(id, entry);
        id
    }

    /// Record the load result of an entry.
    ///
    /// Only a loading entry accepts a result, so each entry settles exactly
    /// once. Returns `false` if the entry was removed or already settled.
    pub fn complete(&mut self, id: EntryId, outcome: LoadOutcome) -> bool {
        let Some(entry) = self.entries.get_mut(&id) else {
            debug!(%id, "Discarding result for removed entry");
            return false;
        };
        if !entry.is_loading() {
            debug!(%id, "Entry already settled");
            return false;
        }

        entry.status = match outcome {
            Ok(part) => {
                let estimate = estimate_for(&part.metrics, &entry.params);
                info!(
                    %id,
                    file = %entry.file_name,
                    volume = part.metrics.volume,
                    weight = estimate.weight,
                    "Entry ready"
                );
                EntryStatus::Ready(ReadyPart {
                    metrics: part.metrics,
                    estimate,
                    preview: part.preview,
                })
            }
            Err(failure) => {
                info!(%id, file = %entry.file_name, reason = %failure, "Entry failed");
                EntryStatus::Failed(failure)
            }
        };
        true
    }

    /// Apply everything the loader has finished. Returns how many entries
    /// settled.
    pub fn apply_completed(&mut self, loader: &mut BackgroundLoader) -> usize {
        let mut settled = 0;
        for done in loader.poll_completed() {
            if self.complete(done.id, done.outcome) {
                settled += 1;
            }
        }
        settled
    }

    /// Change one parameter of an entry and recompute its estimate.
    ///
    /// # Errors
    ///
    /// Returns [`JobError::UnknownEntry`] if `id` is not on the board.
    pub fn edit(&mut self, id: EntryId, change: FieldChange) -> JobResult<&JobEntry> {
        let entry = self.entries.remove(&id).ok_or(JobError::UnknownEntry(id))?;
        debug!(%id, ?change, "Editing entry");
        Ok(self.entries.entry(id).or_insert(apply(entry, change)))
    }

    /// Parse and apply a `(field, value)` edit.
    ///
    /// # Errors
    ///
    /// Returns the errors of [`FieldChange::parse`] and [`JobBoard::edit`].
    pub fn edit_named(&mut self, id: EntryId, field: &str, value: &str) -> JobResult<&JobEntry> {
        if !self.entries.contains_key(&id) {
            return Err(JobError::UnknownEntry(id));
        }
        let change = FieldChange::parse(field, value)?;
        self.edit(id, change)
    }

    /// Remove an entry. A load still in flight for it is discarded on
    /// arrival.
    pub fn remove(&mut self, id: EntryId) -> Option<JobEntry> {
        let removed = self.entries.remove(&id);
        if removed.is_some() {
            debug!(%id, "Removed entry");
        }
        removed
    }

    /// Look up an entry.
    #[must_use]
    pub fn get(&self, id: EntryId) -> Option<&JobEntry> {
        self.entries.get(&id)
    }

    /// Entries in import order.
    pub fn iter(&self) -> impl Iterator<Item = &JobEntry> {
        self.entries.values()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the board has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether any entry is still loading.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.entries.values().any(JobEntry::is_loading)
    }

    /// Sum weights and prices of ready entries and count states.
    #[must_use]
    pub fn totals(&self) -> Totals {
        self.entries
            .values()
            .fold(Totals::default(), |mut totals, entry| {
                match &entry.status {
                    EntryStatus::Ready(part) => {
                        totals.weight += part.estimate.weight;
                        totals.price += part.estimate.price;
                        totals.ready += 1;
                    }
                    EntryStatus::Loading => totals.loading += 1,
                    EntryStatus::Failed(_) => totals.failed += 1,
                }
                totals
            })
    }
}
