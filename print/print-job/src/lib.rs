//! Print job entries, parameter edits and background loading.
//!
//! A [`JobBoard`] holds one [`JobEntry`] per imported file. Entries start in
//! the loading state while a [`BackgroundLoader`] parses and measures the
//! file off the caller's thread, then settle once as ready or failed.
//! Parameter edits go through the pure reducer [`apply`], which re-runs
//! only the estimate and never touches the measured geometry.
//!
//! # Example
//!
//! ```
//! use print_job::{BackgroundLoader, FieldChange, JobBoard, LoaderConfig};
//!
//! let obj = b"v 0 0 0\nv 10 0 0\nv 0 10 0\nv 0 0 10\nf 1 3 2\nf 1 2 4\nf 1 4 3\nf 2 3 4\n";
//!
//! let mut loader = BackgroundLoader::with_config(1, LoaderConfig::default().without_preview())?;
//! let mut board = JobBoard::new();
//!
//! let id = board.import("tetra.obj");
//! loader.submit(id, "tetra.obj", obj.to_vec());
//! for done in loader.wait_all() {
//!     board.complete(done.id, done.outcome);
//! }
//!
//! let entry = board.edit(id, FieldChange::Amount(10))?;
//! assert_eq!(entry.report().unwrap().volume, "166.67");
//! # Ok::<(), print_job::JobError>(())
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]

mod board;
mod edit;
mod entry;
mod error;
mod loader;

pub use board::{JobBoard, Totals};
pub use edit::{apply, FieldChange};
pub use entry::{
    recompute, EntryId, EntryReport, EntryStatus, FailureKind, JobEntry, LoadFailure, ReadyPart,
};
pub use error::{JobError, JobResult};
pub use loader::{process_file, BackgroundLoader, Completed, LoadOutcome, LoadedPart, LoaderConfig};
