//! Error types for job handling.

use thiserror::Error;

use crate::EntryId;

/// Result type for job operations.
pub type JobResult<T> = Result<T, JobError>;

/// Errors from editing entries or starting the loader.
///
/// Load failures are not errors here: they are recorded on the entry as
/// [`crate::LoadFailure`].
#[derive(Debug, Error)]
pub enum JobError {
    /// A parameter edit named a field that does not exist.
    #[error("unknown field '{field}'")]
    UnknownField {
        /// The field name as received.
        field: String,
    },

    /// A parameter edit carried a value that does not parse.
    #[error("invalid value '{value}' for {field}: {reason}")]
    InvalidValue {
        /// Field being edited.
        field: &'static str,
        /// The value as received.
        value: String,
        /// Why it was rejected.
        reason: String,
    },

    /// No entry with this id (never imported, or removed).
    #[error("no entry with id {0}")]
    UnknownEntry(EntryId),

    /// The worker pool could not be created.
    #[error("failed to start loader threads: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl JobError {
    pub(crate) fn invalid_value(
        field: &'static str,
        value: &str,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidValue {
            field,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}
