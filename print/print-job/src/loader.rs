//! Background loading of imported files.
//!
//! The caller submits file bytes and keeps going. A rayon pool runs
//! load → metrics → preview for each file in parallel, and finished results
//! are polled back through a channel on the caller's thread.

use std::sync::mpsc;

use mesh_measure::{compute_metrics, MeshMetrics};
use mesh_preview::{render_png, PreviewOptions};
use tracing::{debug, info, warn};

use crate::entry::{EntryId, LoadFailure};
use crate::error::JobResult;

/// What the loader does besides measuring.
#[derive(Debug, Clone, PartialEq)]
pub struct LoaderConfig {
    /// Preview settings, or `None` to skip rendering.
    pub preview: Option<PreviewOptions>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            preview: Some(PreviewOptions::default()),
        }
    }
}

impl LoaderConfig {
    /// Render previews with `options`.
    #[must_use]
    pub fn with_preview(mut self, options: PreviewOptions) -> Self {
        self.preview = Some(options);
        self
    }

    /// Do not render previews.
    #[must_use]
    pub fn without_preview(mut self) -> Self {
        self.preview = None;
        self
    }
}

/// Result of processing one file successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPart {
    /// Measured geometry.
    pub metrics: MeshMetrics,
    /// PNG preview, absent if disabled or rendering failed.
    pub preview: Option<Vec<u8>>,
}

/// Outcome of processing one file.
pub type LoadOutcome = Result<LoadedPart, LoadFailure>;

/// Load, measure and optionally render one file.
///
/// A failed preview is logged and dropped; it never fails the load.
///
/// # Errors
///
/// Returns a [`LoadFailure`] if the extension is unsupported or the bytes
/// do not parse.
pub fn process_file(file_name: &str, bytes: &[u8], config: &LoaderConfig) -> LoadOutcome {
    let soup = mesh_io::load_named(bytes, file_name).map_err(|e| {
        warn!(file = file_name, error = %e, "Failed to load mesh");
        LoadFailure::from(&e)
    })?;

    let metrics = compute_metrics(&soup);

    let preview = config.preview.as_ref().and_then(|options| {
        render_png(&soup, options)
            .map_err(|e| debug!(file = file_name, error = %e, "Preview skipped"))
            .ok()
    });

    Ok(LoadedPart { metrics, preview })
}

/// A finished load, tagged with the entry it belongs to.
#[derive(Debug, Clone, PartialEq)]
pub struct Completed {
    /// Entry the file was imported as.
    pub id: EntryId,
    /// What happened.
    pub outcome: LoadOutcome,
}

/// Runs [`process_file`] on a worker pool.
///
/// Results come back in completion order, not submission order.
pub struct BackgroundLoader {
    pool: rayon::ThreadPool,
    config: LoaderConfig,
    result_tx: mpsc::Sender<Completed>,
    result_rx: mpsc::Receiver<Completed>,
    pending: usize,
}

impl std::fmt::Debug for BackgroundLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackgroundLoader")
            .field("threads", &self.pool.current_num_threads())
            .field("config", &self.config)
            .field("pending", &self.pending)
            .finish()
    }
}

impl BackgroundLoader {
    /// Create a loader with `num_threads` workers (0 = one per core).
    ///
    /// # Errors
    ///
    /// Returns [`crate::JobError::ThreadPool`] if the pool cannot start.
    pub fn new(num_threads: usize) -> JobResult<Self> {
        Self::with_config(num_threads, LoaderConfig::default())
    }

    /// Create a loader with explicit settings.
    ///
    /// # Errors
    ///
    /// Returns [`crate::JobError::ThreadPool`] if the pool cannot start.
    pub fn with_config(num_threads: usize, config: LoaderConfig) -> JobResult<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(num_threads)
            .thread_name(|i| format!("loader-{i}"))
            .build()?;
        let (result_tx, result_rx) = mpsc::channel();

        info!(threads = pool.current_num_threads(), "Started background loader");
        Ok(Self {
            pool,
            config,
            result_tx,
            result_rx,
            pending: 0,
        })
    }

    /// Queue a file for loading. Returns immediately.
    pub fn submit(&mut self, id: EntryId, file_name: impl Into<String>, bytes: Vec<u8>) {
        let file_name = file_name.into();
        let config = self.config.clone();
        let tx = self.result_tx.clone();
        debug!(%id, file = %file_name, bytes = bytes.len(), "Queued file");

        self.pending += 1;
        self.pool.spawn(move || {
            let outcome = process_file(&file_name, &bytes, &config);
            // The receiver only goes away with the loader itself
            let _ = tx.send(Completed { id, outcome });
        });
    }

    /// Collect whatever has finished. Never blocks.
    pub fn poll_completed(&mut self) -> Vec<Completed> {
        let mut results = Vec::new();
        while let Ok(done) = self.result_rx.try_recv() {
            results.push(done);
        }
        self.pending -= results.len();
        results
    }

    /// Block until every submitted file has finished.
    pub fn wait_all(&mut self) -> Vec<Completed> {
        let mut results = Vec::with_capacity(self.pending);
        while self.pending > 0 {
            match self.result_rx.recv() {
                Ok(done) => {
                    results.push(done);
                    self.pending -= 1;
                }
                Err(_) => break,
            }
        }
        results
    }

    /// Files submitted but not yet collected.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.pending
    }

    /// Number of worker threads.
    #[must_use]
    pub fn num_threads(&self) -> usize {
        self.pool.current_num_threads()
    }

    /// Settings applied to every file.
    #[must_use]
    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }
}
