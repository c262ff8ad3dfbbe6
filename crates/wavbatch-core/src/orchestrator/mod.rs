//! Batch orchestrator.
//!
//! Drives the records of one batch run through a [`Fetcher`] strictly one at
//! a time: Pending → Processing → Completed/Failed, a snapshot written after
//! every job, a pacing delay between jobs. A failing job never stops the
//! batch. `resume` rebuilds the run from the last snapshot and re-runs only
//! Pending and Failed records.

mod progress;
mod resume;
mod run;
mod summary;

pub use progress::JobEvent;
pub use summary::{BatchSummary, FailedJob};

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use crate::control::RunControl;
use crate::fetch::{Format, Quality};
use crate::job::JobId;
use crate::snapshot::{self, SnapshotReadError};
use crate::store::MemoryJobStore;

/// Per-run conversion settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchOptions {
    pub format: Format,
    pub quality: Quality,
    /// Pause between consecutive jobs.
    pub delay: Duration,
}

impl Default for BatchOptions {
    fn default() -> Self {
        Self {
            format: Format::Wav,
            quality: Quality::Best,
            delay: Duration::from_secs(2),
        }
    }
}

/// Result of `start` / `resume`.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Ran(BatchSummary),
    /// Every record was already Completed; the fetcher was never called.
    NothingToDo,
    /// `resume` found no snapshot to resume from.
    NoSnapshot,
}

/// Conditions that stop a batch before any job starts.
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    #[error("batch is empty; nothing to run")]
    EmptyBatch,
    #[error("unknown job id {0}")]
    UnknownJob(JobId),
    #[error(transparent)]
    Snapshot(#[from] SnapshotReadError),
}

pub struct Orchestrator<F, S = MemoryJobStore> {
    fetcher: F,
    store: S,
    output_dir: PathBuf,
    snapshot_path: PathBuf,
    control: Arc<RunControl>,
    progress: Option<mpsc::Sender<JobEvent>>,
}

impl<F, S> Orchestrator<F, S> {
    /// Orchestrator writing audio and its snapshot (`batch_log.json`) into `output_dir`.
    pub fn new(fetcher: F, store: S, output_dir: impl Into<PathBuf>) -> Self {
        let output_dir = output_dir.into();
        let snapshot_path =
            snapshot::snapshot_path(&output_dir, snapshot::DEFAULT_SNAPSHOT_FILE);
        Self {
            fetcher,
            store,
            output_dir,
            snapshot_path,
            control: Arc::new(RunControl::new()),
            progress: None,
        }
    }

    pub fn with_snapshot_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.snapshot_path = path.into();
        self
    }

    pub fn with_control(mut self, control: Arc<RunControl>) -> Self {
        self.control = control;
        self
    }

    /// Send a [`JobEvent`] for every job start, finish and pause.
    pub fn with_progress(mut self, tx: mpsc::Sender<JobEvent>) -> Self {
        self.progress = Some(tx);
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn snapshot_path(&self) -> &Path {
        &self.snapshot_path
    }

    pub fn control(&self) -> &Arc<RunControl> {
        &self.control
    }

    /// Detach the progress sender so a consumer sees the channel close.
    pub fn take_progress(&mut self) -> Option<mpsc::Sender<JobEvent>> {
        self.progress.take()
    }

    async fn emit(&self, event: JobEvent) {
        if let Some(tx) = &self.progress {
            let _ = tx.send(event).await;
        }
    }
}
