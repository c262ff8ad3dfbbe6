//! Per-job progress events for front ends.

use std::path::PathBuf;
use std::time::Duration;

use crate::fetch::Platform;

/// Emitted by the orchestrator as the batch advances. `position` is 1-based
/// within the current batch, `total` is the batch size.
#[derive(Debug, Clone, PartialEq)]
pub enum JobEvent {
    Started {
        position: usize,
        total: usize,
        locator: String,
        platform: Platform,
    },
    Completed {
        position: usize,
        total: usize,
        locator: String,
        output_path: PathBuf,
    },
    Failed {
        position: usize,
        total: usize,
        locator: String,
        error: String,
    },
    /// Pacing pause before the next job.
    Waiting { delay: Duration },
    /// The snapshot could not be written; resume data is stale.
    PersistFailed { error: String },
    /// The run stopped early; `remaining` jobs were not attempted.
    Aborted { remaining: usize },
}
