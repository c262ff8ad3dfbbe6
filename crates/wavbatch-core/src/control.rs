//! Run control: an abort token shared between the batch loop and whoever
//! wants to stop it (the CLI's Ctrl-C handler).
//!
//! An abort never interrupts a job in flight. The orchestrator checks the
//! token between jobs and while pacing, and leaves the remaining records
//! Pending in the last written snapshot.

use std::time::Duration;

use tokio::sync::watch;

/// Shared abort token for one batch run.
#[derive(Debug)]
pub struct RunControl {
    abort: watch::Sender<bool>,
}

impl Default for RunControl {
    fn default() -> Self {
        Self::new()
    }
}

impl RunControl {
    pub fn new() -> Self {
        let (abort, _) = watch::channel(false);
        Self { abort }
    }

    /// Request that the batch stop before its next job.
    pub fn request_abort(&self) {
        self.abort.send_replace(true);
    }

    pub fn is_abort_requested(&self) -> bool {
        *self.abort.borrow()
    }

    /// Sleep for `delay` unless an abort arrives first. Returns true if aborted.
    pub async fn pace(&self, delay: Duration) -> bool {
        let mut rx = self.abort.subscribe();
        tokio::select! {
            _ = tokio::time::sleep(delay) => self.is_abort_requested(),
            _ = rx.wait_for(|aborted| *aborted) => true,
        }
    }
}
