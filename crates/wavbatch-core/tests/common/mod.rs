//! Shared helpers: a scripted fetcher and record builders.

#![allow(dead_code)]

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use wavbatch_core::control::RunControl;
use wavbatch_core::fetch::{FetchError, FetchRequest, Fetcher};
use wavbatch_core::job::JobRecord;
use wavbatch_core::orchestrator::BatchOptions;
use wavbatch_core::snapshot::ProgressSnapshot;

/// Fetcher that succeeds by writing a small file, or fails for configured locators.
#[derive(Default)]
pub struct ScriptedFetcher {
    failing: HashSet<String>,
    calls: Mutex<Vec<String>>,
    watch_snapshot: Option<PathBuf>,
    seen_snapshots: Mutex<Vec<Option<ProgressSnapshot>>>,
    abort_after: Option<(String, Arc<RunControl>)>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every request for these locators.
    pub fn failing(mut self, locators: &[&str]) -> Self {
        self.failing = locators.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Read the snapshot at `path` at the start of every fetch.
    pub fn watching_snapshot(mut self, path: &Path) -> Self {
        self.watch_snapshot = Some(path.to_path_buf());
        self
    }

    /// Request an abort while fetching `locator` (the fetch itself still succeeds).
    pub fn aborting_during(mut self, locator: &str, control: Arc<RunControl>) -> Self {
        self.abort_after = Some((locator.to_string(), control));
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn seen_snapshots(&self) -> Vec<Option<ProgressSnapshot>> {
        self.seen_snapshots.lock().unwrap().clone()
    }
}

impl Fetcher for ScriptedFetcher {
    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<PathBuf, FetchError> {
        self.calls.lock().unwrap().push(request.locator.to_string());

        if let Some(path) = &self.watch_snapshot {
            let snapshot = ProgressSnapshot::load_from_path(path)
                .expect("snapshot must be readable between jobs");
            self.seen_snapshots.lock().unwrap().push(snapshot);
        }

        if let Some((locator, control)) = &self.abort_after {
            if locator == request.locator {
                control.request_abort();
            }
        }

        if self.failing.contains(request.locator) {
            return Err(FetchError::Rejected(format!(
                "unsupported source: {}",
                request.locator
            )));
        }

        let name = request
            .locator
            .rsplit('/')
            .next()
            .filter(|s| !s.is_empty())
            .unwrap_or("track");
        let path = request
            .output_dir
            .join(format!("{name}.{}", request.format.extension()));
        std::fs::create_dir_all(request.output_dir).map_err(|e| FetchError::Rejected(e.to_string()))?;
        std::fs::write(&path, b"RIFF").map_err(|e| FetchError::Rejected(e.to_string()))?;
        Ok(path)
    }
}

/// Pending records for `urls`, numbered from line 1.
pub fn records(urls: &[&str]) -> Vec<JobRecord> {
    urls.iter()
        .enumerate()
        .map(|(i, u)| JobRecord::pending(*u, i + 1))
        .collect()
}

/// Options with no pacing, for fast tests.
pub fn no_delay() -> BatchOptions {
    BatchOptions {
        delay: Duration::ZERO,
        ..BatchOptions::default()
    }
}
