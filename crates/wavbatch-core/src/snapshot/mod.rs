//! Progress snapshot: the durable, point-in-time form of a batch run.
//!
//! Written after every job as one JSON document (`timestamp`, `total_urls`,
//! `completed`, `failed`, `results`). Readers never need the conditional
//! record fields (`output_file`, `error`, `start_time`, `end_time`).

mod persist;

pub use persist::{temp_path, PersistError, SnapshotReadError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::job::{parse_timestamp, JobRecord, JobStatus, RawJobRecord};

/// Default snapshot file name inside the output directory.
pub const DEFAULT_SNAPSHOT_FILE: &str = "batch_log.json";

/// Snapshot path for an output directory and file name.
pub fn snapshot_path(output_dir: &Path, file_name: &str) -> PathBuf {
    output_dir.join(file_name)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgressSnapshot {
    pub timestamp: DateTime<Utc>,
    pub total_urls: usize,
    pub completed: usize,
    pub failed: usize,
    pub results: Vec<JobRecord>,
}

impl ProgressSnapshot {
    /// Build a snapshot of `records` (in order) taken at `timestamp`.
    pub fn new(records: Vec<JobRecord>, timestamp: DateTime<Utc>) -> Self {
        let count = |s: JobStatus| records.iter().filter(|r| r.status() == s).count();
        Self {
            timestamp,
            total_urls: records.len(),
            completed: count(JobStatus::Completed),
            failed: count(JobStatus::Failed),
            results: records,
        }
    }

    pub fn pending(&self) -> usize {
        self.total_urls - self.completed - self.failed
    }

    /// True if any record is mid-attempt. A snapshot written by the orchestrator never is.
    pub fn has_in_flight(&self) -> bool {
        self.results
            .iter()
            .any(|r| r.status() == JobStatus::Processing)
    }
}

/// Wire form read back from disk.
#[derive(Debug, Deserialize)]
struct RawSnapshot {
    timestamp: String,
    #[serde(default)]
    total_urls: Option<usize>,
    #[serde(default)]
    completed: Option<usize>,
    #[serde(default)]
    failed: Option<usize>,
    results: Vec<RawJobRecord>,
}

impl TryFrom<RawSnapshot> for ProgressSnapshot {
    type Error = String;

    fn try_from(raw: RawSnapshot) -> Result<Self, Self::Error> {
        let timestamp = parse_timestamp(&raw.timestamp)
            .ok_or_else(|| format!("invalid timestamp: '{}'", raw.timestamp))?;
        let records = raw
            .results
            .into_iter()
            .enumerate()
            .map(|(i, r)| r.into_record(i + 1).map_err(|e| format!("record {}: {e}", i + 1)))
            .collect::<Result<Vec<_>, _>>()?;
        let snapshot = ProgressSnapshot::new(records, timestamp);

        let derived = (snapshot.total_urls, snapshot.completed, snapshot.failed);
        if let (Some(total), Some(completed), Some(failed)) =
            (raw.total_urls, raw.completed, raw.failed)
        {
            let stored = (total, completed, failed);
            if stored != derived {
                tracing::warn!(
                    ?stored,
                    ?derived,
                    "snapshot counts disagree with its records; using record statuses"
                );
            }
        }
        Ok(snapshot)
    }
}
