//! Pure per-record state transitions.
//!
//! `Pending → Processing → {Completed | Failed}`, plus `Failed → Pending` when
//! a run is resumed. A forbidden transition leaves the record untouched.

use chrono::{DateTime, Utc};
use std::path::PathBuf;

use super::types::{JobRecord, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot move job '{locator}' from {from} to {to}")]
pub struct TransitionError {
    pub locator: String,
    pub from: JobStatus,
    pub to: JobStatus,
}

fn require(record: &JobRecord, from: JobStatus, to: JobStatus) -> Result<(), TransitionError> {
    if record.status == from {
        Ok(())
    } else {
        Err(TransitionError {
            locator: record.locator.clone(),
            from: record.status,
            to,
        })
    }
}

/// Pending → Processing. Starts a new attempt; timestamps of any earlier attempt are replaced.
pub fn start(record: &mut JobRecord, at: DateTime<Utc>) -> Result<(), TransitionError> {
    require(record, JobStatus::Pending, JobStatus::Processing)?;
    record.status = JobStatus::Processing;
    record.started_at = Some(at);
    record.finished_at = None;
    Ok(())
}

/// Processing → Completed.
pub fn complete(
    record: &mut JobRecord,
    output_path: PathBuf,
    at: DateTime<Utc>,
) -> Result<(), TransitionError> {
    require(record, JobStatus::Processing, JobStatus::Completed)?;
    record.status = JobStatus::Completed;
    record.output_path = Some(output_path);
    record.error_detail = None;
    record.finished_at = Some(at);
    Ok(())
}

/// Processing → Failed.
pub fn fail(
    record: &mut JobRecord,
    detail: impl Into<String>,
    at: DateTime<Utc>,
) -> Result<(), TransitionError> {
    require(record, JobStatus::Processing, JobStatus::Failed)?;
    record.status = JobStatus::Failed;
    record.output_path = None;
    record.error_detail = Some(detail.into());
    record.finished_at = Some(at);
    Ok(())
}

/// Failed → Pending, making the record eligible for another attempt.
pub fn requeue(record: &mut JobRecord) -> Result<(), TransitionError> {
    require(record, JobStatus::Failed, JobStatus::Pending)?;
    record.status = JobStatus::Pending;
    record.error_detail = None;
    Ok(())
}

/// Processing → Pending for a record left in flight by an interrupted writer.
pub fn recover_stale(record: &mut JobRecord) -> Result<(), TransitionError> {
    require(record, JobStatus::Processing, JobStatus::Pending)?;
    record.status = JobStatus::Pending;
    record.finished_at = None;
    Ok(())
}

/// Bring a loaded record into a runnable state.
///
/// Completed records are left alone and reported as not runnable. Failed and
/// stale Processing records go back to Pending.
pub fn prepare_for_run(record: &mut JobRecord) -> bool {
    match record.status {
        JobStatus::Pending => true,
        JobStatus::Completed => false,
        JobStatus::Failed => requeue(record).is_ok(),
        JobStatus::Processing => recover_stale(record).is_ok(),
    }
}
