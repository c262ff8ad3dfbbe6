//! End-of-batch summary.

use std::fmt;

use crate::job::{JobRecord, JobStatus};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedJob {
    pub locator: String,
    pub origin_index: usize,
    pub error: String,
}

/// Outcome counts for the records of one `run_batch` call.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchSummary {
    pub total: usize,
    pub completed: usize,
    pub failed: usize,
    /// Records still Pending because the run was aborted.
    pub not_attempted: usize,
    /// Snapshot writes that failed during the run.
    pub persist_failures: usize,
    pub failures: Vec<FailedJob>,
}

impl BatchSummary {
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a JobRecord>) -> Self {
        let mut summary = BatchSummary::default();
        for r in records {
            summary.total += 1;
            match r.status() {
                JobStatus::Completed => summary.completed += 1,
                JobStatus::Failed => {
                    summary.failed += 1;
                    summary.failures.push(FailedJob {
                        locator: r.locator().to_string(),
                        origin_index: r.origin_index(),
                        error: r.error_detail().unwrap_or("unknown error").to_string(),
                    });
                }
                JobStatus::Pending | JobStatus::Processing => summary.not_attempted += 1,
            }
        }
        summary
    }

    /// Completed share of the batch, in percent. 0 for an empty summary.
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        (self.completed as f64 * 100.0) / self.total as f64
    }

    /// `success_rate` with one decimal place, e.g. `70.0%`.
    pub fn success_rate_text(&self) -> String {
        format!("{:.1}%", self.success_rate())
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Total URLs: {}", self.total)?;
        writeln!(f, "Completed: {}", self.completed)?;
        writeln!(f, "Failed: {}", self.failed)?;
        if self.not_attempted > 0 {
            writeln!(f, "Not attempted: {}", self.not_attempted)?;
        }
        write!(f, "Success rate: {}", self.success_rate_text())?;
        if !self.failures.is_empty() {
            write!(f, "\n\nFailed URLs:")?;
            for job in &self.failures {
                write!(f, "\n  - {}: {}", job.locator, job.error)?;
            }
        }
        if self.persist_failures > 0 {
            write!(
                f,
                "\n\nWARNING: {} snapshot write(s) failed; resume data may be stale",
                self.persist_failures
            )?;
        }
        Ok(())
    }
}
