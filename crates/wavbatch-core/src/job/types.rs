//! Types for one unit of work: a locator plus its processing status and results.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Job identifier assigned by a [`crate::store::JobStore`].
pub type JobId = u64;

/// Processing status, stored as a lowercase string in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Pending,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Pending => "pending",
            JobStatus::Processing => "processing",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
        }
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// One work item.
///
/// `output_path` is set iff the status is Completed and `error_detail` iff it
/// is Failed; only the functions in [`super::transition`] change status.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JobRecord {
    #[serde(rename = "url")]
    pub(crate) locator: String,
    #[serde(rename = "line_number")]
    pub(crate) origin_index: usize,
    pub(crate) status: JobStatus,
    #[serde(rename = "output_file", skip_serializing_if = "Option::is_none")]
    pub(crate) output_path: Option<PathBuf>,
    #[serde(rename = "error", skip_serializing_if = "Option::is_none")]
    pub(crate) error_detail: Option<String>,
    #[serde(rename = "start_time", skip_serializing_if = "Option::is_none")]
    pub(crate) started_at: Option<DateTime<Utc>>,
    #[serde(rename = "end_time", skip_serializing_if = "Option::is_none")]
    pub(crate) finished_at: Option<DateTime<Utc>>,
}

impl JobRecord {
    /// New Pending record.
    pub fn pending(locator: impl Into<String>, origin_index: usize) -> Self {
        Self {
            locator: locator.into(),
            origin_index,
            status: JobStatus::Pending,
            output_path: None,
            error_detail: None,
            started_at: None,
            finished_at: None,
        }
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn origin_index(&self) -> usize {
        self.origin_index
    }

    pub fn status(&self) -> JobStatus {
        self.status
    }

    pub fn output_path(&self) -> Option<&Path> {
        self.output_path.as_deref()
    }

    pub fn error_detail(&self) -> Option<&str> {
        self.error_detail.as_deref()
    }

    pub fn started_at(&self) -> Option<DateTime<Utc>> {
        self.started_at
    }

    pub fn finished_at(&self) -> Option<DateTime<Utc>> {
        self.finished_at
    }
}

/// Error detail recorded for a Failed record read without one.
const UNKNOWN_ERROR: &str = "unknown error";

/// Wire form of a job record as found in snapshots and structured work lists.
///
/// Every field except `url` is optional; [`RawJobRecord::into_record`] fills
/// defaults and restores the status/field coupling.
#[derive(Debug, Clone, Deserialize)]
pub struct RawJobRecord {
    pub url: String,
    #[serde(default)]
    pub line_number: Option<usize>,
    #[serde(default)]
    pub status: Option<JobStatus>,
    #[serde(default)]
    pub output_file: Option<PathBuf>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
}

impl RawJobRecord {
    /// Convert into a [`JobRecord`]. `position` (1-based) is used when
    /// `line_number` is absent.
    ///
    /// Fields that contradict the status (an `error` left on a Completed
    /// record, for example) are dropped. A Completed record must name its
    /// output file.
    pub fn into_record(self, position: usize) -> Result<JobRecord, String> {
        let status = self.status.unwrap_or(JobStatus::Pending);
        let started_at = parse_optional_time(self.start_time.as_deref(), "start_time")?;
        let finished_at = parse_optional_time(self.end_time.as_deref(), "end_time")?;

        let output_path = match status {
            JobStatus::Completed => Some(self.output_file.ok_or_else(|| {
                format!("completed record '{}' has no output_file", self.url)
            })?),
            _ => None,
        };
        let error_detail = match status {
            JobStatus::Failed => Some(
                self.error
                    .filter(|e| !e.trim().is_empty())
                    .unwrap_or_else(|| UNKNOWN_ERROR.to_string()),
            ),
            _ => None,
        };

        Ok(JobRecord {
            locator: self.url,
            origin_index: self.line_number.unwrap_or(position),
            status,
            output_path,
            error_detail,
            started_at,
            finished_at,
        })
    }
}

/// Parse an ISO-8601 timestamp. Accepts RFC 3339 and offset-less
/// `YYYY-MM-DDTHH:MM:SS[.frac]`, which is read as UTC.
pub fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(s) {
        return Some(t.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|t| t.and_utc())
}

fn parse_optional_time(s: Option<&str>, field: &str) -> Result<Option<DateTime<Utc>>, String> {
    match s {
        None => Ok(None),
        Some(s) => parse_timestamp(s)
            .map(Some)
            .ok_or_else(|| format!("invalid {field}: '{s}'")),
    }
}
