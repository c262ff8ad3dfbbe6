//! Work-list loader: turns an input file into an ordered sequence of job records.
//!
//! Two inputs are understood:
//! - plain text, one locator per line (`#` comments and blank lines skipped)
//! - JSON, either a bare list of job-like records or an object holding one
//!   (`urls`, or `results` so a progress snapshot can be fed back in)
//!
//! Structured records keep whatever status they carry; normalizing it is the
//! orchestrator's job.

mod error;
mod plain;
mod structured;

pub use error::LoadError;
pub use plain::{load_plain, parse_plain};
pub use structured::{load_structured, parse_structured};

use std::path::Path;

use crate::job::JobRecord;

/// Load `path`, choosing the structured loader for `.json` files and the plain one otherwise.
pub fn load_auto(path: &Path) -> Result<Vec<JobRecord>, LoadError> {
    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    if is_json {
        load_structured(path)
    } else {
        load_plain(path)
    }
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    let text = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(match text.strip_prefix('\u{feff}') {
        Some(rest) => rest.to_string(),
        None => text,
    })
}
