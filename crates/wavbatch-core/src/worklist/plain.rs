//! Line-delimited locator lists.

use std::path::Path;

use super::{read_source, LoadError};
use crate::job::JobRecord;

/// Read a plain work list from `path`.
pub fn load_plain(path: &Path) -> Result<Vec<JobRecord>, LoadError> {
    let text = read_source(path)?;
    let records = parse_plain(&text);
    tracing::info!("loaded {} URLs from {}", records.len(), path.display());
    Ok(records)
}

/// Parse line-delimited text. `origin_index` is the 1-based line number
/// counting every line, so it matches the source file.
pub fn parse_plain(text: &str) -> Vec<JobRecord> {
    text.lines()
        .enumerate()
        .filter_map(|(i, line)| {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                None
            } else {
                Some(JobRecord::pending(line, i + 1))
            }
        })
        .collect()
}
