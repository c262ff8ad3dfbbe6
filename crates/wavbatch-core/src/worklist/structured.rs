//! JSON work lists, including progress snapshots fed back in.

use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

use super::{read_source, LoadError};
use crate::job::{JobRecord, RawJobRecord};

/// Object fields that may hold the record list, in lookup order.
const LIST_FIELDS: &[&str] = &["urls", "results"];

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Locator(String),
    Record(RawJobRecord),
}

/// Read a structured work list from `path`.
pub fn load_structured(path: &Path) -> Result<Vec<JobRecord>, LoadError> {
    let text = read_source(path)?;
    let value: Value = serde_json::from_str(&text).map_err(|source| LoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let records = records_from_value(value)?;
    tracing::info!("loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

/// Parse a structured work list from JSON text.
pub fn parse_structured(text: &str) -> Result<Vec<JobRecord>, LoadError> {
    let value: Value = serde_json::from_str(text).map_err(|source| LoadError::Parse {
        path: Default::default(),
        source,
    })?;
    records_from_value(value)
}

fn records_from_value(value: Value) -> Result<Vec<JobRecord>, LoadError> {
    let entries = match value {
        Value::Array(entries) => entries,
        Value::Object(mut obj) => LIST_FIELDS
            .iter()
            .find_map(|field| match obj.remove(*field) {
                Some(Value::Array(entries)) => Some(entries),
                _ => None,
            })
            .ok_or(LoadError::InvalidFormat)?,
        _ => return Err(LoadError::InvalidFormat),
    };

    entries
        .into_iter()
        .enumerate()
        .map(|(i, entry)| {
            let position = i + 1;
            let invalid = |reason: String| LoadError::InvalidRecord { position, reason };
            match serde_json::from_value::<RawEntry>(entry) {
                Ok(RawEntry::Locator(url)) => Ok(JobRecord::pending(url.trim(), position)),
                Ok(RawEntry::Record(raw)) => raw.into_record(position).map_err(invalid),
                Err(e) => Err(invalid(e.to_string())),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::job::JobStatus;

    #[test]
    fn bare_list_of_records() {
        let records = parse_structured(
            r#"[
                {"url": "http://a", "line_number": 1, "status": "pending"},
                {"url": "http://b", "line_number": 2, "status": "completed", "output_file": "/o/b.wav"}
            ]"#,
        )
        .unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].status(), JobStatus::Completed);
    }

    #[test]
    fn object_with_urls_field() {
        let records = parse_structured(r#"{"urls": ["http://a", {"url": "http://b"}]}"#).unwrap();
        let got: Vec<_> = records
            .iter()
            .map(|r| (r.locator(), r.origin_index()))
            .collect();
        assert_eq!(got, [("http://a", 1), ("http://b", 2)]);
    }

    #[test]
    fn snapshot_document_is_accepted() {
        let records = parse_structured(
            r#"{"timestamp": "2024-01-01T00:00:00", "total_urls": 1, "completed": 0,
                "failed": 1, "results": [{"url": "http://a", "line_number": 5,
                "status": "failed", "error": "Download failed"}]}"#,
        )
        .unwrap();
        assert_eq!(records[0].origin_index(), 5);
        assert_eq!(records[0].error_detail(), Some("Download failed"));
    }

    #[test]
    fn loader_keeps_carried_status() {
        let records =
            parse_structured(r#"[{"url": "http://a", "status": "processing"}]"#).unwrap();
        assert_eq!(records[0].status(), JobStatus::Processing);
    }

    #[test]
    fn other_shapes_are_invalid_format() {
        for doc in [r#"{"items": []}"#, r#""http://a""#, "42", r#"{"urls": "http://a"}"#] {
            let err = parse_structured(doc).unwrap_err();
            assert!(matches!(err, LoadError::InvalidFormat), "{doc}: {err:?}");
            assert_eq!(err.to_string(), "invalid format");
        }
    }

    #[test]
    fn bad_record_reports_position() {
        let err = parse_structured(r#"["http://a", {"line_number": 2}]"#).unwrap_err();
        match err {
            LoadError::InvalidRecord { position, .. } => assert_eq!(position, 2),
            other => panic!("expected InvalidRecord, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_structured("[{"),
            Err(LoadError::Parse { .. })
        ));
    }
}
