//! Snapshot persistence: atomic JSON writes and reads.

use std::io::Write;
use std::path::{Path, PathBuf};

use super::{ProgressSnapshot, RawSnapshot};

/// Snapshot write failure. Breaks resumability, so callers must surface it.
#[derive(Debug, thiserror::Error)]
pub enum PersistError {
    #[error("serialize snapshot: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("write snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Snapshot read failure.
#[derive(Debug, thiserror::Error)]
pub enum SnapshotReadError {
    #[error("read snapshot {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("parse snapshot {}: {reason}", .path.display())]
    Parse { path: PathBuf, reason: String },
}

/// Path of the scratch file used before the atomic rename (`batch_log.json` → `batch_log.json.tmp`).
pub fn temp_path(path: &Path) -> PathBuf {
    let mut o = path.as_os_str().to_owned();
    o.push(".tmp");
    PathBuf::from(o)
}

impl ProgressSnapshot {
    /// Write the snapshot to `path` as one logical write: serialize fully in
    /// memory, write and sync a sibling temp file, then rename over `path`.
    pub fn save_to_path(&self, path: &Path) -> Result<(), PersistError> {
        let json = serde_json::to_vec_pretty(self)?;
        let io_err = |source| PersistError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let tmp = temp_path(path);
        let write_tmp = || -> std::io::Result<()> {
            let mut file = std::fs::File::create(&tmp)?;
            file.write_all(&json)?;
            file.write_all(b"\n")?;
            file.sync_all()
        };
        if let Err(e) = write_tmp() {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        if let Err(e) = std::fs::rename(&tmp, path) {
            let _ = std::fs::remove_file(&tmp);
            return Err(io_err(e));
        }
        Ok(())
    }

    /// Load a snapshot from `path`. Returns `Ok(None)` if the file does not exist.
    pub fn load_from_path(path: &Path) -> Result<Option<Self>, SnapshotReadError> {
        let bytes = match std::fs::read(path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(SnapshotReadError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        let parse_err = |reason: String| SnapshotReadError::Parse {
            path: path.to_path_buf(),
            reason,
        };
        let raw: RawSnapshot =
            serde_json::from_slice(&bytes).map_err(|e| parse_err(e.to_string()))?;
        let snapshot = ProgressSnapshot::try_from(raw).map_err(parse_err)?;
        Ok(Some(snapshot))
    }
}
