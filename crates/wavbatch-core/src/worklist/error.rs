use std::path::PathBuf;

/// Failure to produce a work list. Aborts only the load step.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot parse {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("invalid format")]
    InvalidFormat,
    #[error("record {position}: {reason}")]
    InvalidRecord { position: usize, reason: String },
}
