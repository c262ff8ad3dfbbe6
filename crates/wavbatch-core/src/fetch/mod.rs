//! Fetch-and-transcode collaborator.
//!
//! The orchestrator only sees the [`Fetcher`] trait: given a locator, an
//! output directory, a format and a quality tier, a fetcher either produces a
//! local audio file or fails with a [`FetchError`]. [`YtDlpFetcher`] is the
//! production implementation; tests supply scripted fakes.

mod format;
mod platform;
mod sanitize;
mod ytdlp;

pub use format::{Format, Quality};
pub use platform::Platform;
pub use sanitize::{sanitize_filename, MAX_NAME_CHARS};
pub use ytdlp::{YtDlpFetcher, DEFAULT_FFMPEG};

use std::path::{Path, PathBuf};

/// One fetch-and-transcode request.
#[derive(Debug, Clone, Copy)]
pub struct FetchRequest<'a> {
    pub locator: &'a str,
    pub output_dir: &'a Path,
    pub format: Format,
    pub quality: Quality,
    /// Explicit output name (without extension). Sanitized before use.
    pub custom_name: Option<&'a str>,
}

/// Failure of a single fetch. The `Display` text becomes the job's error detail.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{program} exited with {status}: {detail}")]
    Exit {
        program: String,
        status: String,
        detail: String,
    },
    #[error("conversion finished but no output file was reported")]
    MissingOutput,
    #[error("reported output file does not exist: {}", .0.display())]
    OutputNotFound(PathBuf),
    #[error("{0}")]
    Rejected(String),
}

/// Retrieves one locator and converts it to a local audio file.
#[allow(async_fn_in_trait)]
pub trait Fetcher {
    /// Returns the path of the produced file.
    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<PathBuf, FetchError>;
}
