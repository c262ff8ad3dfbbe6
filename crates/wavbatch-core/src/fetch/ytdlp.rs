//! `yt-dlp` adapter: audio extraction and conversion via an external process.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use super::platform::Platform;
use super::sanitize::sanitize_filename;
use super::{FetchError, FetchRequest, Fetcher};

/// Default executable name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "yt-dlp";
/// Default ffmpeg executable used by yt-dlp for conversion.
pub const DEFAULT_FFMPEG: &str = "ffmpeg";

/// Runs `yt-dlp` (which drives ffmpeg) once per request and reports the final file path.
#[derive(Debug, Clone)]
pub struct YtDlpFetcher {
    program: String,
    ffmpeg: String,
    extra_args: Vec<String>,
}

impl Default for YtDlpFetcher {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl YtDlpFetcher {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            ffmpeg: DEFAULT_FFMPEG.to_string(),
            extra_args: Vec::new(),
        }
    }

    /// ffmpeg to check for and hand to yt-dlp (`--ffmpeg-location`) when not the default.
    pub fn with_ffmpeg(mut self, ffmpeg: impl Into<String>) -> Self {
        self.ffmpeg = ffmpeg.into();
        self
    }

    /// Extra arguments inserted before the locator (e.g. cookies or proxy options).
    pub fn with_extra_args(mut self, extra_args: Vec<String>) -> Self {
        self.extra_args = extra_args;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn ffmpeg(&self) -> &str {
        &self.ffmpeg
    }

    /// Check that yt-dlp and ffmpeg both run (`--version` / `-version`).
    /// Returns the yt-dlp version line.
    pub async fn check_available(&self) -> Result<String, FetchError> {
        let version = probe_version(&self.program, "--version").await?;
        let ffmpeg_version = probe_version(&self.ffmpeg, "-version").await?;
        tracing::debug!(%version, ffmpeg = %ffmpeg_version, "fetcher tools available");
        Ok(version)
    }

    /// Command-line arguments for one request.
    pub fn args(&self, request: &FetchRequest<'_>) -> Vec<String> {
        let stem = match request.custom_name {
            // `%` starts a yt-dlp template field; escape it in literal names.
            Some(name) => sanitize_filename(name).replace('%', "%%"),
            None => "%(title)s".to_string(),
        };
        let template = request.output_dir.join(format!("{stem}.%(ext)s"));

        let mut args = vec![
            "--format".to_string(),
            "bestaudio/best".to_string(),
            "--extract-audio".to_string(),
            "--audio-format".to_string(),
            request.format.as_str().to_string(),
            "--audio-quality".to_string(),
            format!("{}K", request.quality.bitrate_kbps()),
            "--output".to_string(),
            template.to_string_lossy().into_owned(),
            "--print".to_string(),
            "after_move:filepath".to_string(),
            "--no-progress".to_string(),
            "--no-playlist".to_string(),
        ];
        if self.ffmpeg != DEFAULT_FFMPEG {
            args.push("--ffmpeg-location".to_string());
            args.push(self.ffmpeg.clone());
        }
        args.extend(self.extra_args.iter().cloned());
        args.push("--".to_string());
        args.push(request.locator.to_string());
        args
    }
}

impl Fetcher for YtDlpFetcher {
    async fn fetch(&self, request: &FetchRequest<'_>) -> Result<PathBuf, FetchError> {
        let platform = Platform::detect(request.locator);
        tracing::debug!(%platform, locator = request.locator, "fetching");

        let args = self.args(request);
        tracing::debug!(program = %self.program, ?args, "spawning fetcher");

        let output = command(&self.program)
            .args(&args)
            .output()
            .await
            .map_err(|source| FetchError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(FetchError::Exit {
                program: self.program.clone(),
                status: output.status.to_string(),
                detail: last_line(&stderr)
                    .unwrap_or("no diagnostic output")
                    .to_string(),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let path = last_line(&stdout)
            .map(PathBuf::from)
            .ok_or(FetchError::MissingOutput)?;

        match tokio::fs::metadata(&path).await {
            Ok(meta) if meta.is_file() => Ok(path),
            _ => Err(FetchError::OutputNotFound(path)),
        }
    }
}

/// Child process for `program`: no stdin, killed if the future is dropped.
fn command(program: &str) -> Command {
    let mut cmd = Command::new(program);
    cmd.stdin(Stdio::null()).kill_on_drop(true);
    // Own process group: a terminal Ctrl-C reaches wavbatch only, so the job in flight finishes.
    #[cfg(unix)]
    cmd.process_group(0);
    cmd
}

async fn probe_version(program: &str, flag: &str) -> Result<String, FetchError> {
    let output = command(program)
        .arg(flag)
        .output()
        .await
        .map_err(|source| FetchError::Spawn {
            program: program.to_string(),
            source,
        })?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(FetchError::Exit {
            program: program.to_string(),
            status: output.status.to_string(),
            detail: last_line(&stderr)
                .unwrap_or("no diagnostic output")
                .to_string(),
        });
    }
    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default()
        .to_string())
}

fn last_line(text: &str) -> Option<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).last()
}
