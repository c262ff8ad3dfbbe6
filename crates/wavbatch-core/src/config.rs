use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fetch::{Format, Quality, YtDlpFetcher, DEFAULT_FFMPEG};
use crate::orchestrator::BatchOptions;
use crate::snapshot::DEFAULT_SNAPSHOT_FILE;

/// Fetcher settings (optional section in config.toml).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetcherConfig {
    /// Executable to run; resolved through `PATH` unless absolute.
    pub program: String,
    /// ffmpeg used for conversion; checked before a run.
    #[serde(default = "default_ffmpeg")]
    pub ffmpeg: String,
    /// Extra arguments passed before the locator (cookies, proxy, rate limit, ...).
    #[serde(default)]
    pub extra_args: Vec<String>,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            program: "yt-dlp".to_string(),
            ffmpeg: default_ffmpeg(),
            extra_args: Vec::new(),
        }
    }
}

fn default_ffmpeg() -> String {
    DEFAULT_FFMPEG.to_string()
}

/// Global configuration loaded from `~/.config/wavbatch/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WavbatchConfig {
    /// Directory for converted audio and the progress snapshot.
    pub output_dir: PathBuf,
    /// Default output format.
    pub format: Format,
    /// Default quality tier.
    pub quality: Quality,
    /// Seconds to wait between consecutive jobs.
    pub delay_secs: u64,
    /// Snapshot file name inside `output_dir`.
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
    /// Optional fetcher section; if missing, `yt-dlp` from `PATH` is used.
    #[serde(default)]
    pub fetcher: Option<FetcherConfig>,
}

fn default_snapshot_file() -> String {
    DEFAULT_SNAPSHOT_FILE.to_string()
}

impl Default for WavbatchConfig {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./downloads"),
            format: Format::Wav,
            quality: Quality::Best,
            delay_secs: 2,
            snapshot_file: default_snapshot_file(),
            fetcher: None,
        }
    }
}

impl WavbatchConfig {
    /// Batch options from config defaults, overridden by any explicit values.
    pub fn batch_options(
        &self,
        format: Option<Format>,
        quality: Option<Quality>,
        delay_secs: Option<u64>,
    ) -> BatchOptions {
        BatchOptions {
            format: format.unwrap_or(self.format),
            quality: quality.unwrap_or(self.quality),
            delay: Duration::from_secs(delay_secs.unwrap_or(self.delay_secs)),
        }
    }

    /// Output directory: explicit override or the configured one.
    pub fn output_dir(&self, output: Option<&Path>) -> PathBuf {
        output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.output_dir.clone())
    }

    pub fn snapshot_path(&self, output_dir: &Path) -> PathBuf {
        crate::snapshot::snapshot_path(output_dir, &self.snapshot_file)
    }

    pub fn build_fetcher(&self) -> YtDlpFetcher {
        let fc = self.fetcher.clone().unwrap_or_default();
        YtDlpFetcher::new(fc.program)
            .with_ffmpeg(fc.ffmpeg)
            .with_extra_args(fc.extra_args)
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("wavbatch")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<WavbatchConfig> {
    load_or_init_at(&config_path()?)
}

/// Same as [`load_or_init`] for an explicit path.
pub fn load_or_init_at(path: &Path) -> Result<WavbatchConfig> {
    if !path.exists() {
        let default_cfg = WavbatchConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }

    let data = fs::read_to_string(path)?;
    let cfg: WavbatchConfig = toml::from_str(&data)?;
    Ok(cfg)
}
