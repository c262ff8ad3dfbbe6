//! Tool check run before any URL is attempted.

use anyhow::{bail, Result};
use wavbatch_core::fetch::{FetchError, YtDlpFetcher};

/// Fail early, with an install hint, if yt-dlp or ffmpeg cannot be run.
pub(super) async fn ensure_tools(fetcher: &YtDlpFetcher) -> Result<()> {
    match fetcher.check_available().await {
        Ok(version) => {
            tracing::info!(program = fetcher.program(), %version, "fetcher ready");
            Ok(())
        }
        Err(e) => {
            tracing::error!("preflight failed: {e}");
            bail!("{e}\n{}", install_hint(fetcher, &e))
        }
    }
}

fn install_hint(fetcher: &YtDlpFetcher, err: &FetchError) -> &'static str {
    let program = match err {
        FetchError::Spawn { program, .. } | FetchError::Exit { program, .. } => program.as_str(),
        _ => fetcher.program(),
    };
    if program == fetcher.ffmpeg() {
        "ffmpeg is required for audio conversion: install it (e.g. `sudo apt install ffmpeg` or `brew install ffmpeg`) or set `ffmpeg` under [fetcher] in config.toml"
    } else {
        "yt-dlp is required: install it (e.g. `pip install yt-dlp`) or set `program` under [fetcher] in config.toml"
    }
}
