//! `wavbatch fetch` – convert URLs directly, without a progress log.

use anyhow::{bail, Context, Result};
use std::path::Path;
use wavbatch_core::config::WavbatchConfig;
use wavbatch_core::fetch::{FetchRequest, Fetcher, Platform};
use wavbatch_core::orchestrator::BatchOptions;

use super::preflight::ensure_tools;

pub async fn run_fetch(
    cfg: &WavbatchConfig,
    urls: &[String],
    output: Option<&Path>,
    options: &BatchOptions,
    name: Option<&str>,
) -> Result<()> {
    if name.is_some() && urls.len() > 1 {
        bail!("--name can only be used with a single URL");
    }
    let output_dir = cfg.output_dir(output);
    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("create output directory {}", output_dir.display()))?;

    let fetcher = cfg.build_fetcher();
    ensure_tools(&fetcher).await?;
    let mut failed = 0usize;
    for url in urls {
        println!("Processing ({}): {url}", Platform::detect(url));
        let request = FetchRequest {
            locator: url,
            output_dir: &output_dir,
            format: options.format,
            quality: options.quality,
            custom_name: name,
        };
        match fetcher.fetch(&request).await {
            Ok(path) => println!("  ✓ Saved: {}", path.display()),
            Err(e) => {
                tracing::warn!("fetch failed for {url}: {e}");
                println!("  ✗ Failed: {e}");
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{failed} of {} URL(s) failed", urls.len());
    }
    Ok(())
}
