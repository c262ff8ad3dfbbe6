//! `wavbatch resume` – continue the last batch from its progress log.

use anyhow::Result;
use std::path::Path;
use wavbatch_core::config::WavbatchConfig;
use wavbatch_core::orchestrator::BatchOptions;

use super::preflight::ensure_tools;
use super::session::Session;

pub async fn run_resume(
    cfg: &WavbatchConfig,
    output: Option<&Path>,
    options: &BatchOptions,
) -> Result<()> {
    let mut session = Session::open(cfg, output)?;
    if session.orch.snapshot_path().exists() {
        ensure_tools(session.orch.fetcher()).await?;
    }
    println!("Resuming from {}", session.orch.snapshot_path().display());
    let outcome = session.orch.resume(options).await?;
    session.finish(outcome).await;
    Ok(())
}
