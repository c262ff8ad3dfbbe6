//! `wavbatch run` – convert every URL in a work list.

use anyhow::Result;
use std::path::Path;
use wavbatch_core::config::WavbatchConfig;
use wavbatch_core::orchestrator::BatchOptions;
use wavbatch_core::worklist;

use super::preflight::ensure_tools;
use super::session::Session;

pub async fn run_start(
    cfg: &WavbatchConfig,
    input: &Path,
    output: Option<&Path>,
    options: &BatchOptions,
) -> Result<()> {
    let records = match worklist::load_auto(input) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("could not load work list: {e}");
            eprintln!("Error loading {}: {e}", input.display());
            Vec::new()
        }
    };
    if records.is_empty() {
        println!("No URLs to process");
        return Ok(());
    }
    println!(
        "Loaded {} URL(s) from {} ({}, {} quality)",
        records.len(),
        input.display(),
        options.format,
        options.quality
    );

    let mut session = Session::open(cfg, output)?;
    ensure_tools(session.orch.fetcher()).await?;
    let outcome = session.orch.start(records, options).await?;
    session.finish(outcome).await;
    Ok(())
}
