//! `wavbatch status` – show the progress log of the last batch.

use anyhow::Result;
use std::path::Path;
use wavbatch_core::config::WavbatchConfig;
use wavbatch_core::snapshot::ProgressSnapshot;

pub fn run_status(cfg: &WavbatchConfig, output: Option<&Path>) -> Result<()> {
    let path = cfg.snapshot_path(&cfg.output_dir(output));
    let Some(snapshot) = ProgressSnapshot::load_from_path(&path)? else {
        println!("No snapshot found at {}", path.display());
        return Ok(());
    };

    println!("{:<6} {:<11} {}", "LINE", "STATUS", "URL");
    for r in &snapshot.results {
        match r.error_detail() {
            Some(error) => println!(
                "{:<6} {:<11} {}  ({error})",
                r.origin_index(),
                r.status(),
                r.locator()
            ),
            None => println!("{:<6} {:<11} {}", r.origin_index(), r.status(), r.locator()),
        }
    }
    println!();
    println!(
        "{} total, {} completed, {} failed, {} pending (as of {})",
        snapshot.total_urls,
        snapshot.completed,
        snapshot.failed,
        snapshot.pending(),
        snapshot.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
    );
    Ok(())
}
