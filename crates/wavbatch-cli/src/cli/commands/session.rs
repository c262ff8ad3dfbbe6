//! Shared setup for `run` and `resume`: orchestrator, Ctrl-C, progress output.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use wavbatch_core::config::WavbatchConfig;
use wavbatch_core::control::RunControl;
use wavbatch_core::fetch::YtDlpFetcher;
use wavbatch_core::orchestrator::{BatchOutcome, JobEvent, Orchestrator};
use wavbatch_core::store::MemoryJobStore;

pub(super) type CliOrchestrator = Orchestrator<YtDlpFetcher, MemoryJobStore>;

/// An orchestrator wired to Ctrl-C and a stdout progress printer.
pub(super) struct Session {
    pub orch: CliOrchestrator,
    printer: JoinHandle<()>,
}

impl Session {
    pub fn open(cfg: &WavbatchConfig, output: Option<&Path>) -> Result<Self> {
        let output_dir = cfg.output_dir(output);
        std::fs::create_dir_all(&output_dir)
            .with_context(|| format!("create output directory {}", output_dir.display()))?;

        let control = Arc::new(RunControl::new());
        spawn_ctrl_c_handler(Arc::clone(&control));

        let (progress_tx, progress_rx) = mpsc::channel::<JobEvent>(16);
        let printer = tokio::spawn(print_progress(progress_rx));

        let orch = Orchestrator::new(cfg.build_fetcher(), MemoryJobStore::new(), output_dir.clone())
            .with_snapshot_path(cfg.snapshot_path(&output_dir))
            .with_control(control)
            .with_progress(progress_tx);
        Ok(Self { orch, printer })
    }

    /// Wait for the printer to drain, then print the outcome.
    pub async fn finish(mut self, outcome: BatchOutcome) {
        drop(self.orch.take_progress());
        let _ = self.printer.await;

        match outcome {
            BatchOutcome::Ran(summary) => {
                println!();
                println!("{}", "=".repeat(50));
                println!("BATCH SUMMARY");
                println!("{}", "=".repeat(50));
                println!("{summary}");
                println!();
                println!("Detailed log saved to: {}", self.orch.snapshot_path().display());
            }
            BatchOutcome::NothingToDo => println!("No pending URLs to process"),
            BatchOutcome::NoSnapshot => println!(
                "No snapshot found at {}",
                self.orch.snapshot_path().display()
            ),
        }
    }
}

fn spawn_ctrl_c_handler(control: Arc<RunControl>) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            eprintln!("\nInterrupted: stopping after the current URL (run `wavbatch resume` to continue)");
            tracing::warn!("ctrl-c received; abort requested");
            control.request_abort();
        }
    });
}

async fn print_progress(mut rx: mpsc::Receiver<JobEvent>) {
    while let Some(event) = rx.recv().await {
        match event {
            JobEvent::Started {
                position,
                total,
                locator,
                platform,
            } => println!("[{position}/{total}] Processing ({platform}): {locator}"),
            JobEvent::Completed { output_path, .. } => {
                println!("  ✓ Saved: {}", output_path.display())
            }
            JobEvent::Failed { error, .. } => println!("  ✗ Failed: {error}"),
            JobEvent::Waiting { delay } => {
                println!("  Waiting {}s before next URL...", delay.as_secs_f64())
            }
            JobEvent::PersistFailed { error } => {
                eprintln!("  WARNING: could not save progress log: {error}")
            }
            JobEvent::Aborted { remaining } => {
                println!("Stopped early; {remaining} URL(s) left for `wavbatch resume`")
            }
        }
    }
}
