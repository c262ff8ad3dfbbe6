//! Sequencing driver: one job at a time, snapshot after each, pacing between.

use chrono::Utc;

use super::{BatchOptions, JobEvent, Orchestrator, OrchestratorError};
use super::summary::BatchSummary;
use crate::fetch::{FetchRequest, Fetcher, Platform};
use crate::job::{transition, JobId};
use crate::snapshot::{PersistError, ProgressSnapshot};
use crate::store::JobStore;

/// What happened to one record in the loop.
enum Step {
    Finished,
    Skipped,
}

impl<F: Fetcher, S: JobStore> Orchestrator<F, S> {
    /// Run the records `ids` (in the given order) through the fetcher.
    ///
    /// Fails only before the first job: on an empty batch or an id the store
    /// does not know. Job failures are recorded on their records; snapshot
    /// write failures are logged and counted in the summary.
    pub async fn run_batch(
        &mut self,
        ids: &[JobId],
        options: &BatchOptions,
    ) -> Result<BatchSummary, OrchestratorError> {
        if ids.is_empty() {
            return Err(OrchestratorError::EmptyBatch);
        }
        if let Some(&missing) = ids.iter().find(|id| self.store.get(**id).is_none()) {
            return Err(OrchestratorError::UnknownJob(missing));
        }

        let total = ids.len();
        tracing::info!(
            jobs = total,
            format = %options.format,
            quality = %options.quality,
            output_dir = %self.output_dir.display(),
            snapshot = %self.snapshot_path.display(),
            "starting batch"
        );

        let mut persist_failures = 0usize;
        for (i, &id) in ids.iter().enumerate() {
            if self.control.is_abort_requested() {
                let remaining = total - i;
                tracing::warn!(remaining, "abort requested; stopping before next job");
                self.emit(JobEvent::Aborted { remaining }).await;
                break;
            }

            let position = i + 1;
            if let Step::Skipped = self.run_one(id, position, total, options).await {
                continue;
            }

            if let Err(e) = self.persist() {
                persist_failures += 1;
                tracing::error!(error = %e, "failed to save progress snapshot; resume data is stale");
                self.emit(JobEvent::PersistFailed {
                    error: e.to_string(),
                })
                .await;
            }

            if position < total && !options.delay.is_zero() {
                tracing::debug!(delay = ?options.delay, "waiting before next job");
                self.emit(JobEvent::Waiting {
                    delay: options.delay,
                })
                .await;
                self.control.pace(options.delay).await;
            }
        }

        let mut summary = BatchSummary::from_records(ids.iter().filter_map(|id| self.store.get(*id)));
        summary.persist_failures = persist_failures;
        tracing::info!(
            total = summary.total,
            completed = summary.completed,
            failed = summary.failed,
            not_attempted = summary.not_attempted,
            success_rate = %summary.success_rate_text(),
            "batch finished"
        );
        Ok(summary)
    }

    async fn run_one(
        &mut self,
        id: JobId,
        position: usize,
        total: usize,
        options: &BatchOptions,
    ) -> Step {
        let Some(record) = self.store.get_mut(id) else {
            return Step::Skipped;
        };
        if let Err(e) = transition::start(record, Utc::now()) {
            tracing::warn!("[{position}/{total}] skipping: {e}");
            return Step::Skipped;
        }
        let locator = record.locator().to_string();
        let line = record.origin_index();
        let platform = Platform::detect(&locator);

        tracing::info!(%platform, line, "[{position}/{total}] processing {locator}");
        self.emit(JobEvent::Started {
            position,
            total,
            locator: locator.clone(),
            platform,
        })
        .await;

        let request = FetchRequest {
            locator: &locator,
            output_dir: &self.output_dir,
            format: options.format,
            quality: options.quality,
            custom_name: None,
        };
        let result = self.fetcher.fetch(&request).await;

        let Some(record) = self.store.get_mut(id) else {
            return Step::Skipped;
        };
        let now = Utc::now();
        let event = match result {
            Ok(output_path) => {
                tracing::info!("[{position}/{total}] completed: {}", output_path.display());
                if let Err(e) = transition::complete(record, output_path.clone(), now) {
                    tracing::error!("{e}");
                }
                JobEvent::Completed {
                    position,
                    total,
                    locator,
                    output_path,
                }
            }
            Err(e) => {
                let error = e.to_string();
                tracing::warn!("[{position}/{total}] failed: {locator}: {error}");
                if let Err(e) = transition::fail(record, error.clone(), now) {
                    tracing::error!("{e}");
                }
                JobEvent::Failed {
                    position,
                    total,
                    locator,
                    error,
                }
            }
        };
        self.emit(event).await;
        Step::Finished
    }

    /// Write every record in the store (not only this batch) as a snapshot.
    fn persist(&self) -> Result<(), PersistError> {
        let records = self.store.records().into_iter().cloned().collect();
        ProgressSnapshot::new(records, Utc::now()).save_to_path(&self.snapshot_path)
    }
}
