//! Fresh runs and resume from the last snapshot.

use super::{BatchOptions, BatchOutcome, Orchestrator, OrchestratorError};
use crate::fetch::Fetcher;
use crate::job::{transition, JobId, JobRecord};
use crate::snapshot::ProgressSnapshot;
use crate::store::JobStore;

impl<F: Fetcher, S: JobStore> Orchestrator<F, S> {
    /// Start a run over freshly loaded `records`.
    ///
    /// The store is replaced by `records`. Records that already carry a
    /// status are normalized first: Completed ones are kept and skipped,
    /// Failed (and stale Processing) ones go back to Pending.
    pub async fn start(
        &mut self,
        records: Vec<JobRecord>,
        options: &BatchOptions,
    ) -> Result<BatchOutcome, OrchestratorError> {
        if records.is_empty() {
            return Err(OrchestratorError::EmptyBatch);
        }
        let ids = self.replace_records(records);
        self.run_runnable(ids, options).await
    }

    /// Resume from the snapshot at [`Orchestrator::snapshot_path`].
    ///
    /// Re-runs exactly the Pending and Failed records in their original order.
    /// Completed records are never re-attempted but stay in every snapshot
    /// written by the resumed run.
    pub async fn resume(
        &mut self,
        options: &BatchOptions,
    ) -> Result<BatchOutcome, OrchestratorError> {
        let Some(snapshot) = ProgressSnapshot::load_from_path(&self.snapshot_path)? else {
            tracing::info!("no snapshot found at {}", self.snapshot_path.display());
            return Ok(BatchOutcome::NoSnapshot);
        };
        tracing::info!(
            taken_at = %snapshot.timestamp,
            total = snapshot.total_urls,
            completed = snapshot.completed,
            failed = snapshot.failed,
            "resuming from {}",
            self.snapshot_path.display()
        );
        let ids = self.replace_records(snapshot.results);
        self.run_runnable(ids, options).await
    }

    fn replace_records(&mut self, records: Vec<JobRecord>) -> Vec<JobId> {
        self.store.clear();
        records
            .into_iter()
            .map(|record| self.store.insert(record))
            .collect()
    }

    async fn run_runnable(
        &mut self,
        ids: Vec<JobId>,
        options: &BatchOptions,
    ) -> Result<BatchOutcome, OrchestratorError> {
        let total = ids.len();
        let runnable: Vec<JobId> = ids
            .into_iter()
            .filter(|id| {
                self.store
                    .get_mut(*id)
                    .is_some_and(transition::prepare_for_run)
            })
            .collect();

        if runnable.is_empty() {
            tracing::info!(total, "nothing to do: every job is already completed");
            return Ok(BatchOutcome::NothingToDo);
        }
        tracing::info!("{} of {} job(s) to process", runnable.len(), total);
        self.run_batch(&runnable, options).await.map(BatchOutcome::Ran)
    }
}
