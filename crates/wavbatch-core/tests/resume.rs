//! Resuming a batch from its last progress snapshot.

mod common;

use std::sync::Arc;

use common::{no_delay, records, ScriptedFetcher};
use tempfile::tempdir;
use wavbatch_core::control::RunControl;
use wavbatch_core::job::JobStatus;
use wavbatch_core::orchestrator::{BatchOutcome, Orchestrator, OrchestratorError};
use wavbatch_core::snapshot::{ProgressSnapshot, SnapshotReadError};
use wavbatch_core::store::MemoryJobStore;

const MIXED_LOG: &str = r#"{
  "timestamp": "2024-05-01T10:00:09Z",
  "total_urls": 5,
  "completed": 2,
  "failed": 2,
  "results": [
    {"url": "https://youtu.be/a", "line_number": 1, "status": "completed",
     "output_file": "/music/a.wav", "start_time": "2024-05-01T10:00:00Z", "end_time": "2024-05-01T10:00:02Z"},
    {"url": "https://youtu.be/b", "line_number": 2, "status": "failed",
     "error": "Download failed", "start_time": "2024-05-01T10:00:04Z", "end_time": "2024-05-01T10:00:05Z"},
    {"url": "https://youtu.be/c", "line_number": 3, "status": "pending"},
    {"url": "https://youtu.be/d", "line_number": 5, "status": "completed",
     "output_file": "/music/d.wav", "start_time": "2024-05-01T10:00:06Z", "end_time": "2024-05-01T10:00:07Z"},
    {"url": "https://youtu.be/e", "line_number": 6, "status": "failed",
     "error": "Private video", "start_time": "2024-05-01T10:00:08Z", "end_time": "2024-05-01T10:00:09Z"}
  ]
}"#;

#[tokio::test]
async fn no_snapshot_means_nothing_to_resume() {
    let out = tempdir().unwrap();
    let mut orch = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());

    let outcome = orch.resume(&no_delay()).await.unwrap();
    assert_eq!(outcome, BatchOutcome::NoSnapshot);
    assert!(orch.fetcher().calls().is_empty());
    assert!(!orch.snapshot_path().exists());
}

#[tokio::test]
async fn fully_completed_snapshot_does_no_work() {
    let out = tempdir().unwrap();
    let mut first = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    first
        .start(records(&["https://youtu.be/x", "https://youtu.be/y"]), &no_delay())
        .await
        .unwrap();
    let before = std::fs::read(first.snapshot_path()).unwrap();

    let mut orch = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    let outcome = orch.resume(&no_delay()).await.unwrap();
    assert_eq!(outcome, BatchOutcome::NothingToDo);
    assert!(orch.fetcher().calls().is_empty());
    assert_eq!(std::fs::read(orch.snapshot_path()).unwrap(), before);
}

#[tokio::test]
async fn retries_exactly_failed_and_pending_in_order() {
    let out = tempdir().unwrap();
    let snapshot_path = out.path().join("batch_log.json");
    std::fs::write(&snapshot_path, MIXED_LOG).unwrap();
    let before = ProgressSnapshot::load_from_path(&snapshot_path)
        .unwrap()
        .unwrap();

    let mut orch = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    let BatchOutcome::Ran(summary) = orch.resume(&no_delay()).await.unwrap() else {
        panic!("expected a run");
    };
    assert_eq!(summary.total, 3);
    assert_eq!(summary.completed, 3);
    assert_eq!(
        orch.fetcher().calls(),
        ["https://youtu.be/b", "https://youtu.be/c", "https://youtu.be/e"]
    );

    let after = ProgressSnapshot::load_from_path(&snapshot_path)
        .unwrap()
        .unwrap();
    assert_eq!(after.total_urls, 5);
    assert_eq!(after.completed, 5);
    assert_eq!(after.results[0], before.results[0]);
    assert_eq!(after.results[3], before.results[3]);
    let order: Vec<_> = after.results.iter().map(|r| r.origin_index()).collect();
    assert_eq!(order, [1, 2, 3, 5, 6]);
    assert!(after.results[1].error_detail().is_none());
    assert!(after.results[1].started_at() > before.results[1].started_at());
}

#[tokio::test]
async fn retry_that_fails_again_records_the_new_error() {
    let out = tempdir().unwrap();
    let snapshot_path = out.path().join("batch_log.json");
    std::fs::write(&snapshot_path, MIXED_LOG).unwrap();

    let fetcher = ScriptedFetcher::new().failing(&["https://youtu.be/e"]);
    let mut orch = Orchestrator::new(fetcher, MemoryJobStore::new(), out.path());
    let BatchOutcome::Ran(summary) = orch.resume(&no_delay()).await.unwrap() else {
        panic!("expected a run");
    };
    assert_eq!((summary.completed, summary.failed), (2, 1));

    let after = ProgressSnapshot::load_from_path(&snapshot_path)
        .unwrap()
        .unwrap();
    let e = &after.results[4];
    assert_eq!(e.status(), JobStatus::Failed);
    assert!(e.error_detail().unwrap().contains("unsupported source"));
    assert_eq!((after.completed, after.failed), (4, 1));
}

#[tokio::test]
async fn interrupted_run_resumes_where_it_stopped() {
    let out = tempdir().unwrap();
    let urls = [
        "https://youtu.be/1",
        "https://youtu.be/2",
        "https://youtu.be/3",
        "https://youtu.be/4",
    ];

    let control = Arc::new(RunControl::new());
    let fetcher = ScriptedFetcher::new().aborting_during(urls[1], Arc::clone(&control));
    let mut first = Orchestrator::new(fetcher, MemoryJobStore::new(), out.path())
        .with_control(control);
    first.start(records(&urls), &no_delay()).await.unwrap();
    assert_eq!(first.fetcher().calls().len(), 2);

    let mut second = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    second.resume(&no_delay()).await.unwrap();
    assert_eq!(second.fetcher().calls(), &urls[2..]);

    let snap = ProgressSnapshot::load_from_path(second.snapshot_path())
        .unwrap()
        .unwrap();
    assert_eq!((snap.total_urls, snap.completed, snap.failed), (4, 4, 0));
}

#[tokio::test]
async fn resumes_log_with_naive_timestamps_and_stale_processing() {
    let out = tempdir().unwrap();
    let snapshot_path = out.path().join("batch_log.json");
    std::fs::write(
        &snapshot_path,
        r#"{
          "timestamp": "2024-05-01T10:00:09.123456",
          "total_urls": 3,
          "completed": 1,
          "failed": 0,
          "results": [
            {"url": "https://youtu.be/a", "line_number": 1, "status": "completed",
             "output_file": "/music/a.wav", "error": null,
             "start_time": "2024-05-01T10:00:00.000001", "end_time": "2024-05-01T10:00:02.5"},
            {"url": "https://youtu.be/b", "line_number": 2, "status": "processing",
             "start_time": "2024-05-01T10:00:04.1"},
            {"url": "https://youtu.be/c", "line_number": 3, "status": "pending"}
          ]
        }"#,
    )
    .unwrap();

    let mut orch = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    let BatchOutcome::Ran(summary) = orch.resume(&no_delay()).await.unwrap() else {
        panic!("expected a run");
    };
    assert_eq!(summary.completed, 2);
    assert_eq!(
        orch.fetcher().calls(),
        ["https://youtu.be/b", "https://youtu.be/c"]
    );
}

#[tokio::test]
async fn corrupt_snapshot_is_an_error() {
    let out = tempdir().unwrap();
    std::fs::write(out.path().join("batch_log.json"), "{ not json").unwrap();

    let mut orch = Orchestrator::new(ScriptedFetcher::new(), MemoryJobStore::new(), out.path());
    let err = orch.resume(&no_delay()).await.unwrap_err();
    assert!(matches!(
        err,
        OrchestratorError::Snapshot(SnapshotReadError::Parse { .. })
    ));
    assert!(orch.fetcher().calls().is_empty());
}
