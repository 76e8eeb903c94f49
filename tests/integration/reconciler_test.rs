//! Reconciliation passes end to end: store, window, and dispatcher together.

use std::sync::Arc;

use chrono::Duration;

use printsrv_core::types::Timestamp;
use printsrv_worker::reconciler::{STATUS_NO_PAYLOAD, STATUS_RETRY_SUCCEEDED};
use printsrv_worker::{Reconciler, WindowPolicy};

use tokio::time::timeout;

use crate::helpers::{
    JOB_ID, ParkedDispatcher, RowDeletingDispatcher, ScriptedDispatcher, TestStore, now_plus,
    shift,
};

fn reconciler(ctx: &TestStore, dispatcher: Arc<ScriptedDispatcher>) -> Reconciler {
    Reconciler::new(
        ctx.store.clone(),
        dispatcher,
        JOB_ID,
        WindowPolicy::standard(),
    )
}

#[tokio::test]
async fn test_failed_retry_records_reason_and_leaves_entry_open() {
    let ctx = TestStore::new().await;
    let entry = ctx.store.create(b"receipt").await.unwrap();
    let dispatcher = ScriptedDispatcher::failing();

    let now = now_plus(2);
    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass_at(now)
        .await
        .unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(report.failed, 1);
    assert_eq!(report.delivered, 0);
    assert_eq!(dispatcher.sent(), vec![b"receipt".to_vec()]);

    let stored = ctx.store.get(entry.id).await.unwrap();
    assert!(stored.completed_at.is_none());
    assert_eq!(
        stored.status.as_deref(),
        Some("failed on retry: rejected: printer offline")
    );
    assert_eq!(ctx.store.get_checkpoint(JOB_ID).await.unwrap(), Some(now));
}

#[tokio::test]
async fn test_successful_retry_completes_entry() {
    let ctx = TestStore::new().await;
    let entry = ctx.store.create(b"receipt").await.unwrap();
    let dispatcher = ScriptedDispatcher::succeeding();

    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass_at(now_plus(2))
        .await
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert_eq!(dispatcher.calls(), 1);

    let stored = ctx.store.get(entry.id).await.unwrap();
    assert!(stored.completed_at.is_some());
    assert_eq!(stored.status.as_deref(), Some(STATUS_RETRY_SUCCEEDED));
    assert_eq!(ctx.store.count_incomplete().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_payload_is_recorded_without_dispatch() {
    let ctx = TestStore::new().await;
    let absent = ctx.seed(now_plus(-60), None, None).await;
    let empty = ctx.seed(now_plus(-50), None, Some(b"")).await;
    let dispatcher = ScriptedDispatcher::succeeding();

    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass()
        .await
        .unwrap();

    assert_eq!(report.anomalies, 2);
    assert_eq!(dispatcher.calls(), 0);

    for id in [absent.id, empty.id] {
        let stored = ctx.store.get(id).await.unwrap();
        assert_eq!(stored.status.as_deref(), Some(STATUS_NO_PAYLOAD));
        assert!(stored.completed_at.is_none());
    }
}

#[tokio::test]
async fn test_entry_at_window_end_waits_for_next_pass() {
    let ctx = TestStore::new().await;
    let dispatcher = ScriptedDispatcher::succeeding();
    let reconciler = reconciler(&ctx, dispatcher.clone());

    let now = now_plus(-600);
    let entry = ctx.seed(now, None, Some(b"late")).await;

    let first = reconciler.run_pass_at(now).await.unwrap();
    assert_eq!(first.scanned, 0);
    assert_eq!(dispatcher.calls(), 0);
    assert_eq!(ctx.store.get_checkpoint(JOB_ID).await.unwrap(), Some(now));

    let second = reconciler.run_pass_at(shift(now, 60)).await.unwrap();
    assert_eq!(second.scanned, 1);
    assert_eq!(second.delivered, 1);
    assert!(ctx.store.get(entry.id).await.unwrap().completed_at.is_some());
}

#[tokio::test]
async fn test_completed_entries_are_never_redispatched() {
    let ctx = TestStore::new().await;
    ctx.seed(now_plus(-120), Some(now_plus(-119)), Some(b"done"))
        .await;
    let dispatcher = ScriptedDispatcher::succeeding();

    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass()
        .await
        .unwrap();

    assert_eq!(report.scanned, 0);
    assert_eq!(dispatcher.calls(), 0);
}

#[tokio::test]
async fn test_stale_checkpoint_is_capped_by_lookback() {
    let ctx = TestStore::new().await;
    let now = Timestamp::now();
    ctx.store
        .set_checkpoint(JOB_ID, now - Duration::days(30))
        .await
        .unwrap();

    let too_old = ctx
        .seed(now - Duration::days(10), None, Some(b"ten days"))
        .await;
    let recent = ctx
        .seed(now - Duration::days(3), None, Some(b"three days"))
        .await;
    let dispatcher = ScriptedDispatcher::succeeding();

    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass_at(now)
        .await
        .unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(dispatcher.sent(), vec![b"three days".to_vec()]);
    assert!(ctx.store.get(recent.id).await.unwrap().completed_at.is_some());
    assert!(ctx.store.get(too_old.id).await.unwrap().completed_at.is_none());
}

#[tokio::test]
async fn test_recent_checkpoint_limits_scan_to_new_entries() {
    let ctx = TestStore::new().await;
    let now = Timestamp::now();
    ctx.store
        .set_checkpoint(JOB_ID, now - Duration::minutes(1))
        .await
        .unwrap();

    ctx.seed(now - Duration::minutes(10), None, Some(b"covered before"))
        .await;
    ctx.seed(now - Duration::seconds(30), None, Some(b"new"))
        .await;
    let dispatcher = ScriptedDispatcher::succeeding();

    reconciler(&ctx, dispatcher.clone())
        .run_pass_at(now)
        .await
        .unwrap();

    assert_eq!(dispatcher.sent(), vec![b"new".to_vec()]);
}

#[tokio::test]
async fn test_one_failure_does_not_abort_the_sweep() {
    let ctx = TestStore::new().await;
    let first = ctx.seed(now_plus(-30), None, Some(b"good-1")).await;
    let bad = ctx.seed(now_plus(-20), None, Some(b"bad")).await;
    let last = ctx.seed(now_plus(-10), None, Some(b"good-2")).await;
    let dispatcher = ScriptedDispatcher::failing_on(b"bad");

    let now = Timestamp::now();
    let report = reconciler(&ctx, dispatcher.clone())
        .run_pass_at(now)
        .await
        .unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.delivered, 2);
    assert_eq!(report.failed, 1);
    assert_eq!(report.write_errors, 0);

    assert!(ctx.store.get(first.id).await.unwrap().completed_at.is_some());
    assert!(ctx.store.get(last.id).await.unwrap().completed_at.is_some());
    assert!(ctx.store.get(bad.id).await.unwrap().completed_at.is_none());
    assert_eq!(ctx.store.get_checkpoint(JOB_ID).await.unwrap(), Some(now));
}

#[tokio::test]
async fn test_rerunning_a_processed_window_is_harmless() {
    let ctx = TestStore::new().await;
    ctx.seed(now_plus(-30), None, Some(b"once")).await;
    let dispatcher = ScriptedDispatcher::succeeding();
    let reconciler = reconciler(&ctx, dispatcher.clone());

    let now = Timestamp::now();
    reconciler.run_pass_at(now).await.unwrap();
    assert_eq!(dispatcher.calls(), 1);

    // Rewind so the next pass covers the same span again.
    ctx.store
        .set_checkpoint(JOB_ID, now - Duration::hours(1))
        .await
        .unwrap();
    let report = reconciler.run_pass_at(now).await.unwrap();

    assert_eq!(report.scanned, 0);
    assert_eq!(dispatcher.calls(), 1);
}

#[tokio::test]
async fn test_slow_dispatch_does_not_block_writers() {
    let ctx = TestStore::new().await;
    let pending = ctx.seed(now_plus(-30), None, Some(b"slow")).await;
    let dispatcher = Arc::new(ParkedDispatcher::default());
    let reconciler = Arc::new(Reconciler::new(
        ctx.store.clone(),
        dispatcher.clone(),
        JOB_ID,
        WindowPolicy::standard(),
    ));

    let pass = tokio::spawn({
        let reconciler = Arc::clone(&reconciler);
        async move { reconciler.run_pass().await }
    });

    timeout(std::time::Duration::from_secs(5), dispatcher.entered.notified())
        .await
        .expect("dispatch never started");

    let writer = tokio::spawn({
        let store = ctx.store.clone();
        async move { store.create(b"request path").await }
    });
    let created = timeout(std::time::Duration::from_secs(5), writer)
        .await
        .expect("writer blocked behind an in-flight dispatch")
        .unwrap()
        .unwrap();
    assert!(ctx.store.get(created.id).await.unwrap().completed_at.is_none());

    dispatcher.release.notify_one();
    let report = timeout(std::time::Duration::from_secs(5), pass)
        .await
        .expect("pass never finished")
        .unwrap()
        .unwrap();

    assert_eq!(report.delivered, 1);
    assert!(ctx.store.get(pending.id).await.unwrap().completed_at.is_some());
}

#[tokio::test]
async fn test_write_failure_on_one_entry_does_not_abort_the_sweep() {
    let ctx = TestStore::new().await;
    let first = ctx.seed(now_plus(-30), None, Some(b"keep-1")).await;
    let vanishing = ctx.seed(now_plus(-20), None, Some(b"vanish")).await;
    let last = ctx.seed(now_plus(-10), None, Some(b"keep-2")).await;
    let dispatcher = RowDeletingDispatcher::new(ctx.raw_pool().await, b"vanish");

    let now = Timestamp::now();
    let report = Reconciler::new(
        ctx.store.clone(),
        dispatcher.clone(),
        JOB_ID,
        WindowPolicy::standard(),
    )
    .run_pass_at(now)
    .await
    .unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.write_errors, 1);
    assert_eq!(report.delivered, 2);
    assert_eq!(dispatcher.sent().len(), 3);

    assert!(ctx.store.get(vanishing.id).await.unwrap_err().is_not_found());
    assert!(ctx.store.get(first.id).await.unwrap().completed_at.is_some());
    assert!(ctx.store.get(last.id).await.unwrap().completed_at.is_some());
    assert_eq!(ctx.store.get_checkpoint(JOB_ID).await.unwrap(), Some(now));
}
