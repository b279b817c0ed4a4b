//! Scheduler loop tests.

use crate::alert::services::AlertDispatcher;
use crate::check::adapters::ScriptedProbe;
use crate::check::domain::{CheckDefinition, CheckName};
use crate::check::services::CheckRunner;
use crate::pipeline::services::{HealthPipeline, Scheduler};
use crate::report::services::ReportRenderer;
use crate::status::adapters::InMemoryStatusRepository;
use crate::status::services::StatusStore;
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;
use std::time::Duration;

type TestScheduler = Scheduler<InMemoryStatusRepository, DefaultClock>;

fn scheduler(probe: ScriptedProbe, interval: Duration) -> (TestScheduler, tempfile::TempDir) {
    let dir = tempfile::tempdir().expect("temp dir");
    let clock = Arc::new(DefaultClock);
    let definition = CheckDefinition::new(
        CheckName::new("homepage").expect("valid name"),
        Arc::new(probe),
        Duration::from_secs(5),
    )
    .expect("valid definition");
    let pipeline = HealthPipeline::new(
        CheckRunner::new(Arc::clone(&clock)).with_silent(true),
        StatusStore::new(Arc::new(InMemoryStatusRepository::new()), Arc::clone(&clock)),
        ReportRenderer::new(Arc::clone(&clock)),
        AlertDispatcher::new(Arc::clone(&clock)),
        vec![definition],
        dir.path().join("dashboard.html"),
        clock,
    );
    (Scheduler::new(pipeline, interval), dir)
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn loop_runs_repeatedly_until_shutdown() {
    let probe = ScriptedProbe::healthy("200 OK");
    let counter = probe.clone();
    let (scheduler, _dir) = scheduler(probe, Duration::from_millis(20));
    let (sender, receiver) = TestScheduler::shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(receiver).await });
    tokio::time::sleep(Duration::from_millis(110)).await;
    sender.send(true).expect("signal shutdown");

    let completed = handle.await.expect("scheduler task");
    assert!(completed >= 2, "expected repeated runs, got {completed}");
    assert_eq!(counter.invocations(), completed);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn dropping_the_sender_stops_the_loop() {
    let (scheduler, _dir) = scheduler(ScriptedProbe::healthy("200 OK"), Duration::from_millis(20));
    let (sender, receiver) = TestScheduler::shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(receiver).await });
    tokio::time::sleep(Duration::from_millis(50)).await;
    drop(sender);

    let completed = handle.await.expect("scheduler task");
    assert!(completed >= 1);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_runs_do_not_stop_the_loop() {
    let probe = ScriptedProbe::failing("bad target");
    let counter = probe.clone();
    let (scheduler, _dir) = scheduler(probe, Duration::from_millis(20));
    let (sender, receiver) = TestScheduler::shutdown_channel();

    let handle = tokio::spawn(async move { scheduler.run(receiver).await });
    tokio::time::sleep(Duration::from_millis(110)).await;
    sender.send(true).expect("signal shutdown");

    handle.await.expect("scheduler task");
    assert!(counter.invocations() >= 2);
}
