//! Full-run orchestration tests.

use crate::alert::adapters::RecordingIssueTracker;
use crate::alert::domain::AlertLevel;
use crate::alert::services::AlertDispatcher;
use crate::check::adapters::ScriptedProbe;
use crate::check::domain::{CheckDefinition, CheckName};
use crate::check::services::CheckRunner;
use crate::pipeline::services::HealthPipeline;
use crate::report::services::ReportRenderer;
use crate::status::adapters::InMemoryStatusRepository;
use crate::status::services::StatusStore;
use mockable::DefaultClock;
use rstest::rstest;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

fn check(name: &str, probe: ScriptedProbe) -> CheckDefinition {
    CheckDefinition::new(
        CheckName::new(name).expect("valid name"),
        Arc::new(probe),
        Duration::from_secs(5),
    )
    .expect("valid definition")
}

struct Harness {
    pipeline: HealthPipeline<InMemoryStatusRepository, DefaultClock>,
    tracker: Arc<RecordingIssueTracker>,
    repository: Arc<InMemoryStatusRepository>,
    report_path: PathBuf,
    _dir: tempfile::TempDir,
}

fn harness(definitions: Vec<CheckDefinition>) -> Harness {
    let dir = tempfile::tempdir().expect("temp dir");
    let report_path = dir.path().join("dashboard.html");
    let clock = Arc::new(DefaultClock);
    let repository = Arc::new(InMemoryStatusRepository::new());
    let tracker = Arc::new(RecordingIssueTracker::new());
    let pipeline = HealthPipeline::new(
        CheckRunner::new(Arc::clone(&clock)),
        StatusStore::new(Arc::clone(&repository), Arc::clone(&clock)),
        ReportRenderer::new(Arc::clone(&clock)),
        AlertDispatcher::new(Arc::clone(&clock))
            .with_issue_tracker(Arc::clone(&tracker) as Arc<dyn crate::alert::ports::IssueTracker>),
        definitions,
        &report_path,
        clock,
    );
    Harness {
        pipeline,
        tracker,
        repository,
        report_path,
        _dir: dir,
    }
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn one_failing_check_raises_a_single_aggregate_error_alert() {
    let harness = harness(vec![
        check("homepage", ScriptedProbe::healthy("200 OK")),
        check("api", ScriptedProbe::healthy("200 OK")),
        check("payments", ScriptedProbe::unhealthy("HTTP 500")),
    ]);

    let outcome = harness.pipeline.run_once().await.expect("run succeeds");

    assert_eq!(outcome.summary().failure_tally(), 1);
    assert!(!outcome.summary().all_passed());
    let dispatch = outcome.dispatch().expect("alert dispatched");
    assert!(dispatch.issue.is_delivered());

    let created = harness.tracker.created();
    assert_eq!(created.len(), 1);
    let issue = created.first().expect("one issue");
    assert!(issue.title.contains("[error]"));
    assert!(issue.title.contains("1 of 3 checks failing: payments"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn all_checks_failing_escalates_to_critical() {
    let harness = harness(vec![
        check("homepage", ScriptedProbe::unhealthy("HTTP 503")),
        check("api", ScriptedProbe::failing("bad target")),
    ]);

    let outcome = harness.pipeline.run_once().await.expect("run succeeds");

    assert_eq!(outcome.summary().failure_tally(), 2);
    let created = harness.tracker.created();
    let issue = created.first().expect("one issue");
    assert_eq!(issue.labels, vec![AlertLevel::Critical.as_str().to_owned()]);
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn passing_run_dispatches_nothing_and_writes_the_dashboard() {
    let harness = harness(vec![check("homepage", ScriptedProbe::healthy("200 OK"))]);

    let outcome = harness.pipeline.run_once().await.expect("run succeeds");

    assert!(outcome.summary().all_passed());
    assert!(outcome.dispatch().is_none());
    assert!(harness.tracker.created().is_empty());

    let html = std::fs::read_to_string(&harness.report_path).expect("dashboard written");
    assert!(html.contains("homepage"));
    assert!(html.contains("1/1 checks passing"));
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn run_persists_merged_results_before_rendering() {
    use crate::status::ports::StatusRepository;

    let harness = harness(vec![
        check("homepage", ScriptedProbe::healthy("200 OK")),
        check("api", ScriptedProbe::unhealthy("HTTP 500")),
    ]);

    harness.pipeline.run_once().await.expect("run succeeds");

    let document = harness.repository.load().await.expect("load");
    let homepage = document.get("homepage").expect("homepage record");
    assert!(homepage.last_success_at().is_some());
    let api = document.get("api").expect("api record");
    assert!(api.last_success_at().is_none());
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_failing_runs_are_deduplicated() {
    let harness = harness(vec![check("api", ScriptedProbe::unhealthy("HTTP 500"))]);

    harness.pipeline.run_once().await.expect("first run");
    harness.pipeline.run_once().await.expect("second run");

    assert_eq!(harness.tracker.created().len(), 1);
}
