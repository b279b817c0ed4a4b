//! End-to-end pipeline runs against a real status file on disk.

use eyre::OptionExt;
use mockable::DefaultClock;
use rstest::rstest;
use sitewatch::alert::adapters::RecordingIssueTracker;
use sitewatch::alert::ports::IssueTracker;
use sitewatch::alert::services::AlertDispatcher;
use sitewatch::check::adapters::ScriptedProbe;
use sitewatch::check::domain::{CheckDefinition, CheckName};
use sitewatch::check::services::CheckRunner;
use sitewatch::pipeline::services::HealthPipeline;
use sitewatch::report::services::ReportRenderer;
use sitewatch::status::adapters::JsonFileStatusRepository;
use sitewatch::status::ports::StatusRepository;
use sitewatch::status::services::StatusStore;
use std::path::Path;
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

fn pipeline(
    status_file: &Path,
    report_file: &Path,
    tracker: Arc<RecordingIssueTracker>,
    definitions: Vec<CheckDefinition>,
) -> HealthPipeline<JsonFileStatusRepository, DefaultClock> {
    let clock = Arc::new(DefaultClock);
    HealthPipeline::new(
        CheckRunner::new(Arc::clone(&clock)).with_silent(true),
        StatusStore::new(
            Arc::new(JsonFileStatusRepository::new(status_file)),
            Arc::clone(&clock),
        ),
        ReportRenderer::new(Arc::clone(&clock)),
        AlertDispatcher::new(Arc::clone(&clock))
            .with_issue_tracker(tracker as Arc<dyn IssueTracker>),
        definitions,
        report_file,
        clock,
    )
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_run_starts_from_a_missing_status_file() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let status_file = dir.path().join("state/status.json");
    let report_file = dir.path().join("public/dashboard.html");
    let tracker = Arc::new(RecordingIssueTracker::new());

    let pipeline = pipeline(
        &status_file,
        &report_file,
        Arc::clone(&tracker),
        vec![check("homepage", ScriptedProbe::healthy("200 OK"))],
    );
    let outcome = pipeline.run_once().await?;

    assert!(outcome.summary().all_passed());
    assert!(tracker.created().is_empty());
    assert!(status_file.exists(), "status document persisted");
    assert!(report_file.exists(), "dashboard written");
    let html = std::fs::read_to_string(&report_file)?;
    assert!(html.contains("homepage"));
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn last_success_survives_a_later_failing_run() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let status_file = dir.path().join("status.json");
    let report_file = dir.path().join("dashboard.html");

    let passing = pipeline(
        &status_file,
        &report_file,
        Arc::new(RecordingIssueTracker::new()),
        vec![check("homepage", ScriptedProbe::healthy("200 OK"))],
    );
    passing.run_once().await?;

    let failing = pipeline(
        &status_file,
        &report_file,
        Arc::new(RecordingIssueTracker::new()),
        vec![check("homepage", ScriptedProbe::unhealthy("HTTP 500"))],
    );
    let outcome = failing.run_once().await?;
    assert_eq!(outcome.summary().failure_tally(), 1);

    let repository = JsonFileStatusRepository::new(&status_file);
    let document = repository.load().await?;
    let record = document.get("homepage").ok_or_eyre("record kept")?;
    assert!(
        record.last_success_at().is_some(),
        "earlier success is not erased by a failing run"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failing_run_opens_exactly_one_issue() -> eyre::Result<()> {
    let dir = tempfile::tempdir()?;
    let tracker = Arc::new(RecordingIssueTracker::new());

    let pipeline = pipeline(
        &dir.path().join("status.json"),
        &dir.path().join("dashboard.html"),
        Arc::clone(&tracker),
        vec![
            check("homepage", ScriptedProbe::healthy("200 OK")),
            check("api", ScriptedProbe::unhealthy("HTTP 500")),
        ],
    );
    let outcome = pipeline.run_once().await?;

    assert!(!outcome.summary().all_passed());
    let dispatch = outcome.dispatch().ok_or_eyre("alert dispatched")?;
    assert!(dispatch.issue.is_delivered());
    assert_eq!(tracker.created().len(), 1);
    Ok(())
}
