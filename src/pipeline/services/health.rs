//! Single-run orchestration: check, persist, render, escalate.

use crate::alert::domain::{AlertEvent, AlertLevel};
use crate::alert::services::{AlertDispatcher, DispatchReport};
use crate::check::domain::{CheckDefinition, CheckResult};
use crate::check::services::{CheckRunner, RunSummary};
use crate::report::services::{ReportError, ReportRenderer};
use crate::status::ports::StatusRepository;
use crate::status::services::{StatusStore, StatusStoreError};
use mockable::Clock;
use serde_json::{Value, json};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing::info;

/// Source name carried on aggregate alerts raised by the pipeline.
const ALERT_SOURCE: &str = "sitewatch";

/// Errors raised by a pipeline run.
#[derive(Debug, Clone, Error)]
pub enum PipelineError {
    /// Persisting the merged status document failed.
    #[error(transparent)]
    Status(#[from] StatusStoreError),
    /// Rendering the dashboard failed.
    #[error(transparent)]
    Report(#[from] ReportError),
    /// Writing the rendered dashboard to disk failed.
    #[error("failed to write report to {}: {source}", path.display())]
    ReportWrite {
        /// Destination the report could not be written to.
        path: PathBuf,
        /// Underlying filesystem error.
        source: Arc<std::io::Error>,
    },
}

/// Result type for pipeline operations.
pub type PipelineResult<T> = Result<T, PipelineError>;

/// Outcome of one complete pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    summary: RunSummary,
    report_path: PathBuf,
    dispatch: Option<DispatchReport>,
}

impl PipelineOutcome {
    /// Returns the per-check run summary.
    #[must_use]
    pub const fn summary(&self) -> &RunSummary {
        &self.summary
    }

    /// Returns where the rendered dashboard was written.
    #[must_use]
    pub fn report_path(&self) -> &Path {
        &self.report_path
    }

    /// Returns the alert dispatch report, present only when the run raised
    /// an aggregate alert.
    #[must_use]
    pub const fn dispatch(&self) -> Option<&DispatchReport> {
        self.dispatch.as_ref()
    }
}

/// Runs the full check, persist, render, escalate sequence once.
///
/// Alert delivery failures never fail the run; they are carried in the
/// outcome's dispatch report. Only persistence and rendering failures
/// surface as errors.
#[derive(Clone)]
pub struct HealthPipeline<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync + 'static,
{
    runner: CheckRunner<C>,
    store: StatusStore<R, C>,
    renderer: ReportRenderer<C>,
    dispatcher: AlertDispatcher<C>,
    definitions: Vec<CheckDefinition>,
    report_path: PathBuf,
    clock: Arc<C>,
    alert_emails: bool,
}

impl<R, C> HealthPipeline<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a pipeline over the given checks.
    #[must_use]
    pub fn new(
        runner: CheckRunner<C>,
        store: StatusStore<R, C>,
        renderer: ReportRenderer<C>,
        dispatcher: AlertDispatcher<C>,
        definitions: Vec<CheckDefinition>,
        report_path: impl Into<PathBuf>,
        clock: Arc<C>,
    ) -> Self {
        Self {
            runner,
            store,
            renderer,
            dispatcher,
            definitions,
            report_path: report_path.into(),
            clock,
            alert_emails: false,
        }
    }

    /// Requests the email channel on aggregate alerts.
    #[must_use]
    pub const fn with_alert_emails(mut self, alert_emails: bool) -> Self {
        self.alert_emails = alert_emails;
        self
    }

    /// Executes one complete run.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError`] when the status document cannot be
    /// persisted or the dashboard cannot be rendered or written.
    pub async fn run_once(&self) -> PipelineResult<PipelineOutcome> {
        let summary = self.runner.run(&self.definitions).await;
        let document = self.store.record_run(summary.results()).await?;

        let metrics = collect_metrics(summary.results());
        let html = self.renderer.render_html(&document, &metrics)?;
        self.write_report(&html).await?;

        let mut dispatch = None;
        if let Some(event) = self.aggregate_alert(&summary) {
            dispatch = Some(self.dispatcher.dispatch(&event).await);
        }

        info!(
            checks = summary.results().len(),
            failing = summary.failure_tally(),
            report = %self.report_path.display(),
            "pipeline run complete"
        );
        Ok(PipelineOutcome {
            summary,
            report_path: self.report_path.clone(),
            dispatch,
        })
    }

    /// Builds the aggregate event for a failing run, or `None` when every
    /// check passed.
    ///
    /// The level is `critical` when no check passed at all, `error`
    /// otherwise.
    fn aggregate_alert(&self, summary: &RunSummary) -> Option<AlertEvent> {
        let failed = summary.failed_results();
        if failed.is_empty() {
            return None;
        }
        let level = if failed.len() == summary.results().len() {
            AlertLevel::Critical
        } else {
            AlertLevel::Error
        };
        let names: Vec<&str> = failed
            .iter()
            .map(|result| result.check_name().as_str())
            .collect();
        let message = format!(
            "{} of {} checks failing: {}",
            failed.len(),
            summary.results().len(),
            names.join(", ")
        );
        let failing: Vec<Value> = failed
            .iter()
            .map(|result| {
                json!({
                    "check": result.check_name().as_str(),
                    "outcome": result.outcome().as_str(),
                    "message": result.message(),
                })
            })
            .collect();
        Some(
            AlertEvent::new(level, ALERT_SOURCE, message, self.clock.as_ref())
                .with_email(self.alert_emails)
                .with_extra(json!({ "failing": failing })),
        )
    }

    async fn write_report(&self, html: &str) -> PipelineResult<()> {
        let wrap = |source: std::io::Error| PipelineError::ReportWrite {
            path: self.report_path.clone(),
            source: Arc::new(source),
        };
        if let Some(parent) = self.report_path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await.map_err(wrap)?;
        }
        tokio::fs::write(&self.report_path, html)
            .await
            .map_err(wrap)
    }
}

/// Collects per-check detail payloads for dashboard metrics blocks.
fn collect_metrics(results: &[CheckResult]) -> BTreeMap<String, Value> {
    results
        .iter()
        .filter_map(|result| {
            result
                .detail()
                .map(|detail| (result.check_name().as_str().to_owned(), detail.clone()))
        })
        .collect()
}
