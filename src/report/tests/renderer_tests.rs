//! Rendering tests for the HTML and Markdown dashboards.

use crate::check::domain::{CheckName, CheckResult, Outcome};
use crate::report::services::ReportRenderer;
use crate::status::domain::StatusDocument;
use chrono::{TimeZone, Utc};
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::json;
use std::collections::BTreeMap;
use std::sync::Arc;

#[fixture]
fn renderer() -> ReportRenderer<DefaultClock> {
    ReportRenderer::new(Arc::new(DefaultClock))
}

fn document_with(entries: &[(&str, Outcome)]) -> StatusDocument {
    let finished = Utc
        .with_ymd_and_hms(2026, 3, 1, 8, 0, 0)
        .single()
        .expect("valid timestamp");
    let mut document = StatusDocument::new();
    for (name, outcome) in entries {
        let check_name = CheckName::new(*name).expect("valid name");
        let result = CheckResult::new(
            check_name,
            *outcome,
            format!("{name} probe message"),
            finished,
            finished,
        );
        document.apply(&result, 10);
    }
    document
}

#[rstest]
fn html_contains_one_card_per_check(renderer: ReportRenderer<DefaultClock>) {
    let document = document_with(&[("site", Outcome::Success), ("api", Outcome::Failure)]);

    let html = renderer
        .render_html(&document, &BTreeMap::new())
        .expect("render html");

    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("site"));
    assert!(html.contains("api"));
    assert!(html.contains("1/2 checks passing"));
    assert!(html.contains("site probe message"));
}

#[rstest]
fn html_for_empty_document_shows_placeholder(renderer: ReportRenderer<DefaultClock>) {
    let html = renderer
        .render_html(&StatusDocument::new(), &BTreeMap::new())
        .expect("render html");
    assert!(html.contains("No checks recorded yet."));
    assert!(html.contains("0/0 checks passing"));
}

#[rstest]
fn failing_check_without_success_renders_never(renderer: ReportRenderer<DefaultClock>) {
    let document = document_with(&[("api", Outcome::Error)]);

    let markdown = renderer
        .render_markdown(&document, &BTreeMap::new())
        .expect("render markdown");

    assert!(markdown.contains("| api | error | never |"));
}

#[rstest]
fn markdown_summarises_all_checks(renderer: ReportRenderer<DefaultClock>) {
    let document = document_with(&[("site", Outcome::Success), ("api", Outcome::Failure)]);

    let markdown = renderer
        .render_markdown(&document, &BTreeMap::new())
        .expect("render markdown");

    assert!(markdown.starts_with("# Sitewatch summary"));
    assert!(markdown.contains("| Check | Outcome | Last success | Message |"));
    assert!(markdown.contains("| site | success |"));
    assert!(markdown.contains("| api | failure |"));
}

#[rstest]
fn per_check_metrics_are_embedded_when_present(renderer: ReportRenderer<DefaultClock>) {
    let document = document_with(&[("site", Outcome::Success)]);
    let mut metrics = BTreeMap::new();
    metrics.insert("site".to_owned(), json!({"performance_score": 97}));

    let html = renderer.render_html(&document, &metrics).expect("render html");
    assert!(html.contains("performance_score"));
}

#[rstest]
fn missing_metrics_do_not_fail_rendering(renderer: ReportRenderer<DefaultClock>) {
    let document = document_with(&[("site", Outcome::Success)]);
    let mut metrics = BTreeMap::new();
    metrics.insert("unrelated".to_owned(), json!({"score": 1}));

    let html = renderer.render_html(&document, &metrics).expect("render html");
    assert!(!html.contains("unrelated"));
}
