//! Status dashboard renderer.

use crate::check::domain::Outcome;
use crate::status::domain::{StatusDocument, StatusRecord};
use crate::status::services::NEVER_SENTINEL;
use chrono::{DateTime, Utc};
use minijinja::Environment;
use mockable::Clock;
use serde_json::{Map, Value, json};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Rendered value for fields with no recorded data.
pub const NO_DATA_PLACEHOLDER: &str = "no data";

/// Self-contained HTML dashboard, one card per check, inline styles only.
const HTML_TEMPLATE: &str = r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Sitewatch dashboard</title>
</head>
<body style="font-family: sans-serif; background: #f4f5f7; margin: 0; padding: 24px;">
<h1 style="margin-top: 0;">Sitewatch dashboard</h1>
<p style="color: #555;">Generated {{ generated_at }} &middot; {{ passed }}/{{ total }} checks passing</p>
{% if checks %}
{% for row in checks %}
<div style="background: #fff; border-left: 6px solid {{ row.colour }}; border-radius: 4px; box-shadow: 0 1px 2px rgba(0,0,0,0.1); margin-bottom: 12px; padding: 12px 16px;">
  <h2 style="margin: 0 0 4px; font-size: 1.1em;">{{ row.name }}
    <span style="color: {{ row.colour }}; font-size: 0.8em;">{{ row.outcome }}</span></h2>
  <p style="margin: 0; color: #333;">{{ row.message }}</p>
  <p style="margin: 4px 0 0; color: #777; font-size: 0.85em;">last success: {{ row.last_success }} &middot; checked: {{ row.checked_at }}</p>
  {% if row.metrics %}<pre style="background: #f8f8f8; margin: 8px 0 0; padding: 8px; font-size: 0.8em; overflow-x: auto;">{{ row.metrics }}</pre>{% endif %}
</div>
{% endfor %}
{% else %}
<p style="color: #777;">No checks recorded yet.</p>
{% endif %}
</body>
</html>
"##;

/// Markdown summary, one table row per check.
const MARKDOWN_TEMPLATE: &str = r"# Sitewatch summary

Generated {{ generated_at }} — {{ passed }}/{{ total }} checks passing

{% if checks %}| Check | Outcome | Last success | Message |
| --- | --- | --- | --- |
{% for row in checks %}| {{ row.name }} | {{ row.outcome }} | {{ row.last_success }} | {{ row.message }} |
{% endfor %}{% else %}_No checks recorded yet._
{% endif %}";

/// Errors raised while rendering a dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReportError {
    /// The template failed to render.
    #[error("template render failed: {0}")]
    TemplateRender(String),
}

/// Result type for rendering operations.
pub type ReportResult<T> = Result<T, ReportError>;

/// Renders a status snapshot into human-readable artifacts.
///
/// Absent optional data renders as an explicit placeholder instead of
/// failing the whole report.
#[derive(Clone)]
pub struct ReportRenderer<C>
where
    C: Clock + Send + Sync,
{
    clock: Arc<C>,
}

impl<C> ReportRenderer<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a renderer.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self { clock }
    }

    /// Renders the HTML dashboard.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the embedded template fails to render;
    /// absent data never triggers this.
    pub fn render_html(
        &self,
        document: &StatusDocument,
        metrics: &BTreeMap<String, Value>,
    ) -> ReportResult<String> {
        render(HTML_TEMPLATE, &self.context(document, metrics))
    }

    /// Renders the Markdown summary.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] when the embedded template fails to render;
    /// absent data never triggers this.
    pub fn render_markdown(
        &self,
        document: &StatusDocument,
        metrics: &BTreeMap<String, Value>,
    ) -> ReportResult<String> {
        render(MARKDOWN_TEMPLATE, &self.context(document, metrics))
    }

    fn context(&self, document: &StatusDocument, metrics: &BTreeMap<String, Value>) -> Value {
        let now = self.clock.utc();
        let rows: Vec<Value> = document
            .records()
            .map(|(name, record)| row_context(name.as_str(), record, metrics.get(name.as_str()), now))
            .collect();
        let passed = document
            .records()
            .filter(|(_, record)| record.last_result().outcome == Outcome::Success)
            .count();

        json!({
            "generated_at": now.to_rfc3339(),
            "total": rows.len(),
            "passed": passed,
            "checks": rows,
        })
    }
}

fn row_context(
    name: &str,
    record: &StatusRecord,
    metrics: Option<&Value>,
    now: DateTime<Utc>,
) -> Value {
    let last = record.last_result();
    let mut row = Map::new();
    row.insert("name".to_owned(), Value::String(name.to_owned()));
    row.insert(
        "outcome".to_owned(),
        Value::String(last.outcome.as_str().to_owned()),
    );
    row.insert(
        "colour".to_owned(),
        Value::String(outcome_colour(last.outcome).to_owned()),
    );
    row.insert(
        "message".to_owned(),
        Value::String(if last.message.is_empty() {
            NO_DATA_PLACEHOLDER.to_owned()
        } else {
            last.message.clone()
        }),
    );
    row.insert(
        "checked_at".to_owned(),
        Value::String(last.timestamp.to_rfc3339()),
    );
    row.insert(
        "last_success".to_owned(),
        Value::String(record.last_success_at().map_or_else(
            || NEVER_SENTINEL.to_owned(),
            |timestamp| humanize_ago(timestamp, now),
        )),
    );
    row.insert(
        "metrics".to_owned(),
        metrics.map_or(Value::Null, |payload| {
            Value::String(
                serde_json::to_string_pretty(payload).unwrap_or_else(|_| payload.to_string()),
            )
        }),
    );
    Value::Object(row)
}

const fn outcome_colour(outcome: Outcome) -> &'static str {
    match outcome {
        Outcome::Success => "#2e7d32",
        Outcome::Failure => "#e65100",
        Outcome::Error => "#c62828",
    }
}

fn humanize_ago(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_secs = now
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0)
        .unsigned_abs();
    format!(
        "{} ago",
        humantime::format_duration(Duration::from_secs(elapsed_secs))
    )
}

fn render(template: &str, context: &Value) -> ReportResult<String> {
    let environment = Environment::new();
    environment
        .render_str(template, context)
        .map_err(|error| ReportError::TemplateRender(error.to_string()))
}
