//! Immutable per-run check results.

use super::{CheckName, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of one probe execution for one check.
///
/// Created once per runner invocation per check and never mutated
/// afterwards; ownership transfers to the status store on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckResult {
    check_name: CheckName,
    outcome: Outcome,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl CheckResult {
    /// Creates a result with an explicit outcome.
    #[must_use]
    pub fn new(
        check_name: CheckName,
        outcome: Outcome,
        message: impl Into<String>,
        started_at: DateTime<Utc>,
        finished_at: DateTime<Utc>,
    ) -> Self {
        Self {
            check_name,
            outcome,
            message: message.into(),
            detail: None,
            started_at,
            finished_at,
        }
    }

    /// Attaches a structured detail payload.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns the owning check name.
    #[must_use]
    pub const fn check_name(&self) -> &CheckName {
        &self.check_name
    }

    /// Returns the classified outcome.
    #[must_use]
    pub const fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Returns the free-form result message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the structured detail payload, when one was recorded.
    #[must_use]
    pub const fn detail(&self) -> Option<&Value> {
        self.detail.as_ref()
    }

    /// Returns when the probe started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the probe settled.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }

    /// Returns the wall-clock duration of the probe.
    #[must_use]
    pub fn elapsed(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}
