//! Per-check status records.

use crate::check::domain::{CheckResult, Outcome};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Compact persisted form of one check result.
///
/// The status document keeps only what time-since reporting and dashboards
/// need; the full structured detail stays with the run that produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSnapshot {
    /// Classified outcome of the run.
    pub outcome: Outcome,
    /// Free-form result message.
    pub message: String,
    /// When the probe settled.
    pub timestamp: DateTime<Utc>,
}

impl From<&CheckResult> for ResultSnapshot {
    fn from(result: &CheckResult) -> Self {
        Self {
            outcome: result.outcome(),
            message: result.message().to_owned(),
            timestamp: result.finished_at(),
        }
    }
}

/// Persisted last-known state of one check.
///
/// Invariant: `last_success_at` only advances forward in time and is
/// untouched by failing runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusRecord {
    /// Timestamp of the most recent successful run, when any succeeded.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    last_success_at: Option<DateTime<Utc>>,
    /// Most recent run result.
    last_result: ResultSnapshot,
    /// Recent results, most-recent-last, capped by the store.
    #[serde(skip_serializing_if = "VecDeque::is_empty", default)]
    history: VecDeque<ResultSnapshot>,
}

impl StatusRecord {
    /// Creates a record from the first result observed for a check.
    #[must_use]
    pub fn first(result: &CheckResult, history_cap: usize) -> Self {
        let mut record = Self {
            last_success_at: None,
            last_result: ResultSnapshot::from(result),
            history: VecDeque::new(),
        };
        record.apply(result, history_cap);
        record
    }

    /// Merges a new result into the record.
    ///
    /// Applying the same result twice is idempotent: the history keeps a
    /// single entry and the success timestamp never moves backwards.
    pub fn apply(&mut self, result: &CheckResult, history_cap: usize) {
        let snapshot = ResultSnapshot::from(result);
        if result.outcome() == Outcome::Success
            && self
                .last_success_at
                .is_none_or(|previous| snapshot.timestamp > previous)
        {
            self.last_success_at = Some(snapshot.timestamp);
        }

        if self.history.back() != Some(&snapshot) {
            self.history.push_back(snapshot.clone());
        }
        while self.history.len() > history_cap {
            self.history.pop_front();
        }
        self.last_result = snapshot;
    }

    /// Returns the timestamp of the most recent success, when any.
    #[must_use]
    pub const fn last_success_at(&self) -> Option<DateTime<Utc>> {
        self.last_success_at
    }

    /// Returns the most recent result.
    #[must_use]
    pub const fn last_result(&self) -> &ResultSnapshot {
        &self.last_result
    }

    /// Returns the bounded history, most-recent-last.
    #[must_use]
    pub const fn history(&self) -> &VecDeque<ResultSnapshot> {
        &self.history
    }
}
