//! The whole persisted status document.

use super::StatusRecord;
use crate::check::domain::{CheckName, CheckResult};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// JSON status document: one [`StatusRecord`] keyed by check name.
///
/// Serialises transparently as a JSON object so independently-scheduled
/// scripts and dashboards can read it without knowing this crate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusDocument(BTreeMap<CheckName, StatusRecord>);

impl StatusDocument {
    /// Creates an empty document.
    #[must_use]
    pub const fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Returns `true` when no check has ever been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns the number of recorded checks.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns the record for a check name, when one exists.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&StatusRecord> {
        self.0.get(name)
    }

    /// Iterates records in name order.
    pub fn records(&self) -> impl Iterator<Item = (&CheckName, &StatusRecord)> {
        self.0.iter()
    }

    /// Merges one result into the record for its check, creating the record
    /// when absent.
    pub fn apply(&mut self, result: &CheckResult, history_cap: usize) {
        match self.0.get_mut(result.check_name()) {
            Some(record) => record.apply(result, history_cap),
            None => {
                self.0.insert(
                    result.check_name().clone(),
                    StatusRecord::first(result, history_cap),
                );
            }
        }
    }
}
