//! Outcome classification for a single check execution.

use super::ParseOutcomeError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Classified result of one probe execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The probe ran and reported a healthy target.
    Success,
    /// The probe ran but the target is unhealthy (non-2xx response,
    /// expired certificate, missing required file).
    Failure,
    /// The probe itself could not complete (exception, timeout, spawn
    /// failure).
    Error,
}

impl Outcome {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Success => "success",
            Self::Failure => "failure",
            Self::Error => "error",
        }
    }

    /// Returns `true` when the outcome counts toward the aggregate failure
    /// tally used for alerting.
    #[must_use]
    pub const fn counts_as_failed(self) -> bool {
        !matches!(self, Self::Success)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Outcome {
    type Error = ParseOutcomeError;

    fn try_from(value: &str) -> Result<Self, ParseOutcomeError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "success" => Ok(Self::Success),
            "failure" => Ok(Self::Failure),
            "error" => Ok(Self::Error),
            _ => Err(ParseOutcomeError(value.to_owned())),
        }
    }
}
