//! Alert severity levels.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Error raised when parsing an [`AlertLevel`] from its storage form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown alert level: {0}")]
pub struct ParseAlertLevelError(pub String);

/// Severity of an alert event, ordered from least to most severe.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum AlertLevel {
    /// Informational notice; no action expected.
    Info,
    /// Degraded but functioning.
    Warning,
    /// A check failed; action expected.
    Error,
    /// Everything is failing; immediate action expected.
    Critical,
}

impl AlertLevel {
    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Critical => "critical",
        }
    }

    /// Returns whether this level suggests opening an issue by default.
    ///
    /// The level is only a default suggestion; callers set the issue and
    /// email flags explicitly on the event.
    #[must_use]
    pub const fn suggests_issue(self) -> bool {
        matches!(self, Self::Error | Self::Critical)
    }
}

impl fmt::Display for AlertLevel {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

impl TryFrom<&str> for AlertLevel {
    type Error = ParseAlertLevelError;

    fn try_from(value: &str) -> Result<Self, ParseAlertLevelError> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "info" => Ok(Self::Info),
            "warning" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "critical" => Ok(Self::Critical),
            _ => Err(ParseAlertLevelError(value.to_owned())),
        }
    }
}
