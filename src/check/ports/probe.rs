//! Probe port: the capability a check definition executes.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;

/// Result type for probe executions.
pub type ProbeResult<T> = Result<T, ProbeError>;

/// Observation reported by a probe that ran to completion.
///
/// A report is produced even when the target is unhealthy; an `Err` from
/// [`Probe::probe`] means the probe itself could not run at all.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeReport {
    healthy: bool,
    message: String,
    detail: Option<Value>,
}

impl ProbeReport {
    /// Creates a report for a healthy target.
    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self {
            healthy: true,
            message: message.into(),
            detail: None,
        }
    }

    /// Creates a report for an unhealthy target.
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self {
            healthy: false,
            message: message.into(),
            detail: None,
        }
    }

    /// Attaches a structured detail payload.
    #[must_use]
    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }

    /// Returns `true` when the target was observed healthy.
    #[must_use]
    pub const fn is_healthy(&self) -> bool {
        self.healthy
    }

    /// Returns the free-form observation message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Consumes the report into its message and optional detail payload.
    #[must_use]
    pub fn into_parts(self) -> (String, Option<Value>) {
        (self.message, self.detail)
    }
}

/// Errors meaning the probe itself could not complete.
#[derive(Debug, Clone, Error)]
pub enum ProbeError {
    /// The probe target specification is unusable (malformed URL, empty
    /// host).
    #[error("invalid probe target: {0}")]
    InvalidTarget(String),

    /// The underlying transport failed before an observation was made.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),

    /// An external process could not be spawned.
    #[error("failed to spawn '{program}': {reason}")]
    Spawn {
        /// Program that failed to start.
        program: String,
        /// Operating-system failure description.
        reason: String,
    },
}

impl ProbeError {
    /// Wraps a transport-layer error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}

/// Capability executed by the check runner.
///
/// Implementations must be side-effect tolerant: the runner may abandon a
/// pending probe at its timeout without waiting for cleanup.
#[async_trait]
pub trait Probe: Send + Sync {
    /// Executes one observation against the probe target.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError`] when the probe could not run; an unhealthy
    /// target is reported through [`ProbeReport::unhealthy`] instead.
    async fn probe(&self) -> ProbeResult<ProbeReport>;
}
