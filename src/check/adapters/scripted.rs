//! Scripted in-memory probe for tests and dry runs.

use crate::check::ports::{Probe, ProbeError, ProbeReport, ProbeResult};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Debug, Clone)]
enum Behaviour {
    Report(ProbeReport),
    Fail(String),
    Delayed(Duration, ProbeReport),
}

/// Probe with a fixed, scripted behaviour.
///
/// Used by runner tests and by dry-run invocations where no external
/// system should be touched. Counts how often it was executed.
#[derive(Debug, Clone)]
pub struct ScriptedProbe {
    behaviour: Behaviour,
    invocations: Arc<AtomicUsize>,
}

impl ScriptedProbe {
    fn with_behaviour(behaviour: Behaviour) -> Self {
        Self {
            behaviour,
            invocations: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Probe that always reports a healthy target.
    #[must_use]
    pub fn healthy(message: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Report(ProbeReport::healthy(message)))
    }

    /// Probe that always reports an unhealthy target.
    #[must_use]
    pub fn unhealthy(message: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Report(ProbeReport::unhealthy(message)))
    }

    /// Probe that always fails to run.
    #[must_use]
    pub fn failing(reason: impl Into<String>) -> Self {
        Self::with_behaviour(Behaviour::Fail(reason.into()))
    }

    /// Probe that reports the given observation after a delay.
    #[must_use]
    pub fn delayed(delay: Duration, report: ProbeReport) -> Self {
        Self::with_behaviour(Behaviour::Delayed(delay, report))
    }

    /// Returns how many times the probe has been executed.
    #[must_use]
    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Probe for ScriptedProbe {
    async fn probe(&self) -> ProbeResult<ProbeReport> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        match &self.behaviour {
            Behaviour::Report(report) => Ok(report.clone()),
            Behaviour::Fail(reason) => Err(ProbeError::InvalidTarget(reason.clone())),
            Behaviour::Delayed(delay, report) => {
                tokio::time::sleep(*delay).await;
                Ok(report.clone())
            }
        }
    }
}
