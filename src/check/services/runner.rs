//! Concurrent check execution.

use crate::check::domain::{CheckDefinition, CheckName, CheckResult, Outcome};
use crate::check::ports::Probe;
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{info, warn};

/// Aggregate outcome of one runner invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    results: Vec<CheckResult>,
    started_at: DateTime<Utc>,
    finished_at: DateTime<Utc>,
}

impl RunSummary {
    /// Returns all per-check results in definition order.
    #[must_use]
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    /// Consumes the summary into its per-check results.
    #[must_use]
    pub fn into_results(self) -> Vec<CheckResult> {
        self.results
    }

    /// Returns the count of checks that did not return `success`.
    #[must_use]
    pub fn failure_tally(&self) -> usize {
        self.results
            .iter()
            .filter(|result| result.outcome().counts_as_failed())
            .count()
    }

    /// Returns `true` when every check returned `success`.
    #[must_use]
    pub fn all_passed(&self) -> bool {
        self.failure_tally() == 0
    }

    /// Returns the results that did not return `success`.
    #[must_use]
    pub fn failed_results(&self) -> Vec<&CheckResult> {
        self.results
            .iter()
            .filter(|result| result.outcome().counts_as_failed())
            .collect()
    }

    /// Returns when the run started.
    #[must_use]
    pub const fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    /// Returns when the last check settled.
    #[must_use]
    pub const fn finished_at(&self) -> DateTime<Utc> {
        self.finished_at
    }
}

/// Executes configured checks concurrently, one bounded task per check.
///
/// A probe exception, panic, or timeout never prevents the remaining checks
/// from settling; every definition yields exactly one [`CheckResult`].
#[derive(Clone)]
pub struct CheckRunner<C>
where
    C: Clock + Send + Sync + 'static,
{
    clock: Arc<C>,
    silent: bool,
}

impl<C> CheckRunner<C>
where
    C: Clock + Send + Sync + 'static,
{
    /// Creates a runner with progress logging enabled.
    #[must_use]
    pub const fn new(clock: Arc<C>) -> Self {
        Self {
            clock,
            silent: false,
        }
    }

    /// Suppresses non-error progress output.
    #[must_use]
    pub const fn with_silent(mut self, silent: bool) -> Self {
        self.silent = silent;
        self
    }

    /// Runs every definition and collects one result per check.
    ///
    /// Total run time is bounded by the largest per-check timeout plus
    /// scheduling overhead, since checks run concurrently.
    pub async fn run(&self, definitions: &[CheckDefinition]) -> RunSummary {
        let started_at = self.clock.utc();
        let mut join_set = JoinSet::new();
        let mut spawned = HashMap::new();

        for (index, definition) in definitions.iter().enumerate() {
            let name = definition.name().clone();
            let probe = definition.probe();
            let timeout = definition.timeout();
            let clock = Arc::clone(&self.clock);
            let handle = join_set
                .spawn(
                    async move { (index, execute_one(name, &*probe, timeout, clock.as_ref()).await) },
                );
            spawned.insert(handle.id(), (index, definition.name().clone()));
        }

        let results = self
            .collect(&mut join_set, &spawned, definitions.len())
            .await;
        RunSummary {
            results,
            started_at,
            finished_at: self.clock.utc(),
        }
    }

    async fn collect(
        &self,
        join_set: &mut JoinSet<(usize, CheckResult)>,
        spawned: &HashMap<tokio::task::Id, (usize, CheckName)>,
        total: usize,
    ) -> Vec<CheckResult> {
        let mut slots: Vec<Option<CheckResult>> = vec![None; total];
        while let Some(joined) = join_set.join_next().await {
            let (index, result) = match joined {
                Ok((index, result)) => (index, result),
                Err(join_err) => {
                    let Some((index, name)) = spawned.get(&join_err.id()).cloned() else {
                        continue;
                    };
                    let now = self.clock.utc();
                    let result = CheckResult::new(
                        name,
                        Outcome::Error,
                        format!("probe task failed: {join_err}"),
                        now,
                        now,
                    );
                    (index, result)
                }
            };
            self.log_result(&result);
            if let Some(slot) = slots.get_mut(index) {
                *slot = Some(result);
            }
        }
        slots.into_iter().flatten().collect()
    }

    fn log_result(&self, result: &CheckResult) {
        match result.outcome() {
            Outcome::Success => {
                if !self.silent {
                    info!(check = %result.check_name(), "{}", result.message());
                }
            }
            Outcome::Failure | Outcome::Error => {
                warn!(
                    check = %result.check_name(),
                    outcome = %result.outcome(),
                    "{}",
                    result.message()
                );
            }
        }
    }
}

async fn execute_one<C>(
    name: CheckName,
    probe: &dyn Probe,
    timeout: Duration,
    clock: &C,
) -> CheckResult
where
    C: Clock + Send + Sync,
{
    let started_at = clock.utc();
    match tokio::time::timeout(timeout, probe.probe()).await {
        Err(_) => CheckResult::new(
            name,
            Outcome::Error,
            format!("timeout after {}", humantime::format_duration(timeout)),
            started_at,
            clock.utc(),
        ),
        Ok(Err(probe_err)) => CheckResult::new(
            name,
            Outcome::Error,
            probe_err.to_string(),
            started_at,
            clock.utc(),
        ),
        Ok(Ok(report)) => {
            let outcome = if report.is_healthy() {
                Outcome::Success
            } else {
                Outcome::Failure
            };
            let (message, detail) = report.into_parts();
            let mut result = CheckResult::new(name, outcome, message, started_at, clock.utc());
            if let Some(payload) = detail {
                result = result.with_detail(payload);
            }
            result
        }
    }
}
