//! Interval scheduling for repeated pipeline runs.

use super::HealthPipeline;
use crate::status::ports::StatusRepository;
use mockable::Clock;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

/// Runs the pipeline on a fixed interval until asked to stop.
///
/// The loop is owned by the process and cancelled through an explicit watch
/// channel; there is no ambient timer to forget about. A failing run is
/// logged and the loop carries on with the next tick.
pub struct Scheduler<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync + 'static,
{
    pipeline: HealthPipeline<R, C>,
    interval: Duration,
}

impl<R, C> Scheduler<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync + 'static,
{
    /// Creates a scheduler running the pipeline every `interval`.
    #[must_use]
    pub const fn new(pipeline: HealthPipeline<R, C>, interval: Duration) -> Self {
        Self { pipeline, interval }
    }

    /// Creates the shutdown channel pair for [`Scheduler::run`].
    ///
    /// Send `true` on the returned sender to stop the loop after the run in
    /// progress, if any, completes.
    #[must_use]
    pub fn shutdown_channel() -> (watch::Sender<bool>, watch::Receiver<bool>) {
        watch::channel(false)
    }

    /// Runs the loop until the shutdown channel signals `true` or its
    /// sender is dropped. The first run starts immediately.
    ///
    /// Returns the number of completed runs, counting failed ones.
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> usize {
        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut completed: usize = 0;

        info!(
            interval = %humantime::format_duration(self.interval),
            "scheduler started"
        );
        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    if let Err(err) = self.pipeline.run_once().await {
                        error!("scheduled run failed: {err}");
                    }
                    completed = completed.saturating_add(1);
                }
                changed = shutdown.changed() => {
                    if changed.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
            }
        }
        info!(runs = completed, "scheduler stopped");
        completed
    }
}
