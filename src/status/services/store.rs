//! Status store service: batched merges and time-since reporting.

use crate::check::domain::CheckResult;
use crate::status::domain::{StatusDocument, StatusRecord};
use crate::status::ports::{StatusRepository, StatusRepositoryError};
use chrono::{DateTime, Utc};
use mockable::Clock;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Default bounded-history length per check.
pub const DEFAULT_HISTORY_CAP: usize = 20;

/// Rendered value for checks with no recorded success.
pub const NEVER_SENTINEL: &str = "never";

/// Service-level errors for status store operations.
#[derive(Debug, Clone, Error)]
pub enum StatusStoreError {
    /// Repository operation failed.
    #[error(transparent)]
    Repository(#[from] StatusRepositoryError),
}

/// Result type for status store operations.
pub type StatusStoreResult<T> = Result<T, StatusStoreError>;

/// Durable key-value store of one status record per check name.
///
/// Constructed once per process and passed to callers explicitly; there is
/// no ambient module-level state.
#[derive(Clone)]
pub struct StatusStore<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync,
{
    repository: Arc<R>,
    clock: Arc<C>,
    history_cap: usize,
}

impl<R, C> StatusStore<R, C>
where
    R: StatusRepository,
    C: Clock + Send + Sync,
{
    /// Creates a status store with the default history cap.
    #[must_use]
    pub const fn new(repository: Arc<R>, clock: Arc<C>) -> Self {
        Self {
            repository,
            clock,
            history_cap: DEFAULT_HISTORY_CAP,
        }
    }

    /// Overrides the bounded-history length per check.
    #[must_use]
    pub const fn with_history_cap(mut self, history_cap: usize) -> Self {
        self.history_cap = history_cap;
        self
    }

    /// Returns the current status document.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStoreError`] when the repository fails for reasons
    /// other than absence of the document.
    pub async fn snapshot(&self) -> StatusStoreResult<StatusDocument> {
        Ok(self.repository.load().await?)
    }

    /// Merges one batch of run results and persists the document once.
    ///
    /// Returns the merged document for rendering. Applying the same batch
    /// twice yields the same persisted document as applying it once.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStoreError`] when loading or saving the document
    /// fails.
    pub async fn record_run(&self, results: &[CheckResult]) -> StatusStoreResult<StatusDocument> {
        let mut document = self.repository.load().await?;
        for result in results {
            document.apply(result, self.history_cap);
        }
        self.repository.save(&document).await?;
        Ok(document)
    }

    /// Merges a single result, creating the record when absent.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStoreError`] when loading or saving the document
    /// fails.
    pub async fn record(&self, result: &CheckResult) -> StatusStoreResult<StatusDocument> {
        self.record_run(std::slice::from_ref(result)).await
    }

    /// Returns a humanized duration since the last success of a check, or
    /// [`NEVER_SENTINEL`] when no success is recorded.
    ///
    /// # Errors
    ///
    /// Returns [`StatusStoreError`] when the repository fails.
    pub async fn time_since_last_success(&self, name: &str) -> StatusStoreResult<String> {
        let document = self.repository.load().await?;
        let since = document
            .get(name)
            .and_then(StatusRecord::last_success_at);
        Ok(since.map_or_else(
            || NEVER_SENTINEL.to_owned(),
            |timestamp| humanize_since(timestamp, self.clock.utc()),
        ))
    }
}

/// Formats the elapsed time between a past timestamp and now.
fn humanize_since(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed_secs = now
        .signed_duration_since(timestamp)
        .num_seconds()
        .max(0)
        .unsigned_abs();
    humantime::format_duration(Duration::from_secs(elapsed_secs)).to_string()
}
