//! Repository port for the status document.

use crate::status::domain::StatusDocument;
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for status repository operations.
pub type StatusRepositoryResult<T> = Result<T, StatusRepositoryError>;

/// Status document persistence contract.
///
/// Writes are last-writer-wins at whole-document granularity; the pipeline
/// batches all results of a run into one save.
#[async_trait]
pub trait StatusRepository: Send + Sync {
    /// Loads the full status document.
    ///
    /// A missing or unreadable backing store yields an empty document, not
    /// an error; the store is created lazily on the next save.
    ///
    /// # Errors
    ///
    /// Returns [`StatusRepositoryError`] only for failures that are not
    /// plain absence or corruption of the stored document.
    async fn load(&self) -> StatusRepositoryResult<StatusDocument>;

    /// Persists the full status document, atomically replacing the previous
    /// one.
    ///
    /// # Errors
    ///
    /// Returns [`StatusRepositoryError`] when the document cannot be
    /// serialised or durably written.
    async fn save(&self, document: &StatusDocument) -> StatusRepositoryResult<()>;
}

/// Errors returned by status repository implementations.
#[derive(Debug, Clone, Error)]
pub enum StatusRepositoryError {
    /// The document could not be serialised.
    #[error("serialisation error: {0}")]
    Serialisation(String),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl StatusRepositoryError {
    /// Wraps a persistence error.
    #[must_use]
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
