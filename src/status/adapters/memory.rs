//! In-memory status repository for tests.

use crate::status::domain::StatusDocument;
use crate::status::ports::{StatusRepository, StatusRepositoryError, StatusRepositoryResult};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

/// Thread-safe in-memory status repository.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStatusRepository {
    state: Arc<RwLock<StatusDocument>>,
}

impl InMemoryStatusRepository {
    /// Creates an empty in-memory repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository seeded with an existing document.
    #[must_use]
    pub fn seeded(document: StatusDocument) -> Self {
        Self {
            state: Arc::new(RwLock::new(document)),
        }
    }
}

#[async_trait]
impl StatusRepository for InMemoryStatusRepository {
    async fn load(&self) -> StatusRepositoryResult<StatusDocument> {
        let state = self.state.read().map_err(|err| {
            StatusRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        Ok(state.clone())
    }

    async fn save(&self, document: &StatusDocument) -> StatusRepositoryResult<()> {
        let mut state = self.state.write().map_err(|err| {
            StatusRepositoryError::persistence(std::io::Error::other(err.to_string()))
        })?;
        *state = document.clone();
        Ok(())
    }
}
