//! JSON-file status repository.
//!
//! Persists the status document as one UTF-8 JSON file. Saves go through a
//! sibling temp file followed by a rename, so readers never observe a
//! partially-written document.

use crate::status::domain::StatusDocument;
use crate::status::ports::{StatusRepository, StatusRepositoryError, StatusRepositoryResult};
use async_trait::async_trait;
use std::ffi::OsString;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::warn;

/// File-backed status repository.
#[derive(Debug, Clone)]
pub struct JsonFileStatusRepository {
    path: PathBuf,
}

impl JsonFileStatusRepository {
    /// Creates a repository persisting to the given file path.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }
}

#[async_trait]
impl StatusRepository for JsonFileStatusRepository {
    async fn load(&self) -> StatusRepositoryResult<StatusDocument> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(StatusDocument::new()),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    "status file unreadable, treating as empty: {err}"
                );
                return Ok(StatusDocument::new());
            }
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(StatusDocument::new());
        }

        match serde_json::from_slice(&bytes) {
            Ok(document) => Ok(document),
            Err(err) => {
                warn!(
                    path = %self.path.display(),
                    "status file corrupt, treating as empty: {err}"
                );
                Ok(StatusDocument::new())
            }
        }
    }

    async fn save(&self, document: &StatusDocument) -> StatusRepositoryResult<()> {
        let serialised = serde_json::to_vec_pretty(document)
            .map_err(|err| StatusRepositoryError::Serialisation(err.to_string()))?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent)
                    .await
                    .map_err(StatusRepositoryError::persistence)?;
            }
        }

        let temp_path = self.temp_path();
        tokio::fs::write(&temp_path, &serialised)
            .await
            .map_err(StatusRepositoryError::persistence)?;
        tokio::fs::rename(&temp_path, &self.path)
            .await
            .map_err(StatusRepositoryError::persistence)?;
        Ok(())
    }
}
