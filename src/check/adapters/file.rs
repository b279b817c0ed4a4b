//! Required-file probe.
//!
//! Validates that a file the deployment depends on (a config document, a
//! build artefact) exists and, optionally, parses as JSON.

use crate::check::ports::{Probe, ProbeError, ProbeReport, ProbeResult};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::io::ErrorKind;
use std::path::PathBuf;

/// Probe that checks a required file on the local filesystem.
#[derive(Debug, Clone)]
pub struct FileProbe {
    path: PathBuf,
    require_json: bool,
}

impl FileProbe {
    /// Creates a probe asserting the file exists.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            require_json: false,
        }
    }

    /// Additionally requires the file content to parse as JSON.
    #[must_use]
    pub const fn requiring_json(mut self) -> Self {
        self.require_json = true;
        self
    }

    /// Returns the probed path.
    #[must_use]
    pub fn path(&self) -> &std::path::Path {
        &self.path
    }
}

#[async_trait]
impl Probe for FileProbe {
    async fn probe(&self) -> ProbeResult<ProbeReport> {
        let display = self.path.display();
        let content = match tokio::fs::read(&self.path).await {
            Ok(content) => content,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Ok(ProbeReport::unhealthy(format!(
                    "required file {display} is missing"
                )));
            }
            Err(err) => return Err(ProbeError::transport(err)),
        };

        let detail = json!({
            "path": self.path.to_string_lossy(),
            "bytes": content.len(),
        });
        if self.require_json {
            if let Err(err) = serde_json::from_slice::<Value>(&content) {
                return Ok(ProbeReport::unhealthy(format!(
                    "{display} is not valid JSON: {err}"
                ))
                .with_detail(detail));
            }
        }
        Ok(ProbeReport::healthy(format!("{display} present")).with_detail(detail))
    }
}
