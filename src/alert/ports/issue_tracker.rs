//! Issue-tracker port for alert escalation.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for issue-tracker operations.
pub type IssueTrackerResult<T> = Result<T, IssueTrackerError>;

/// Issue to be opened in the external tracker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewIssue {
    /// Issue title.
    pub title: String,
    /// Issue body (Markdown).
    pub body: String,
    /// Labels to attach.
    pub labels: Vec<String>,
}

/// Reference to a successfully created issue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatedIssue {
    /// Browser URL of the new issue.
    pub url: String,
    /// Tracker-assigned issue number, when reported.
    pub number: Option<u64>,
}

/// External issue tracker contract.
#[async_trait]
pub trait IssueTracker: Send + Sync {
    /// Opens a new issue.
    ///
    /// # Errors
    ///
    /// Returns [`IssueTrackerError`] when the tracker rejects the request
    /// or the transport fails.
    async fn create_issue(&self, issue: &NewIssue) -> IssueTrackerResult<CreatedIssue>;
}

/// Errors returned by issue tracker implementations.
#[derive(Debug, Clone, Error)]
pub enum IssueTrackerError {
    /// The tracker answered with a non-success status.
    #[error("issue tracker rejected the request with status {status}: {body}")]
    Rejected {
        /// HTTP status code of the rejection.
        status: u16,
        /// Response body excerpt.
        body: String,
    },

    /// The request never reached the tracker.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl IssueTrackerError {
    /// Wraps a transport-layer error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
