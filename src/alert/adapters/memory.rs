//! In-memory alert channel doubles for tests.

use crate::alert::ports::{
    CreatedIssue, IssueTracker, IssueTrackerError, IssueTrackerResult, Mailer, MailerError,
    MailerResult, NewIssue, OutboundEmail,
};
use async_trait::async_trait;
use std::sync::{Arc, RwLock};

fn poisoned<T>(err: &std::sync::PoisonError<T>) -> std::io::Error {
    std::io::Error::other(err.to_string())
}

/// Issue tracker that records every created issue.
#[derive(Debug, Clone, Default)]
pub struct RecordingIssueTracker {
    issues: Arc<RwLock<Vec<NewIssue>>>,
}

impl RecordingIssueTracker {
    /// Creates an empty recording tracker.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the issues created so far.
    #[must_use]
    pub fn created(&self) -> Vec<NewIssue> {
        self.issues
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl IssueTracker for RecordingIssueTracker {
    async fn create_issue(&self, issue: &NewIssue) -> IssueTrackerResult<CreatedIssue> {
        let mut issues = self
            .issues
            .write()
            .map_err(|err| IssueTrackerError::transport(poisoned(&err)))?;
        issues.push(issue.clone());
        Ok(CreatedIssue {
            url: format!("memory://issues/{}", issues.len()),
            number: u64::try_from(issues.len()).ok(),
        })
    }
}

/// Issue tracker that always fails.
#[derive(Debug, Clone)]
pub struct FailingIssueTracker {
    reason: String,
}

impl FailingIssueTracker {
    /// Creates a tracker failing with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl IssueTracker for FailingIssueTracker {
    async fn create_issue(&self, _issue: &NewIssue) -> IssueTrackerResult<CreatedIssue> {
        Err(IssueTrackerError::transport(std::io::Error::other(
            self.reason.clone(),
        )))
    }
}

/// Mailer that records every delivered email.
#[derive(Debug, Clone, Default)]
pub struct RecordingMailer {
    sent: Arc<RwLock<Vec<OutboundEmail>>>,
}

impl RecordingMailer {
    /// Creates an empty recording mailer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the emails sent so far.
    #[must_use]
    pub fn sent(&self) -> Vec<OutboundEmail> {
        self.sent
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutboundEmail) -> MailerResult<()> {
        let mut sent = self
            .sent
            .write()
            .map_err(|err| MailerError::transport(poisoned(&err)))?;
        sent.push(email.clone());
        Ok(())
    }
}

/// Mailer that always fails.
#[derive(Debug, Clone)]
pub struct FailingMailer {
    reason: String,
}

impl FailingMailer {
    /// Creates a mailer failing with the given reason.
    #[must_use]
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutboundEmail) -> MailerResult<()> {
        Err(MailerError::transport(std::io::Error::other(
            self.reason.clone(),
        )))
    }
}
