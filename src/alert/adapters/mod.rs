//! Adapter implementations for alert delivery channels.

mod github;
mod memory;
mod smtp;

pub use github::GitHubIssueTracker;
pub use memory::{FailingIssueTracker, FailingMailer, RecordingIssueTracker, RecordingMailer};
pub use smtp::{SmtpCredentials, SmtpMailer};
