//! Port contracts for alert delivery channels.

mod issue_tracker;
mod mailer;

pub use issue_tracker::{
    CreatedIssue, IssueTracker, IssueTrackerError, IssueTrackerResult, NewIssue,
};
pub use mailer::{Mailer, MailerError, MailerResult, OutboundEmail};
