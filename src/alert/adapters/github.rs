//! GitHub REST issue tracker adapter.

use crate::alert::ports::{
    CreatedIssue, IssueTracker, IssueTrackerError, IssueTrackerResult, NewIssue,
};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

/// Default GitHub REST endpoint.
const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Longest rejection-body excerpt carried in errors.
const BODY_EXCERPT_CHARS: usize = 500;

/// Issue tracker backed by the GitHub REST API.
#[derive(Debug, Clone)]
pub struct GitHubIssueTracker {
    client: Client,
    api_base: String,
    repository: String,
    token: String,
    labels: Vec<String>,
}

impl GitHubIssueTracker {
    /// Creates a tracker posting to `owner/repo` with the given API token.
    #[must_use]
    pub fn new(client: Client, repository: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_owned(),
            repository: repository.into(),
            token: token.into(),
            labels: Vec::new(),
        }
    }

    /// Adds labels attached to every created issue.
    #[must_use]
    pub fn with_labels(mut self, labels: impl IntoIterator<Item = String>) -> Self {
        self.labels = labels.into_iter().collect();
        self
    }

    /// Overrides the API base URL (tests, GitHub Enterprise).
    #[must_use]
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    fn issues_url(&self) -> String {
        format!("{}/repos/{}/issues", self.api_base, self.repository)
    }

    fn payload(&self, issue: &NewIssue) -> Value {
        let mut labels: Vec<&str> = self.labels.iter().map(String::as_str).collect();
        labels.extend(issue.labels.iter().map(String::as_str));
        json!({
            "title": issue.title,
            "body": issue.body,
            "labels": labels,
        })
    }
}

#[async_trait]
impl IssueTracker for GitHubIssueTracker {
    async fn create_issue(&self, issue: &NewIssue) -> IssueTrackerResult<CreatedIssue> {
        let response = self
            .client
            .post(self.issues_url())
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/vnd.github+json")
            .header("User-Agent", "sitewatch")
            .json(&self.payload(issue))
            .send()
            .await
            .map_err(IssueTrackerError::transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IssueTrackerError::Rejected {
                status: status.as_u16(),
                body: body.chars().take(BODY_EXCERPT_CHARS).collect(),
            });
        }

        let created: Value = response
            .json()
            .await
            .map_err(IssueTrackerError::transport)?;
        Ok(CreatedIssue {
            url: created
                .get("html_url")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_owned(),
            number: created.get("number").and_then(Value::as_u64),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_merges_configured_and_event_labels() {
        let tracker = GitHubIssueTracker::new(Client::new(), "burni/site", "token")
            .with_labels(vec!["monitoring".to_owned()]);
        let issue = NewIssue {
            title: "site down".to_owned(),
            body: "details".to_owned(),
            labels: vec!["critical".to_owned()],
        };

        let payload = tracker.payload(&issue);
        assert_eq!(
            payload.get("labels").cloned(),
            Some(serde_json::json!(["monitoring", "critical"]))
        );
        assert_eq!(
            payload.get("title").and_then(Value::as_str),
            Some("site down")
        );
    }

    #[test]
    fn issues_url_targets_the_configured_repository() {
        let tracker = GitHubIssueTracker::new(Client::new(), "burni/site", "token");
        assert_eq!(
            tracker.issues_url(),
            "https://api.github.com/repos/burni/site/issues"
        );
    }
}
