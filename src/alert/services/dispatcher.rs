//! Alert dispatch: channel selection, templating, de-duplication.

use crate::alert::domain::AlertEvent;
use crate::alert::ports::{IssueTracker, Mailer, NewIssue, OutboundEmail};
use chrono::{DateTime, Duration, Utc};
use minijinja::Environment;
use mockable::Clock;
use serde_json::json;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tracing::{error, info};

/// Default period during which a repeated fingerprint is suppressed.
const DEFAULT_DEDUP_WINDOW_MINUTES: i64 = 30;

/// Issue title template.
const TITLE_TEMPLATE: &str = "[{{ level }}] {{ source }}: {{ message }}";

/// Issue and email body template (Markdown).
const BODY_TEMPLATE: &str = "## {{ source }}

{{ message }}

- Level: {{ level }}
- Event: {{ id }}
- Raised: {{ timestamp }}
{% if extra %}
```json
{{ extra }}
```
{% endif %}";

/// Outcome of one delivery channel for one event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelStatus {
    /// The event did not request this channel.
    NotRequested,
    /// The channel was requested but no adapter is configured.
    NotConfigured,
    /// A repeat of a recent fingerprint was suppressed.
    Suppressed,
    /// Delivery succeeded; carries a channel-specific reference.
    Delivered(String),
    /// Delivery failed; carries the logged failure description.
    Failed(String),
}

impl ChannelStatus {
    /// Returns `true` when the channel delivered the event.
    #[must_use]
    pub const fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered(_))
    }
}

/// Per-channel outcome of one dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    /// Issue-tracker channel outcome.
    pub issue: ChannelStatus,
    /// Email channel outcome.
    pub email: ChannelStatus,
}

/// Decides and performs notification for alert events.
///
/// Channels are attempted independently; a failure on one never blocks the
/// other. Channel errors are logged and carried in the returned report,
/// never raised to the caller, so a failing alert path cannot cascade into
/// the invoking check run.
#[derive(Clone)]
pub struct AlertDispatcher<C>
where
    C: Clock + Send + Sync,
{
    issue_tracker: Option<Arc<dyn IssueTracker>>,
    mailer: Option<Arc<dyn Mailer>>,
    clock: Arc<C>,
    dedup_window: Duration,
    recent: Arc<Mutex<HashMap<String, DateTime<Utc>>>>,
}

impl<C> AlertDispatcher<C>
where
    C: Clock + Send + Sync,
{
    /// Creates a dispatcher with no channels configured.
    #[must_use]
    pub fn new(clock: Arc<C>) -> Self {
        Self {
            issue_tracker: None,
            mailer: None,
            clock,
            dedup_window: Duration::minutes(DEFAULT_DEDUP_WINDOW_MINUTES),
            recent: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Configures the issue-tracker channel.
    #[must_use]
    pub fn with_issue_tracker(mut self, tracker: Arc<dyn IssueTracker>) -> Self {
        self.issue_tracker = Some(tracker);
        self
    }

    /// Configures the email channel.
    #[must_use]
    pub fn with_mailer(mut self, mailer: Arc<dyn Mailer>) -> Self {
        self.mailer = Some(mailer);
        self
    }

    /// Overrides the de-duplication window.
    #[must_use]
    pub fn with_dedup_window(mut self, window: Duration) -> Self {
        self.dedup_window = window;
        self
    }

    /// Dispatches one event to its requested channels.
    ///
    /// Fire-and-forget from the caller's perspective, but awaits completion
    /// of whichever channels were requested before returning the report.
    pub async fn dispatch(&self, event: &AlertEvent) -> DispatchReport {
        if self.is_duplicate(event) {
            info!(
                source = event.source(),
                fingerprint = %event.fingerprint(),
                "suppressing repeated alert"
            );
            return DispatchReport {
                issue: ChannelStatus::Suppressed,
                email: ChannelStatus::Suppressed,
            };
        }

        let issue = self.dispatch_issue(event).await;
        let email = self.dispatch_email(event).await;
        DispatchReport { issue, email }
    }

    async fn dispatch_issue(&self, event: &AlertEvent) -> ChannelStatus {
        if !event.create_issue() {
            return ChannelStatus::NotRequested;
        }
        let Some(tracker) = &self.issue_tracker else {
            return ChannelStatus::NotConfigured;
        };

        let issue = NewIssue {
            title: render_title(event),
            body: render_body(event),
            labels: vec![event.level().as_str().to_owned()],
        };
        match tracker.create_issue(&issue).await {
            Ok(created) => {
                info!(source = event.source(), url = %created.url, "opened alert issue");
                ChannelStatus::Delivered(created.url)
            }
            Err(err) => {
                error!(source = event.source(), "issue creation failed: {err}");
                ChannelStatus::Failed(err.to_string())
            }
        }
    }

    async fn dispatch_email(&self, event: &AlertEvent) -> ChannelStatus {
        if !event.send_email() {
            return ChannelStatus::NotRequested;
        }
        let Some(mailer) = &self.mailer else {
            return ChannelStatus::NotConfigured;
        };

        let email = OutboundEmail {
            subject: render_title(event),
            body: render_body(event),
        };
        match mailer.send(&email).await {
            Ok(()) => {
                info!(source = event.source(), "sent alert email");
                ChannelStatus::Delivered("sent".to_owned())
            }
            Err(err) => {
                error!(source = event.source(), "alert email failed: {err}");
                ChannelStatus::Failed(err.to_string())
            }
        }
    }

    /// Checks and records the event fingerprint in one step.
    fn is_duplicate(&self, event: &AlertEvent) -> bool {
        let now = self.clock.utc();
        let fingerprint = event.fingerprint();
        let mut recent = self
            .recent
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        recent.retain(|_, seen| now - *seen < self.dedup_window);
        if recent.contains_key(&fingerprint) {
            return true;
        }
        recent.insert(fingerprint, now);
        false
    }
}

fn render_title(event: &AlertEvent) -> String {
    render_template(TITLE_TEMPLATE, event).unwrap_or_else(|| {
        format!("[{}] {}: {}", event.level(), event.source(), event.message())
    })
}

fn render_body(event: &AlertEvent) -> String {
    render_template(BODY_TEMPLATE, event)
        .unwrap_or_else(|| format!("{}\n\n{}", event.source(), event.message()))
}

/// Renders an event into a template, falling back to `None` on template
/// failure so dispatch itself never fails.
fn render_template(template: &str, event: &AlertEvent) -> Option<String> {
    let extra = if event.extra().is_null() {
        None
    } else {
        serde_json::to_string_pretty(event.extra()).ok()
    };
    let context = json!({
        "level": event.level().as_str(),
        "source": event.source(),
        "message": event.message(),
        "id": event.id().to_string(),
        "timestamp": event.timestamp().to_rfc3339(),
        "extra": extra,
    });

    let environment = Environment::new();
    environment.render_str(template, &context).ok()
}
