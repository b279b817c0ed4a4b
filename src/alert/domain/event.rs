//! Alert events.

use super::AlertLevel;
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Length of the hex fingerprint used for de-duplication.
const FINGERPRINT_HEX_CHARS: usize = 16;

/// A request to notify a human about a detected problem.
///
/// Created by any caller and consumed exactly once by the dispatcher; not
/// persisted beyond the dispatch log. The issue and email flags are
/// explicit and independent; the level only seeds their defaults at
/// construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlertEvent {
    id: Uuid,
    level: AlertLevel,
    message: String,
    source: String,
    extra: Value,
    create_issue: bool,
    send_email: bool,
    timestamp: DateTime<Utc>,
}

impl AlertEvent {
    /// Creates an alert event.
    ///
    /// `create_issue` defaults from the level's suggestion; `send_email`
    /// defaults to off.
    #[must_use]
    pub fn new(
        level: AlertLevel,
        source: impl Into<String>,
        message: impl Into<String>,
        clock: &impl Clock,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            level,
            message: message.into(),
            source: source.into(),
            extra: Value::Null,
            create_issue: level.suggests_issue(),
            send_email: false,
            timestamp: clock.utc(),
        }
    }

    /// Attaches a structured extra payload.
    #[must_use]
    pub fn with_extra(mut self, extra: Value) -> Self {
        self.extra = extra;
        self
    }

    /// Sets the issue-creation flag explicitly.
    #[must_use]
    pub const fn with_issue(mut self, create_issue: bool) -> Self {
        self.create_issue = create_issue;
        self
    }

    /// Sets the email flag explicitly.
    #[must_use]
    pub const fn with_email(mut self, send_email: bool) -> Self {
        self.send_email = send_email;
        self
    }

    /// Returns the unique event identifier.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Returns the severity level.
    #[must_use]
    pub const fn level(&self) -> AlertLevel {
        self.level
    }

    /// Returns the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the component that raised the alert.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Returns the structured extra payload (`null` when absent).
    #[must_use]
    pub const fn extra(&self) -> &Value {
        &self.extra
    }

    /// Returns whether issue creation was requested.
    #[must_use]
    pub const fn create_issue(&self) -> bool {
        self.create_issue
    }

    /// Returns whether email delivery was requested.
    #[must_use]
    pub const fn send_email(&self) -> bool {
        self.send_email
    }

    /// Returns when the event was raised.
    #[must_use]
    pub const fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Returns a stable fingerprint over source, level, and message.
    ///
    /// Two events describing the same problem share a fingerprint, which
    /// the dispatcher uses for de-duplication.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.source.as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.level.as_str().as_bytes());
        hasher.update([0x1f]);
        hasher.update(self.message.as_bytes());
        hasher
            .finalize()
            .iter()
            .map(|byte| format!("{byte:02x}"))
            .collect::<String>()
            .chars()
            .take(FINGERPRINT_HEX_CHARS)
            .collect()
    }
}
