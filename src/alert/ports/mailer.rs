//! Outbound email port for alert escalation.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for mailer operations.
pub type MailerResult<T> = Result<T, MailerError>;

/// Email to be delivered; recipients are adapter configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundEmail {
    /// Subject line.
    pub subject: String,
    /// Plain-text body.
    pub body: String,
}

/// Outbound email contract.
#[async_trait]
pub trait Mailer: Send + Sync {
    /// Delivers one email.
    ///
    /// # Errors
    ///
    /// Returns [`MailerError`] when the message cannot be built or the
    /// transport fails.
    async fn send(&self, email: &OutboundEmail) -> MailerResult<()>;
}

/// Errors returned by mailer implementations.
#[derive(Debug, Clone, Error)]
pub enum MailerError {
    /// The message could not be assembled (bad address, empty recipient
    /// list).
    #[error("invalid message: {0}")]
    InvalidMessage(String),

    /// The SMTP transport failed.
    #[error("transport error: {0}")]
    Transport(Arc<dyn std::error::Error + Send + Sync>),
}

impl MailerError {
    /// Wraps a transport-layer error.
    #[must_use]
    pub fn transport(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Transport(Arc::new(err))
    }
}
