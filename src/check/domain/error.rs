//! Error types for the check domain.

use thiserror::Error;

/// Errors raised while constructing check domain values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckDomainError {
    /// The check name is empty, too long, or contains invalid characters.
    #[error(
        "invalid check name '{0}': names are 1-64 lowercase letters, digits, \
         hyphens, underscores, or dots"
    )]
    InvalidCheckName(String),

    /// The configured timeout is zero.
    #[error("check '{0}' has a zero timeout")]
    ZeroTimeout(String),
}

/// Error raised when parsing an [`super::Outcome`] from its storage form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown check outcome: {0}")]
pub struct ParseOutcomeError(pub String);
