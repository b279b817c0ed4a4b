//! Validated check name newtype.

use super::CheckDomainError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum accepted check-name length.
const MAX_NAME_LEN: usize = 64;

/// Unique, normalized name of a configured health check.
///
/// Names are the key of the persisted status document, so they are
/// restricted to a stable, filesystem- and URL-safe alphabet.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CheckName(String);

impl CheckName {
    /// Creates a validated check name.
    ///
    /// The value is trimmed before validation.
    ///
    /// # Errors
    ///
    /// Returns [`CheckDomainError::InvalidCheckName`] when the trimmed value
    /// is empty, longer than 64 characters, or contains characters outside
    /// `[a-z0-9._-]`.
    pub fn new(value: impl Into<String>) -> Result<Self, CheckDomainError> {
        let raw = value.into();
        let normalized = raw.trim();
        let is_valid = !normalized.is_empty()
            && normalized.len() <= MAX_NAME_LEN
            && normalized
                .chars()
                .all(|ch| ch.is_ascii_lowercase() || ch.is_ascii_digit() || "._-".contains(ch));

        if !is_valid {
            return Err(CheckDomainError::InvalidCheckName(raw));
        }

        Ok(Self(normalized.to_owned()))
    }

    /// Returns the name as `str`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CheckName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::borrow::Borrow<str> for CheckName {
    fn borrow(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for CheckName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for CheckName {
    type Error = CheckDomainError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
