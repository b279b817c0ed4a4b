//! Static check configuration.

use super::{CheckDomainError, CheckName};
use crate::check::ports::Probe;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// One configured health check: a name, a probe capability, and a timeout.
///
/// Definitions are created at startup and immutable during a run.
#[derive(Clone)]
pub struct CheckDefinition {
    name: CheckName,
    probe: Arc<dyn Probe>,
    timeout: Duration,
}

impl CheckDefinition {
    /// Creates a check definition.
    ///
    /// # Errors
    ///
    /// Returns [`CheckDomainError::ZeroTimeout`] when the timeout is zero.
    pub fn new(
        name: CheckName,
        probe: Arc<dyn Probe>,
        timeout: Duration,
    ) -> Result<Self, CheckDomainError> {
        if timeout.is_zero() {
            return Err(CheckDomainError::ZeroTimeout(name.to_string()));
        }
        Ok(Self {
            name,
            probe,
            timeout,
        })
    }

    /// Returns the check name.
    #[must_use]
    pub const fn name(&self) -> &CheckName {
        &self.name
    }

    /// Returns a shared handle to the probe capability.
    #[must_use]
    pub fn probe(&self) -> Arc<dyn Probe> {
        Arc::clone(&self.probe)
    }

    /// Returns the per-check timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl fmt::Debug for CheckDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckDefinition")
            .field("name", &self.name)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}
