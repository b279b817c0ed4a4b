//! Domain model for health-check execution.
//!
//! The check domain models named probe definitions, outcome classification,
//! and immutable per-run results while keeping all transport concerns
//! (HTTP, TLS, processes) outside of the domain boundary.

mod definition;
mod error;
mod name;
mod outcome;
mod result;

pub use definition::CheckDefinition;
pub use error::{CheckDomainError, ParseOutcomeError};
pub use name::CheckName;
pub use outcome::Outcome;
pub use result::CheckResult;
