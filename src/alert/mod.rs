//! Failure escalation for Sitewatch.
//!
//! An [`domain::AlertEvent`] asks for a human to be notified about a
//! detected problem, via issue creation and/or outbound email. The
//! dispatcher attempts the requested channels independently, logs and
//! swallows channel failures, and never crashes the invoking check run.
//! The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
