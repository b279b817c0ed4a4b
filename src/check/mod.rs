//! Health-check execution for Sitewatch.
//!
//! A check is a named probe against an external system (a URL, a TLS
//! certificate, a command, a required file). The runner executes every
//! configured check concurrently, bounds each by its own timeout, and
//! classifies the result as `success`, `failure`, or `error` without letting
//! one check abort the others. The module follows hexagonal architecture:
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
