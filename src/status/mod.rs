//! Durable per-check status for Sitewatch.
//!
//! One [`domain::StatusRecord`] per check name captures the last result, a
//! forward-only last-success timestamp, and a bounded history. The whole
//! document is persisted as a single JSON object and rewritten atomically so
//! it stays valid JSON after every write. The module follows hexagonal
//! architecture:
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
