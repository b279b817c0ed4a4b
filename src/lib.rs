//! Sitewatch: site health-check and alerting pipeline.
//!
//! This crate consolidates the recurring monitoring pattern of the BurniToken
//! operations tooling: run a set of named health probes, persist the latest
//! outcome per check, render a human-readable dashboard, and escalate
//! failures to an issue tracker and/or outbound email.
//!
//! # Architecture
//!
//! Sitewatch follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (HTTP, TLS, SMTP, files)
//!
//! # Modules
//!
//! - [`check`]: Probe execution and per-check outcome classification
//! - [`status`]: Durable per-check status records and history
//! - [`report`]: HTML and Markdown dashboard rendering
//! - [`alert`]: Issue-tracker and email escalation
//! - [`pipeline`]: End-to-end run orchestration and scheduling
//! - [`config`]: Typed, validated runtime configuration

pub mod alert;
pub mod check;
pub mod config;
pub mod pipeline;
pub mod report;
pub mod status;
