//! Orchestration services for check execution.

mod runner;

pub use runner::{CheckRunner, RunSummary};
