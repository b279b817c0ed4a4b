//! End-to-end orchestration for Sitewatch.
//!
//! A pipeline run executes every configured check, merges the results into
//! the durable status document, renders the dashboard to disk, and raises a
//! single aggregate alert when anything failed. The [`services::Scheduler`]
//! wraps the pipeline in an explicit interval loop owned by the process,
//! cancellable through a watch channel.

pub mod services;

#[cfg(test)]
mod tests;
