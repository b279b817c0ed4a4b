//! Port contracts for health-check execution.

mod probe;

pub use probe::{Probe, ProbeError, ProbeReport, ProbeResult};
