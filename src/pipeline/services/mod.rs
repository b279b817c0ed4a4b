//! Orchestration services for pipeline runs.

mod health;
mod scheduler;

pub use health::{HealthPipeline, PipelineError, PipelineOutcome, PipelineResult};
pub use scheduler::Scheduler;
