//! Unit tests for the pipeline context.

mod pipeline_tests;
mod scheduler_tests;
