//! Unit tests for the report context.

mod renderer_tests;
