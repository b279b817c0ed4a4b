//! Unit tests for the status context.

mod document_tests;
mod store_tests;
