//! Unit tests for the alert context.

mod domain_tests;
