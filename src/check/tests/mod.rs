//! Unit tests for the check context.
