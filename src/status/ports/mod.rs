//! Port contracts for status persistence.

mod repository;

pub use repository::{StatusRepository, StatusRepositoryError, StatusRepositoryResult};
