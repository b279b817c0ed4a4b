//! Orchestration services for status persistence.

mod store;

pub use store::{DEFAULT_HISTORY_CAP, NEVER_SENTINEL, StatusStore, StatusStoreError, StatusStoreResult};
