//! Domain model for persisted check status.

mod document;
mod record;

pub use document::StatusDocument;
pub use record::{ResultSnapshot, StatusRecord};
