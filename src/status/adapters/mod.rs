//! Adapter implementations for status persistence.

mod json_file;
mod memory;

pub use json_file::JsonFileStatusRepository;
pub use memory::InMemoryStatusRepository;
