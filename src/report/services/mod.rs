//! Rendering services.

mod renderer;

pub use renderer::{NO_DATA_PLACEHOLDER, ReportError, ReportRenderer, ReportResult};
