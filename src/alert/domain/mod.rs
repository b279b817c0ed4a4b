//! Domain model for alerting.

mod event;
mod level;

pub use event::AlertEvent;
pub use level::{AlertLevel, ParseAlertLevelError};
