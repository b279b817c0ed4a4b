//! Orchestration services for alert dispatch.

mod dispatcher;

pub use dispatcher::{AlertDispatcher, ChannelStatus, DispatchReport};
