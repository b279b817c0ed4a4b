//! Probe adapter implementations.
//!
//! Each adapter turns one kind of external observation (HTTP request, TLS
//! handshake, child process, filesystem lookup) into the shared
//! [`crate::check::ports::ProbeReport`] contract so the runner never cares
//! which kind it is executing.

mod certificate;
mod command;
mod file;
mod http;
mod scripted;

pub use certificate::CertificateProbe;
pub use command::CommandProbe;
pub use file::FileProbe;
pub use http::HttpProbe;
pub use scripted::ScriptedProbe;
