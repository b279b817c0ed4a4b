//! External-process probe.
//!
//! Wraps checks that only exist as command-line tools (dependency audits,
//! vendor CLIs): spawn the program, interpret a zero exit status as healthy,
//! and carry trimmed output in the result detail.

use crate::check::ports::{Probe, ProbeError, ProbeReport, ProbeResult};
use async_trait::async_trait;
use serde_json::json;
use std::process::Stdio;
use tokio::process::Command;

/// Longest captured stdout/stderr excerpt, in characters.
const OUTPUT_EXCERPT_CHARS: usize = 2000;

/// Probe that runs an external program and inspects its exit status.
#[derive(Debug, Clone)]
pub struct CommandProbe {
    program: String,
    args: Vec<String>,
}

impl CommandProbe {
    /// Creates a command probe.
    ///
    /// # Errors
    ///
    /// Returns [`ProbeError::InvalidTarget`] when the program name is empty.
    pub fn new(
        program: impl Into<String>,
        args: impl IntoIterator<Item = String>,
    ) -> Result<Self, ProbeError> {
        let program_value = program.into();
        if program_value.trim().is_empty() {
            return Err(ProbeError::InvalidTarget(
                "command probe requires a program".to_owned(),
            ));
        }
        Ok(Self {
            program: program_value,
            args: args.into_iter().collect(),
        })
    }

    /// Returns the program this probe runs.
    #[must_use]
    pub fn program(&self) -> &str {
        &self.program
    }
}

fn excerpt(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw)
        .trim()
        .chars()
        .take(OUTPUT_EXCERPT_CHARS)
        .collect()
}

#[async_trait]
impl Probe for CommandProbe {
    async fn probe(&self) -> ProbeResult<ProbeReport> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|err| ProbeError::Spawn {
                program: self.program.clone(),
                reason: err.to_string(),
            })?;

        let exit_code = output.status.code();
        let detail = json!({
            "program": self.program,
            "exit_code": exit_code,
            "stdout": excerpt(&output.stdout),
            "stderr": excerpt(&output.stderr),
        });

        let report = if output.status.success() {
            ProbeReport::healthy(format!("{} exited successfully", self.program))
        } else {
            let described = exit_code.map_or_else(
                || "terminated by signal".to_owned(),
                |code| format!("exited with status {code}"),
            );
            ProbeReport::unhealthy(format!("{} {described}", self.program))
        };
        Ok(report.with_detail(detail))
    }
}
