//! Typed runtime configuration.
//!
//! Sitewatch reads one JSON document describing the checks to run, where to
//! keep state, and how to escalate failures. A representative configuration
//! is:
//!
//! ```json
//! {
//!   "status_file": "state/status.json",
//!   "report_file": "public/dashboard.html",
//!   "history_cap": 20,
//!   "checks": [
//!     { "name": "homepage", "probe": { "type": "http", "url": "https://burnitoken.website" } },
//!     { "name": "tls", "probe": { "type": "certificate", "host": "burnitoken.website" } },
//!     { "name": "audit", "probe": { "type": "command", "program": "npm", "args": ["audit"] }, "timeout_secs": 120 },
//!     { "name": "manifest", "probe": { "type": "file", "path": "site/manifest.json", "require_json": true } }
//!   ],
//!   "alerts": {
//!     "github": { "repository": "burni/site", "token_env": "GITHUB_TOKEN" },
//!     "email": {
//!       "host": "smtp.example.org",
//!       "from": "sitewatch <ops@example.org>",
//!       "recipients": ["oncall@example.org"],
//!       "username": "ops",
//!       "password_env": "SMTP_PASSWORD"
//!     },
//!     "dedup_window_minutes": 30
//!   }
//! }
//! ```
//!
//! Secrets never live in the file; `token_env` and `password_env` name the
//! environment variables to read them from. Validation fails fast: an
//! unknown field, a duplicate check name, a zero timeout, an unparsable
//! URL, or a missing secret variable all abort startup.

use crate::alert::adapters::{GitHubIssueTracker, SmtpCredentials, SmtpMailer};
use crate::check::adapters::{CertificateProbe, CommandProbe, FileProbe, HttpProbe};
use crate::check::domain::{CheckDefinition, CheckDomainError, CheckName};
use crate::check::ports::Probe;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Per-check timeout applied when the file names none.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// TLS port probed when a certificate check names none.
pub const DEFAULT_CERTIFICATE_PORT: u16 = 443;

/// SMTP submission port used when the email section names none.
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Errors raised while loading or applying a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        /// Path that was read.
        path: PathBuf,
        /// Underlying filesystem error.
        #[source]
        source: Arc<std::io::Error>,
    },
    /// The file is not a valid configuration document.
    #[error("failed to parse config {}: {source}", path.display())]
    Parse {
        /// Path that was parsed.
        path: PathBuf,
        /// Underlying serde error.
        #[source]
        source: serde_json::Error,
    },
    /// The document configures no checks at all.
    #[error("config defines no checks")]
    NoChecks,
    /// Two checks share a name.
    #[error("duplicate check name '{0}'")]
    DuplicateCheck(String),
    /// A check name or timeout is invalid.
    #[error(transparent)]
    Check(#[from] CheckDomainError),
    /// A probe target is invalid.
    #[error("check '{check}': {message}")]
    InvalidProbe {
        /// Check the probe belongs to.
        check: String,
        /// Validation failure description.
        message: String,
    },
    /// A secret-bearing environment variable is not set.
    #[error("environment variable '{0}' is not set")]
    MissingEnvVar(String),
    /// The alerts section is internally inconsistent.
    #[error("invalid alerts config: {0}")]
    InvalidAlerts(String),
    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Probe target description for one check.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ProbeSpec {
    Http {
        url: String,
        expected_status: Option<u16>,
    },
    Certificate {
        host: String,
        port: Option<u16>,
        warn_within_days: Option<i64>,
    },
    Command {
        program: String,
        #[serde(default)]
        args: Vec<String>,
    },
    File {
        path: PathBuf,
        #[serde(default)]
        require_json: bool,
    },
}

/// One configured check.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct CheckSpec {
    name: String,
    probe: ProbeSpec,
    timeout_secs: Option<u64>,
}

/// GitHub escalation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct GitHubSpec {
    repository: String,
    token_env: String,
    #[serde(default)]
    labels: Vec<String>,
    api_base: Option<String>,
}

/// Email escalation settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmailSpec {
    host: String,
    port: Option<u16>,
    from: String,
    recipients: Vec<String>,
    username: Option<String>,
    password_env: Option<String>,
}

/// Escalation channel settings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AlertsSpec {
    github: Option<GitHubSpec>,
    email: Option<EmailSpec>,
    dedup_window_minutes: Option<i64>,
}

/// Validated Sitewatch configuration.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SitewatchConfig {
    checks: Vec<CheckSpec>,
    #[serde(default = "default_status_file")]
    status_file: PathBuf,
    #[serde(default = "default_report_file")]
    report_file: PathBuf,
    history_cap: Option<usize>,
    #[serde(default)]
    alerts: AlertsSpec,
}

fn default_status_file() -> PathBuf {
    PathBuf::from("sitewatch-status.json")
}

fn default_report_file() -> PathBuf {
    PathBuf::from("sitewatch-report.html")
}

impl SitewatchConfig {
    /// Loads and validates a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed, or
    /// when validation fails.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let text = std::fs::read_to_string(path).map_err(|err| ConfigError::Read {
            path: path.to_path_buf(),
            source: Arc::new(err),
        })?;
        Self::from_json(path, &text)
    }

    /// Parses and validates a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when parsing or validation fails.
    pub fn from_json(path: &Path, text: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(text).map_err(|err| ConfigError::Parse {
            path: path.to_path_buf(),
            source: err,
        })?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.checks.is_empty() {
            return Err(ConfigError::NoChecks);
        }
        let mut seen = BTreeSet::new();
        for check in &self.checks {
            let name = CheckName::new(check.name.as_str())?;
            if !seen.insert(name) {
                return Err(ConfigError::DuplicateCheck(check.name.clone()));
            }
        }
        if let Some(email) = &self.alerts.email {
            if email.username.is_some() != email.password_env.is_some() {
                return Err(ConfigError::InvalidAlerts(
                    "email auth requires both username and password_env".to_owned(),
                ));
            }
        }
        Ok(())
    }

    /// Returns where the status document is kept.
    #[must_use]
    pub fn status_file(&self) -> &Path {
        &self.status_file
    }

    /// Returns where the rendered dashboard is written.
    #[must_use]
    pub fn report_file(&self) -> &Path {
        &self.report_file
    }

    /// Returns the configured per-check history cap, when set.
    #[must_use]
    pub const fn history_cap(&self) -> Option<usize> {
        self.history_cap
    }

    /// Returns whether aggregate alerts should request the email channel.
    #[must_use]
    pub const fn alert_emails(&self) -> bool {
        self.alerts.email.is_some()
    }

    /// Returns the configured alert de-duplication window, when set.
    #[must_use]
    pub fn dedup_window(&self) -> Option<chrono::Duration> {
        self.alerts
            .dedup_window_minutes
            .map(chrono::Duration::minutes)
    }

    /// Builds the runnable check definitions.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a check name, timeout, or probe target
    /// is invalid.
    pub fn definitions(&self) -> ConfigResult<Vec<CheckDefinition>> {
        let client = Client::builder()
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        self.checks
            .iter()
            .map(|check| {
                let name = CheckName::new(check.name.as_str())?;
                let probe = build_probe(&check.name, &check.probe, &client)?;
                let timeout =
                    Duration::from_secs(check.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS));
                Ok(CheckDefinition::new(name, probe, timeout)?)
            })
            .collect()
    }

    /// Builds the GitHub issue tracker, when configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingEnvVar`] when the token variable is
    /// not set.
    pub fn issue_tracker(&self) -> ConfigResult<Option<GitHubIssueTracker>> {
        self.issue_tracker_with(|key| std::env::var(key).ok())
    }

    fn issue_tracker_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Option<GitHubIssueTracker>> {
        let Some(github) = &self.alerts.github else {
            return Ok(None);
        };
        let token = lookup(&github.token_env)
            .ok_or_else(|| ConfigError::MissingEnvVar(github.token_env.clone()))?;
        let client = Client::builder()
            .build()
            .map_err(|err| ConfigError::HttpClient(err.to_string()))?;
        let mut tracker = GitHubIssueTracker::new(client, github.repository.clone(), token)
            .with_labels(github.labels.clone());
        if let Some(api_base) = &github.api_base {
            tracker = tracker.with_api_base(api_base.clone());
        }
        Ok(Some(tracker))
    }

    /// Builds the SMTP mailer, when configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the password variable is not set or an
    /// address does not parse.
    pub fn mailer(&self) -> ConfigResult<Option<SmtpMailer>> {
        self.mailer_with(|key| std::env::var(key).ok())
    }

    fn mailer_with(
        &self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> ConfigResult<Option<SmtpMailer>> {
        let Some(email) = &self.alerts.email else {
            return Ok(None);
        };
        let credentials = match (&email.username, &email.password_env) {
            (Some(username), Some(password_env)) => {
                let password = lookup(password_env)
                    .ok_or_else(|| ConfigError::MissingEnvVar(password_env.clone()))?;
                Some(SmtpCredentials {
                    username: username.clone(),
                    password,
                })
            }
            _ => None,
        };
        let mailer = SmtpMailer::new(
            &email.host,
            email.port.unwrap_or(DEFAULT_SMTP_PORT),
            credentials,
            &email.from,
            &email.recipients,
        )
        .map_err(|err| ConfigError::InvalidAlerts(err.to_string()))?;
        Ok(Some(mailer))
    }
}

fn build_probe(check: &str, spec: &ProbeSpec, client: &Client) -> ConfigResult<Arc<dyn Probe>> {
    let invalid = |message: String| ConfigError::InvalidProbe {
        check: check.to_owned(),
        message,
    };
    match spec {
        ProbeSpec::Http {
            url,
            expected_status,
        } => {
            let mut probe = HttpProbe::new(client.clone(), url)
                .map_err(|err| invalid(err.to_string()))?;
            if let Some(status) = expected_status {
                probe = probe.with_expected_status(*status);
            }
            Ok(Arc::new(probe))
        }
        ProbeSpec::Certificate {
            host,
            port,
            warn_within_days,
        } => {
            let mut probe =
                CertificateProbe::new(host.clone(), port.unwrap_or(DEFAULT_CERTIFICATE_PORT))
                    .map_err(|err| invalid(err.to_string()))?;
            if let Some(days) = warn_within_days {
                probe = probe.with_warn_within_days(*days);
            }
            Ok(Arc::new(probe))
        }
        ProbeSpec::Command { program, args } => {
            let probe = CommandProbe::new(program.clone(), args.iter().cloned())
                .map_err(|err| invalid(err.to_string()))?;
            Ok(Arc::new(probe))
        }
        ProbeSpec::File { path, require_json } => {
            let mut probe = FileProbe::new(path.clone());
            if *require_json {
                probe = probe.requiring_json();
            }
            Ok(Arc::new(probe))
        }
    }
}
