//! Runs the Sitewatch health-check pipeline.
//!
//! Usage:
//!
//! ```text
//! sitewatch [--config <path>] [--silent] [--watch <secs>] [--help]
//! ```
//!
//! One invocation runs every configured check once, persists the merged
//! status document, writes the dashboard, and escalates failures. With
//! `--watch` the pipeline repeats on the given interval until interrupted.
//!
//! Exit codes: 0 when every check passed, 1 when any check failed or
//! errored, 2 when the pipeline could not run at all.

use mockable::DefaultClock;
use sitewatch::alert::services::AlertDispatcher;
use sitewatch::check::services::CheckRunner;
use sitewatch::config::{ConfigError, SitewatchConfig};
use sitewatch::pipeline::services::{HealthPipeline, PipelineError, Scheduler};
use sitewatch::report::services::ReportRenderer;
use sitewatch::status::adapters::JsonFileStatusRepository;
use sitewatch::status::services::StatusStore;
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::error;
use tracing_subscriber::EnvFilter;

const DEFAULT_CONFIG_PATH: &str = "sitewatch.json";

const USAGE: &str = "Usage: sitewatch [OPTIONS]

Options:
  --config <path>  Configuration file (default: sitewatch.json)
  --silent         Log errors only
  --watch <secs>   Re-run on the given interval until interrupted
  --help           Show this help
";

/// Errors that abort the process with exit code 2.
#[derive(Debug, Error)]
enum CliError {
    #[error("invalid arguments: {0}")]
    InvalidArgs(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("runtime init failed: {0}")]
    RuntimeInit(#[source] std::io::Error),
}

#[derive(Debug)]
struct CliArgs {
    config: PathBuf,
    silent: bool,
    watch: Option<Duration>,
    help: bool,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<CliArgs, CliError> {
    let mut parsed = CliArgs {
        config: PathBuf::from(DEFAULT_CONFIG_PATH),
        silent: false,
        watch: None,
        help: false,
    };
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                let value = args.next().ok_or_else(|| {
                    CliError::InvalidArgs("--config requires a path".to_owned())
                })?;
                parsed.config = PathBuf::from(value);
            }
            "--silent" => parsed.silent = true,
            "--watch" => {
                let value = args.next().ok_or_else(|| {
                    CliError::InvalidArgs("--watch requires an interval in seconds".to_owned())
                })?;
                let secs: u64 = value.parse().map_err(|_| {
                    CliError::InvalidArgs(format!("--watch interval '{value}' is not a number"))
                })?;
                if secs == 0 {
                    return Err(CliError::InvalidArgs(
                        "--watch interval must be at least one second".to_owned(),
                    ));
                }
                parsed.watch = Some(Duration::from_secs(secs));
            }
            "--help" | "-h" => parsed.help = true,
            other => {
                return Err(CliError::InvalidArgs(format!("unknown argument '{other}'")));
            }
        }
    }
    Ok(parsed)
}

fn init_tracing(silent: bool) {
    let default_directive = if silent { "error" } else { "info" };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

type CliPipeline = HealthPipeline<JsonFileStatusRepository, DefaultClock>;

fn build_pipeline(config: &SitewatchConfig, silent: bool) -> Result<CliPipeline, CliError> {
    let clock = Arc::new(DefaultClock);
    let repository = Arc::new(JsonFileStatusRepository::new(config.status_file()));

    let mut store = StatusStore::new(repository, Arc::clone(&clock));
    if let Some(cap) = config.history_cap() {
        store = store.with_history_cap(cap);
    }

    let mut dispatcher = AlertDispatcher::new(Arc::clone(&clock));
    if let Some(tracker) = config.issue_tracker()? {
        dispatcher = dispatcher.with_issue_tracker(Arc::new(tracker));
    }
    if let Some(mailer) = config.mailer()? {
        dispatcher = dispatcher.with_mailer(Arc::new(mailer));
    }
    if let Some(window) = config.dedup_window() {
        dispatcher = dispatcher.with_dedup_window(window);
    }

    let definitions = config.definitions()?;
    Ok(HealthPipeline::new(
        CheckRunner::new(Arc::clone(&clock)).with_silent(silent),
        store,
        ReportRenderer::new(Arc::clone(&clock)),
        dispatcher,
        definitions,
        config.report_file(),
        clock,
    )
    .with_alert_emails(config.alert_emails()))
}

fn run(args: &CliArgs) -> Result<ExitCode, CliError> {
    let config = SitewatchConfig::load(&args.config)?;
    let pipeline = build_pipeline(&config, args.silent)?;
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(CliError::RuntimeInit)?;

    if let Some(interval) = args.watch {
        let scheduler = Scheduler::new(pipeline, interval);
        runtime.block_on(async {
            let (sender, receiver) = Scheduler::<JsonFileStatusRepository, DefaultClock>::shutdown_channel();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    sender.send(true).ok();
                }
            });
            scheduler.run(receiver).await;
        });
        return Ok(ExitCode::SUCCESS);
    }

    let outcome = runtime.block_on(pipeline.run_once())?;
    if outcome.summary().all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::from(1))
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            init_tracing(false);
            error!("{err}");
            return ExitCode::from(2);
        }
    };
    if args.help {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(USAGE.as_bytes()).ok();
        return ExitCode::SUCCESS;
    }

    init_tracing(args.silent);
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            error!("{err}");
            ExitCode::from(2)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_arguments() {
        let args = parse_args(std::iter::empty()).expect("parse");
        assert_eq!(args.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        assert!(!args.silent);
        assert_eq!(args.watch, None);
        assert!(!args.help);
    }

    #[test]
    fn all_flags_parse() {
        let args = parse_args(
            ["--config", "ops/watch.json", "--silent", "--watch", "300"]
                .into_iter()
                .map(str::to_owned),
        )
        .expect("parse");
        assert_eq!(args.config, PathBuf::from("ops/watch.json"));
        assert!(args.silent);
        assert_eq!(args.watch, Some(Duration::from_secs(300)));
    }

    #[test]
    fn unknown_and_malformed_arguments_are_rejected() {
        assert!(parse_args(["--verbose".to_owned()].into_iter()).is_err());
        assert!(parse_args(["--config".to_owned()].into_iter()).is_err());
        assert!(parse_args(["--watch".to_owned(), "soon".to_owned()].into_iter()).is_err());
        assert!(parse_args(["--watch".to_owned(), "0".to_owned()].into_iter()).is_err());
    }
}
