//! Logging setup: console output mirrored to a dated log file.
//!
//! The log file lives at `<output_root>/logs/<DDMMYY>_scraper.log`. A run on a
//! new day starts a new file; runs on the same day append to it.
//!
//! `RUST_LOG` overrides the level chosen from [`LogConfig::verbose`].

use crate::error::ScrapeError;
use chrono::{Local, NaiveDate};
use std::path::PathBuf;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::fmt::time::UtcTime;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Settings for the console and file log sinks.
#[derive(Debug, Clone)]
pub struct LogConfig {
    /// Directory that holds the dated log files.
    pub dir: PathBuf,
    /// Log this crate at debug level instead of info.
    pub verbose: bool,
}

impl LogConfig {
    pub fn new(dir: impl Into<PathBuf>, verbose: bool) -> Self {
        Self {
            dir: dir.into(),
            verbose,
        }
    }

    /// Filter used when `RUST_LOG` is unset.
    pub fn default_directive(&self) -> String {
        let level = if self.verbose { "debug" } else { "info" };
        format!("warn,{}={}", env!("CARGO_CRATE_NAME"), level)
    }
}

/// Log file name for a given day, e.g. `160526_scraper.log`.
pub fn log_file_name(day: NaiveDate) -> String {
    format!("{}_scraper.log", day.format("%d%m%y"))
}

/// Install the console and file sinks.
///
/// The returned guard flushes the file writer when dropped; keep it alive for
/// the whole run.
pub fn init(config: &LogConfig) -> Result<WorkerGuard, ScrapeError> {
    std::fs::create_dir_all(&config.dir)?;

    let file_name = log_file_name(Local::now().date_naive());
    let appender = RollingFileAppender::builder()
        .rotation(Rotation::NEVER)
        .filename_prefix(file_name)
        .build(&config.dir)
        .map_err(std::io::Error::other)?;
    let (file_writer, guard) = tracing_appender::non_blocking(appender);

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.default_directive()));

    let console = fmt::layer()
        .with_target(false)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(std::io::stdout);
    let file = fmt::layer()
        .with_ansi(false)
        .with_target(true)
        .with_timer(UtcTime::rfc_3339())
        .with_writer(file_writer);

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| ScrapeError::config("logging", e.to_string()))?;

    Ok(guard)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_file_name_is_ddmmyy() {
        let day = NaiveDate::from_ymd_opt(2026, 5, 16).unwrap();
        assert_eq!(log_file_name(day), "160526_scraper.log");
    }

    #[test]
    fn test_default_directive_tracks_verbosity() {
        let quiet = LogConfig::new("/tmp/logs", false);
        let loud = LogConfig::new("/tmp/logs", true);
        assert_eq!(quiet.default_directive(), "warn,kerrisdale_scraper=info");
        assert_eq!(loud.default_directive(), "warn,kerrisdale_scraper=debug");
    }

    #[test]
    fn test_capture_logs_records_levels() {
        let (logs, guard) = capture::capture_logs();
        tracing::info!("kept");
        tracing::error!(reason = "boom", "failed");
        drop(guard);
        tracing::error!("after guard");

        let output = logs.contents();
        assert!(output.contains("INFO"));
        assert!(output.contains("failed reason=\"boom\""));
        assert!(!output.contains("after guard"));
    }
}
