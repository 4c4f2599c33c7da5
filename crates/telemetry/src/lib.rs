//! Structured logging for Bitzy binaries
//!
//! This crate provides:
//! - Subscriber setup with `RUST_LOG` overriding the configured level
//! - Compact or JSON output on stderr
//! - Optional daily-rolling JSON log file
//! - A per-process session ID for correlating logs

use bitzy_core::config::TelemetrySection;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};
use uuid::Uuid;

/// Global session ID for correlating logs
static SESSION_ID: Lazy<String> = Lazy::new(|| Uuid::new_v4().to_string());

/// Initialize with default configuration
pub fn init() -> anyhow::Result<Option<WorkerGuard>> {
    init_with_config(TelemetryConfig::default())
}

/// Initialize with custom configuration
///
/// When a log file is configured the returned guard must be held until
/// exit; dropping it flushes and stops the background writer.
pub fn init_with_config(config: TelemetryConfig) -> anyhow::Result<Option<WorkerGuard>> {
    let filter = build_filter(&config.log_level);

    let compact = (!config.json).then(|| {
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(config.show_target)
            .compact()
    });
    let json = config
        .json
        .then(|| fmt::layer().json().with_writer(std::io::stderr));

    let (file, guard) = match &config.log_file {
        Some(path) => {
            let (dir, name) = split_log_path(path)?;
            let appender = tracing_appender::rolling::daily(dir, name);
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let layer = fmt::layer().json().with_ansi(false).with_writer(writer);
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(compact)
        .with(json)
        .with(file)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to set tracing subscriber: {}", e))?;

    tracing::debug!(
        session_id = %session_id(),
        version = env!("CARGO_PKG_VERSION"),
        "Telemetry initialized"
    );

    Ok(guard)
}

/// `RUST_LOG` when set and valid, otherwise `level`
pub fn build_filter(level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
}

fn split_log_path(path: &Path) -> anyhow::Result<(PathBuf, String)> {
    let name = path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Log file path has no file name: {}", path.display()))?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    Ok((dir, name.to_string()))
}

/// Get the current session ID
pub fn session_id() -> &'static str {
    &SESSION_ID
}

/// Telemetry configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub log_level: String,
    /// Emit JSON lines instead of compact text
    pub json: bool,
    /// Daily-rolling JSON log file
    pub log_file: Option<PathBuf>,
    /// Include the event target
    pub show_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self::from_section(&TelemetrySection::default())
    }
}

impl TelemetryConfig {
    /// Build from the `[telemetry]` config section
    #[must_use]
    pub fn from_section(section: &TelemetrySection) -> Self {
        Self {
            log_level: section.log_level.clone(),
            json: section.json,
            log_file: section.log_file.clone(),
            show_target: false,
        }
    }

    /// Raise the level to `debug` for the bitzy crates
    #[must_use]
    pub fn verbose(mut self) -> Self {
        self.log_level = format!("{},bitzy=debug", self.log_level);
        self.show_target = true;
        self
    }
}

/// Logs how long an operation took when stopped or dropped
pub struct Timer {
    name: &'static str,
    start: Instant,
    stopped: bool,
}

impl Timer {
    /// Start a new timer
    pub fn start(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
            stopped: false,
        }
    }

    /// Stop the timer and log the duration
    pub fn stop(mut self) -> Duration {
        self.stopped = true;
        self.record()
    }

    fn record(&self) -> Duration {
        let duration = self.start.elapsed();
        tracing::debug!(
            operation = self.name,
            duration_ms = duration.as_millis(),
            "Operation finished"
        );
        duration
    }
}

impl Drop for Timer {
    fn drop(&mut self) {
        if !self.stopped {
            self.record();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_follow_config_section() {
        let config = TelemetryConfig::default();
        assert_eq!(config.log_level, TelemetrySection::default().log_level);
        assert!(!config.json);
        assert!(config.log_file.is_none());
    }

    #[test]
    fn test_verbose_adds_directive() {
        let config = TelemetryConfig::default().verbose();
        assert!(config.log_level.ends_with(",bitzy=debug"));
        assert!(config.show_target);
    }

    #[test]
    fn test_split_log_path() {
        let (dir, name) = split_log_path(Path::new("/var/log/bitzy/bitzy.log")).unwrap();
        assert_eq!(dir, PathBuf::from("/var/log/bitzy"));
        assert_eq!(name, "bitzy.log");

        let (dir, _) = split_log_path(Path::new("bitzy.log")).unwrap();
        assert_eq!(dir, PathBuf::from("."));

        assert!(split_log_path(Path::new("/")).is_err());
    }

    #[test]
    fn test_timer() {
        let timer = Timer::start("test_operation");
        std::thread::sleep(Duration::from_millis(10));
        let duration = timer.stop();
        assert!(duration.as_millis() >= 10);
    }

    #[test]
    fn test_session_id() {
        let id = session_id();
        assert!(!id.is_empty());
        // Should be a valid UUID
        assert!(Uuid::parse_str(id).is_ok());
    }
}
