//! Tracing setup for the launcher binary.
//!
//! With `logging.to_file` set, events go to `<state>/logs/launcher-<timestamp>.log`;
//! otherwise they are written to stderr so they never mix with command output.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;

/// Keeps the file writer alive; drop it only when the process is done logging
pub struct LoggingHandle {
    /// Flushes buffered file output on drop
    pub _guard: Option<WorkerGuard>,

    /// Set when events are written to a file
    pub log_file_path: Option<PathBuf>,
}

/// Name of the log file for a run started now
fn log_file_name() -> String {
    let timestamp = chrono::Utc::now().format("%Y%m%dT%H%M%SZ");
    format!("launcher-{}.log", timestamp)
}

/// `--debug` beats the configured level; `RUST_LOG` beats both
fn level_directive(config: &Config, debug_override: bool, rust_log: Option<String>) -> String {
    rust_log.unwrap_or_else(|| {
        if debug_override {
            "debug".to_string()
        } else {
            config.logging.level.clone()
        }
    })
}

/// Install the global subscriber for this process
pub fn init_logging(config: &Config, debug_override: bool) -> Result<LoggingHandle> {
    let directive = level_directive(config, debug_override, std::env::var("RUST_LOG").ok());
    let filter = EnvFilter::new(directive);

    if !config.logging.to_file {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .init();

        return Ok(LoggingHandle {
            _guard: None,
            log_file_path: None,
        });
    }

    let logs_dir = config.logs_path();
    let (log_file_path, appender) = open_log_file(&logs_dir)?;
    let (writer, guard) = tracing_appender::non_blocking(appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(writer),
        )
        .init();

    Ok(LoggingHandle {
        _guard: Some(guard),
        log_file_path: Some(log_file_path),
    })
}

fn open_log_file(
    logs_dir: &Path,
) -> Result<(PathBuf, tracing_appender::rolling::RollingFileAppender)> {
    std::fs::create_dir_all(logs_dir)
        .with_context(|| format!("Failed to create log directory {}", logs_dir.display()))?;

    let name = log_file_name();
    let appender = tracing_appender::rolling::never(logs_dir, &name);
    Ok((logs_dir.join(name), appender))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn config_in(dir: &TempDir) -> Config {
        let mut config = Config::default();
        config.paths.state = dir.path().to_string_lossy().to_string();
        config
    }

    #[test]
    fn test_log_file_named_after_launcher() {
        let name = log_file_name();
        assert!(name.starts_with("launcher-"));
        assert!(name.ends_with("Z.log"));
    }

    #[test]
    fn test_debug_flag_overrides_configured_level() {
        let config = Config::default();
        assert_eq!(level_directive(&config, false, None), "info");
        assert_eq!(level_directive(&config, true, None), "debug");
    }

    #[test]
    fn test_rust_log_wins_over_debug_flag() {
        let config = Config::default();
        let directive = level_directive(&config, true, Some("launcher=trace".into()));
        assert_eq!(directive, "launcher=trace");
    }

    #[test]
    fn test_log_file_lands_in_state_logs_dir() {
        let dir = TempDir::new().unwrap();
        let config = config_in(&dir);

        let (path, _appender) = open_log_file(&config.logs_path()).unwrap();

        assert!(config.logs_path().is_dir());
        assert!(path.starts_with(dir.path()));
        assert!(path.parent().unwrap().ends_with("logs"));
    }

    #[test]
    fn test_stderr_is_the_default_sink() {
        assert!(!Config::default().logging.to_file);
    }
}
