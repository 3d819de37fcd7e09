//! Logging for rasshdash.
//!
//! The TUI owns the terminal, so in that mode logs go to a file found
//! through an XDG fallback chain. Headless mode logs to stderr.

use crate::config::LogConfig;
use anyhow::{Context, Result};
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Environment variable naming an explicit log file
pub const LOG_FILE_ENV: &str = "RASSH_DASH_LOG_FILE";

/// Where log lines go
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    Stderr,
    File(PathBuf),
}

/// Discover log file path with fallback chain
///
/// Priority:
/// 1. `log.file` from the config
/// 2. $RASSH_DASH_LOG_FILE
/// 3. $XDG_STATE_HOME/rassh/dashboard.log
/// 4. ~/.local/state/rassh/dashboard.log
pub fn discover_log_path(config: &LogConfig) -> Option<PathBuf> {
    if let Some(path) = &config.file {
        return Some(path.clone());
    }

    if let Ok(path) = std::env::var(LOG_FILE_ENV) {
        return Some(PathBuf::from(path));
    }

    if let Ok(xdg_state) = std::env::var("XDG_STATE_HOME") {
        return Some(Path::new(&xdg_state).join("rassh").join("dashboard.log"));
    }

    dirs::home_dir().map(|home| {
        home.join(".local")
            .join("state")
            .join("rassh")
            .join("dashboard.log")
    })
}

/// Choose the log target for the given mode
pub fn target_for(config: &LogConfig, headless: bool) -> LogTarget {
    if headless {
        return LogTarget::Stderr;
    }
    match discover_log_path(config) {
        Some(path) => LogTarget::File(path),
        None => LogTarget::Stderr,
    }
}

/// Build the filter: RUST_LOG wins over the configured level
fn build_filter(config: &LogConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Install the global tracing subscriber
pub fn init(config: &LogConfig, target: &LogTarget) -> Result<()> {
    let filter = build_filter(config);

    match target {
        LogTarget::Stderr => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
        }
        LogTarget::File(path) => {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init()
                .map_err(|e| anyhow::anyhow!("Failed to install logger: {}", e))?;
        }
    }

    Ok(())
}
