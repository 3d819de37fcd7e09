//! Configuration management for rasshdash.
//!
//! Loads settings from a TOML file found through a fallback chain, or uses
//! defaults. Every field has a default so partial files are fine.

use anyhow::{Context, Result};
use rassh_shared::{ACTIVITY_PATH, DEFAULT_BASE_URL, SOCKET_PATH, STATS_PATH};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "RASSH_DASH_CONFIG";

/// Where the honeypot dashboard lives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    #[serde(default = "default_stats_path")]
    pub stats_path: String,

    #[serde(default = "default_activity_path")]
    pub activity_path: String,

    /// Socket.IO mount point
    #[serde(default = "default_socket_path")]
    pub socket_path: String,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_stats_path() -> String {
    STATS_PATH.to_string()
}

fn default_activity_path() -> String {
    ACTIVITY_PATH.to_string()
}

fn default_socket_path() -> String {
    SOCKET_PATH.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            stats_path: default_stats_path(),
            activity_path: default_activity_path(),
            socket_path: default_socket_path(),
        }
    }
}

impl ServerConfig {
    pub fn stats_url(&self) -> String {
        join_url(&self.base_url, &self.stats_path)
    }

    pub fn activity_url(&self) -> String {
        join_url(&self.base_url, &self.activity_path)
    }
}

fn join_url(base: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Pull schedule
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollConfig {
    #[serde(default = "default_stats_interval")]
    pub stats_interval_secs: u64,

    #[serde(default = "default_activity_interval")]
    pub activity_interval_secs: u64,

    /// Per-request timeout; unset leaves it to the transport
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_secs: Option<u64>,
}

fn default_stats_interval() -> u64 {
    5
}

fn default_activity_interval() -> u64 {
    10
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            stats_interval_secs: default_stats_interval(),
            activity_interval_secs: default_activity_interval(),
            request_timeout_secs: None,
        }
    }
}

impl PollConfig {
    pub fn stats_interval(&self) -> Duration {
        Duration::from_secs(self.stats_interval_secs.max(1))
    }

    pub fn activity_interval(&self) -> Duration {
        Duration::from_secs(self.activity_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}

/// Face and effect animation timings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimationConfig {
    /// Shrink phase before the glyph swap
    #[serde(default = "default_shrink_ms")]
    pub shrink_ms: u64,

    /// Grow-back phase after the glyph swap
    #[serde(default = "default_settle_ms")]
    pub settle_ms: u64,

    /// Effect pulse duration
    #[serde(default = "default_effect_ms")]
    pub effect_ms: u64,
}

fn default_shrink_ms() -> u64 {
    150
}

fn default_settle_ms() -> u64 {
    500
}

fn default_effect_ms() -> u64 {
    1_000
}

impl Default for AnimationConfig {
    fn default() -> Self {
        Self {
            shrink_ms: default_shrink_ms(),
            settle_ms: default_settle_ms(),
            effect_ms: default_effect_ms(),
        }
    }
}

/// Push channel reconnection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PushConfig {
    #[serde(default = "default_reconnect_delay")]
    pub reconnect_delay_ms: u64,

    #[serde(default = "default_reconnect_delay_max")]
    pub reconnect_delay_max_ms: u64,
}

fn default_reconnect_delay() -> u64 {
    1_000
}

fn default_reconnect_delay_max() -> u64 {
    5_000
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            reconnect_delay_ms: default_reconnect_delay(),
            reconnect_delay_max_ms: default_reconnect_delay_max(),
        }
    }
}

/// Logging
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Filter directive, overridden by RUST_LOG
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file used while the TUI owns the terminal
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Full dashboard configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub poll: PollConfig,

    #[serde(default)]
    pub animation: AnimationConfig,

    #[serde(default)]
    pub push: PushConfig,

    #[serde(default)]
    pub log: LogConfig,
}

impl DashConfig {
    /// Discover config file path with fallback chain
    ///
    /// Priority:
    /// 1. Explicit --config flag
    /// 2. $RASSH_DASH_CONFIG
    /// 3. $XDG_CONFIG_HOME/rassh/dashboard.toml (or ~/.config/...)
    pub fn discover_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }

        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Some(PathBuf::from(path));
        }

        dirs::config_dir().map(|dir| dir.join("rassh").join("dashboard.toml"))
    }

    /// Load config from the discovered path, or return defaults.
    ///
    /// A missing implicit (XDG) file means defaults; a missing file named by
    /// `--config` or $RASSH_DASH_CONFIG is an error. Any file that exists but
    /// cannot be read or parsed is an error.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let explicit_given = explicit.is_some() || std::env::var(CONFIG_ENV).is_ok();
        let Some(path) = Self::discover_path(explicit) else {
            return Ok(Self::default());
        };

        if !path.exists() {
            if explicit_given {
                anyhow::bail!("Config file {} does not exist", path.display());
            }
            return Ok(Self::default());
        }

        Self::load_from_path(&path)
    }

    /// Load config from specific path
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: DashConfig = toml::from_str(&content)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Apply a `--url` override
    pub fn with_base_url(mut self, url: Option<&str>) -> Self {
        if let Some(url) = url {
            self.server.base_url = url.to_string();
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_match_reference_cadence() {
        let config = DashConfig::default();
        assert_eq!(config.poll.stats_interval(), Duration::from_secs(5));
        assert_eq!(config.poll.activity_interval(), Duration::from_secs(10));
        assert_eq!(config.poll.request_timeout(), None);
        assert_eq!(config.animation.shrink_ms, 150);
        assert_eq!(config.animation.effect_ms, 1_000);
    }

    #[test]
    fn test_urls_are_joined_once() {
        let server = ServerConfig {
            base_url: "http://pot.local:8080/".to_string(),
            ..Default::default()
        };
        assert_eq!(server.stats_url(), "http://pot.local:8080/api/stats");
        assert_eq!(
            server.activity_url(),
            "http://pot.local:8080/api/recent_activity"
        );
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[poll]\nstats_interval_secs = 2\n\n[server]\nbase_url = \"http://10.0.0.5:9000\"").unwrap();

        let config = DashConfig::load_from_path(file.path()).unwrap();
        assert_eq!(config.poll.stats_interval_secs, 2);
        assert_eq!(config.poll.activity_interval_secs, 10);
        assert_eq!(config.server.base_url, "http://10.0.0.5:9000");
        assert_eq!(config.server.stats_path, STATS_PATH);
        assert_eq!(config.animation, AnimationConfig::default());
    }

    #[test]
    fn test_invalid_file_is_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[poll\nstats_interval_secs = ").unwrap();
        assert!(DashConfig::load_from_path(file.path()).is_err());
    }

    #[test]
    fn test_load_rejects_existing_invalid_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nbase_url = 8080").unwrap();
        assert!(DashConfig::load(Some(file.path())).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.toml");
        assert!(DashConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn test_zero_interval_is_clamped() {
        let poll = PollConfig {
            stats_interval_secs: 0,
            ..Default::default()
        };
        assert_eq!(poll.stats_interval(), Duration::from_secs(1));
    }

    #[test]
    fn test_url_override() {
        let config = DashConfig::default().with_base_url(Some("http://192.0.2.1:8080"));
        assert_eq!(config.server.base_url, "http://192.0.2.1:8080");
        let config = config.with_base_url(None);
        assert_eq!(config.server.base_url, "http://192.0.2.1:8080");
    }
}
