//! Configuration management for tmux-menu.
//!
//! Handles loading of user preferences: where history and hand-off files
//! live, which tmux binary to run, and input timing.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::session::DEFAULT_HISTORY_LIMIT;

const APP_DIR: &str = "tmux-menu";

/// Main configuration struct
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// tmux binary to run
    #[serde(default = "default_tmux_bin")]
    pub tmux_bin: String,

    /// Whether sessions are ordered by recency history
    #[serde(default = "default_true")]
    pub history_enabled: bool,

    /// Maximum number of history entries kept
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// History file (defaults to the per-user data directory)
    #[serde(default)]
    pub history_path: Option<PathBuf>,

    /// Directory for files exchanged with the orchestrator
    #[serde(default)]
    pub handoff_dir: Option<PathBuf>,

    /// Polling granularity of the event poller (milliseconds)
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// How long to wait for the rest of an escape sequence (milliseconds)
    #[serde(default = "default_escape_delay_ms")]
    pub escape_delay_ms: u64,
}

fn default_tmux_bin() -> String {
    "tmux".to_string()
}

fn default_true() -> bool {
    true
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_poll_interval_ms() -> u64 {
    100
}

fn default_escape_delay_ms() -> u64 {
    25
}

impl Default for Config {
    fn default() -> Self {
        Self {
            tmux_bin: default_tmux_bin(),
            history_enabled: true,
            history_limit: default_history_limit(),
            history_path: None,
            handoff_dir: None,
            poll_interval_ms: default_poll_interval_ms(),
            escape_delay_ms: default_escape_delay_ms(),
        }
    }
}

impl Config {
    /// Load configuration from the default location, or defaults if absent
    pub fn load() -> Result<Self> {
        match Self::config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    /// Load configuration from `path`, or defaults if the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Config = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.validate();

        Ok(config)
    }

    /// Clamp values to usable ranges
    pub fn validate(&mut self) {
        self.history_limit = self.history_limit.clamp(1, 10_000);
        self.poll_interval_ms = self.poll_interval_ms.clamp(10, 1_000);
        self.escape_delay_ms = self.escape_delay_ms.clamp(1, 1_000);
    }

    /// Get the path to the default config file
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.json"))
    }

    pub fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }

    pub fn escape_delay(&self) -> Duration {
        Duration::from_millis(self.escape_delay_ms)
    }

    /// Resolved history file path
    pub fn history_file(&self) -> PathBuf {
        self.history_path.clone().unwrap_or_else(|| {
            dirs::data_local_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("history")
        })
    }

    /// Resolved hand-off directory
    pub fn handoff_directory(&self) -> PathBuf {
        self.handoff_dir.clone().unwrap_or_else(default_handoff_dir)
    }
}

/// `$XDG_RUNTIME_DIR/tmux-menu`, or a per-user directory under the system
/// temp dir when there is no runtime dir.
fn default_handoff_dir() -> PathBuf {
    match dirs::runtime_dir() {
        Some(dir) => dir.join(APP_DIR),
        None => {
            let uid = nix::unistd::getuid();
            std::env::temp_dir().join(format!("{APP_DIR}-{uid}"))
        }
    }
}

/// Directory for the log file
pub fn log_dir() -> PathBuf {
    dirs::state_dir()
        .or_else(dirs::data_local_dir)
        .unwrap_or_else(std::env::temp_dir)
        .join(APP_DIR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.tmux_bin, "tmux");
        assert!(config.history_enabled);
        assert_eq!(config.history_limit, 100);
        assert_eq!(config.poll_interval(), Duration::from_millis(100));
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{ "history_limit": 5, "tmux_bin": "/opt/tmux" }"#).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.tmux_bin, "/opt/tmux");
        assert!(config.history_enabled);
        assert_eq!(config.escape_delay_ms, 25);
    }

    #[test]
    fn test_invalid_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "not json").unwrap();
        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_validate_clamps() {
        let mut config = Config {
            history_limit: 0,
            poll_interval_ms: 0,
            escape_delay_ms: 60_000,
            ..Default::default()
        };
        config.validate();
        assert_eq!(config.history_limit, 1);
        assert_eq!(config.poll_interval_ms, 10);
        assert_eq!(config.escape_delay_ms, 1_000);
    }

    #[test]
    fn test_explicit_paths_win() {
        let config = Config {
            history_path: Some(PathBuf::from("/x/history")),
            handoff_dir: Some(PathBuf::from("/x/run")),
            ..Default::default()
        };
        assert_eq!(config.history_file(), PathBuf::from("/x/history"));
        assert_eq!(config.handoff_directory(), PathBuf::from("/x/run"));
    }
}
