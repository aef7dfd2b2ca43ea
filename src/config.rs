use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;

use loglens_filter::DEBOUNCE_INTERVAL;
use loglens_history::HISTORY_LIMIT;
use loglens_render::MAX_DISPLAY;

/// Runtime tunables, loaded from an optional TOML file
#[derive(Clone, Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Inactivity window for search input, in milliseconds
    pub debounce_ms: u64,

    /// Maximum rendered entries per view
    pub max_display: usize,

    /// Number of files kept in history
    pub history_limit: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            debounce_ms: DEBOUNCE_INTERVAL.as_millis() as u64,
            max_display: MAX_DISPLAY,
            history_limit: HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Load from the given path, or from the platform config location when
    /// a file exists there; defaults otherwise
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = match explicit {
            Some(path) => Some(path.to_path_buf()),
            None => default_path().filter(|p| p.exists()),
        };

        let Some(path) = path else {
            return Ok(Self::default());
        };

        let content = fs::read_to_string(&path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("invalid config {}", path.display()))
    }

    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("loglens").join("config.toml"))
}
