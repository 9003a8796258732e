//! Configuration loading and defaults for xss-probe.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Main configuration for xss-probe.
///
/// The millisecond defaults are the tracker defaults: poll every 5 seconds
/// while idle, every 2 minutes while disabled, and treat one minute without
/// input as idle.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Idle time in milliseconds that counts as "idle" (default: 60000).
    pub idle_threshold_ms: u64,

    /// Poll interval in milliseconds while already idle (default: 5000).
    pub poll_when_idle_ms: u64,

    /// Poll interval in milliseconds while the extension or saver is
    /// unavailable (default: 120000).
    pub poll_when_disabled_ms: u64,

    /// Display to connect to. If unset, uses $DISPLAY.
    pub display: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idle_threshold_ms: 60_000,
            poll_when_idle_ms: 5_000,
            poll_when_disabled_ms: 120_000,
            display: None,
        }
    }
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Load configuration from the default path, or return defaults if not found.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        if let Some(p) = path {
            return Self::load(p);
        }

        // Try default config path
        if let Some(config_dir) = dirs::config_dir() {
            let default_path = config_dir.join("xss-probe").join("config.toml");
            if default_path.exists() {
                return Self::load(&default_path);
            }
        }

        Ok(Self::default())
    }

    /// Idle threshold as a `Duration`.
    pub fn idle_threshold(&self) -> Duration {
        Duration::from_millis(self.idle_threshold_ms)
    }

    /// Poll-while-idle interval as a `Duration`.
    pub fn poll_when_idle(&self) -> Duration {
        Duration::from_millis(self.poll_when_idle_ms)
    }

    /// Poll-while-disabled interval as a `Duration`.
    pub fn poll_when_disabled(&self) -> Duration {
        Duration::from_millis(self.poll_when_disabled_ms)
    }
}
