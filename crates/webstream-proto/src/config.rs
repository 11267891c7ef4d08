use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::platform;
use crate::history::HistoryFormat;
use crate::protocol::Dialect;
use crate::provider::{Provider, LABEL_MAX};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub paths: PathsConfig,
}

/// Which variant of the UI to run: provider set and host write dialect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Providers offered by "New Search", in menu order.  The first one is
    /// the default when the host reports none.
    #[serde(default = "default_providers")]
    pub providers: Vec<Provider>,
    #[serde(default)]
    pub dialect: Dialect,
    /// Root screen title; the current provider tag is appended when more
    /// than one provider is configured.
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default = "default_label_max")]
    pub label_max: usize,
}

/// Tick cadence.  Polling and the spinner are counted in render ticks.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimingConfig {
    #[serde(default = "default_tick_ms")]
    pub tick_ms: u64,
    #[serde(default = "default_poll_every_ticks")]
    pub poll_every_ticks: u32,
    #[serde(default = "default_spinner_every_ticks")]
    pub spinner_every_ticks: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "platform::history_path")]
    pub history_file: PathBuf,
    #[serde(default = "platform::legacy_history_paths")]
    pub legacy_history_files: Vec<PathBuf>,
}

impl EngineConfig {
    /// Providers to offer, never empty.
    pub fn providers(&self) -> Vec<Provider> {
        let mut out: Vec<Provider> = Vec::new();
        for p in &self.providers {
            if !out.contains(p) {
                out.push(*p);
            }
        }
        if out.is_empty() {
            out.push(Provider::default());
        }
        out
    }

    pub fn default_provider(&self) -> Provider {
        self.providers().first().copied().unwrap_or_default()
    }

    pub fn is_single_provider(&self) -> bool {
        self.providers().len() == 1
    }

    /// Single-provider variants keep the older bare-string history format.
    pub fn history_format(&self) -> HistoryFormat {
        if self.is_single_provider() {
            HistoryFormat::Strings
        } else {
            HistoryFormat::Objects
        }
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            providers: default_providers(),
            dialect: Dialect::default(),
            title: default_title(),
            label_max: default_label_max(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_ms: default_tick_ms(),
            poll_every_ticks: default_poll_every_ticks(),
            spinner_every_ticks: default_spinner_every_ticks(),
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            history_file: platform::history_path(),
            legacy_history_files: platform::legacy_history_paths(),
        }
    }
}

fn default_providers() -> Vec<Provider> {
    Provider::ALL.to_vec()
}

fn default_title() -> String {
    "Webstream".to_string()
}

fn default_label_max() -> usize {
    LABEL_MAX
}

fn default_tick_ms() -> u64 {
    44
}

fn default_poll_every_ticks() -> u32 {
    6
}

fn default_spinner_every_ticks() -> u32 {
    3
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let config_path = Self::config_path();

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(&config_path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("webstream.toml")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            timing: TimingConfig::default(),
            paths: PathsConfig::default(),
        }
    }
}
