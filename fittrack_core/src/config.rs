//! Configuration file support for FitTrack.
//!
//! Configuration is loaded from `$XDG_CONFIG_HOME/fittrack/config.toml`.
//! `FITTRACK_BASE_URL` and `FITTRACK_TOKEN` override the file.

use crate::snapshot::SnapshotLimits;
use crate::{Error, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Application configuration
#[derive(Clone, Debug, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub remote: RemoteConfig,

    #[serde(default)]
    pub dashboard: DashboardConfig,

    #[serde(default)]
    pub insights: InsightsConfig,

    #[serde(default)]
    pub data: DataConfig,
}

/// Remote service connection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer credential; issued outside this tool
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl RemoteConfig {
    /// The bearer credential, or a configuration error naming how to set it
    pub fn credential(&self) -> Result<SecretString> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(|t| SecretString::from(t.to_string()))
            .ok_or_else(|| {
                Error::Config("no API token; set FITTRACK_TOKEN or [remote].token".into())
            })
    }
}

/// Dashboard slice sizes
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default = "default_recent_exercises")]
    pub recent_exercises: usize,

    #[serde(default = "default_recent_nutrition")]
    pub recent_nutrition: usize,

    #[serde(default = "default_recent_progress")]
    pub recent_progress: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            recent_exercises: default_recent_exercises(),
            recent_nutrition: default_recent_nutrition(),
            recent_progress: default_recent_progress(),
        }
    }
}

impl DashboardConfig {
    pub fn limits(&self) -> SnapshotLimits {
        SnapshotLimits {
            recent_exercises: self.recent_exercises,
            recent_nutrition: self.recent_nutrition,
            recent_progress: self.recent_progress,
        }
    }
}

/// Advice service behaviour
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct InsightsConfig {
    #[serde(default = "default_fallback_advice")]
    pub fallback_advice: String,
}

impl Default for InsightsConfig {
    fn default() -> Self {
        Self {
            fallback_advice: default_fallback_advice(),
        }
    }
}

/// Local data configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

// Default value functions
fn default_base_url() -> String {
    "http://localhost:8001/api".into()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_recent_exercises() -> usize {
    SnapshotLimits::default().recent_exercises
}

fn default_recent_nutrition() -> usize {
    SnapshotLimits::default().recent_nutrition
}

fn default_recent_progress() -> usize {
    SnapshotLimits::default().recent_progress
}

fn default_fallback_advice() -> String {
    crate::insight::FALLBACK_ADVICE.into()
}

fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("fittrack")
}

impl Config {
    /// Load configuration from the standard config path, then apply the environment
    pub fn load() -> Result<Self> {
        let config_path = Self::default_config_path();
        let mut config = if config_path.exists() {
            Self::load_from(&config_path)?
        } else {
            tracing::info!(
                "No config file found at {:?}, using defaults",
                config_path
            );
            Self::default()
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        tracing::info!("Loaded config from {:?}", path);
        Ok(config)
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|h| h.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("fittrack")
            .join("config.toml")
    }

    /// Apply `FITTRACK_*` environment overrides
    pub fn apply_env(&mut self) {
        self.apply_env_with(|k| std::env::var(k).ok())
    }

    /// Testable helper that reads override values through `get`, so tests
    /// never have to mutate the process environment.
    pub fn apply_env_with<F>(&mut self, mut get: F)
    where
        F: FnMut(&str) -> Option<String>,
    {
        if let Some(url) = get("FITTRACK_BASE_URL").filter(|v| !v.trim().is_empty()) {
            self.remote.base_url = url;
        }
        if let Some(token) = get("FITTRACK_TOKEN").filter(|v| !v.trim().is_empty()) {
            self.remote.token = Some(token);
        }
    }

    /// Save the current configuration to a specific path
    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure parent directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let contents = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(path, contents)?;
        tracing::info!("Saved config to {:?}", path);
        Ok(())
    }
}
