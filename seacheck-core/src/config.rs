use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fs, path::PathBuf};

use crate::{classifier::SafetyThresholds, model::Coordinate};

/// Where condition data comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default = "default_forecast_url")]
    pub forecast_url: String,
    #[serde(default = "default_marine_url")]
    pub marine_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            forecast_url: default_forecast_url(),
            marine_url: default_marine_url(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_forecast_url() -> String {
    "https://api.open-meteo.com/v1/forecast".to_string()
}

fn default_marine_url() -> String {
    "https://marine-api.open-meteo.com/v1/marine".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Map center used when the device position is denied or unavailable.
pub fn default_center() -> Coordinate {
    // Arabian Sea off the Konkan coast.
    Coordinate::new_unchecked(15.0, 75.0)
}

fn default_log_level() -> String {
    "warn".to_string()
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// log_level = "info"
/// default_center = { latitude = 15.0, longitude = 75.0 }
///
/// [thresholds]
/// wind_limit_kmh = 37.0
/// wave_limit_m = 2.5
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    #[serde(default = "default_center")]
    pub default_center: Coordinate,

    #[serde(default)]
    pub thresholds: SafetyThresholds,

    #[serde(default)]
    pub provider: ProviderConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            default_center: default_center(),
            thresholds: SafetyThresholds::default(),
            provider: ProviderConfig::default(),
        }
    }
}

impl Config {
    /// Reject settings the classifier or provider cannot work with.
    pub fn validate(&self) -> Result<()> {
        let SafetyThresholds { wind_limit_kmh, wave_limit_m } = self.thresholds;

        if !wind_limit_kmh.is_finite() || wind_limit_kmh <= 0.0 {
            bail!("thresholds.wind_limit_kmh must be a positive number, got {wind_limit_kmh}");
        }
        if !wave_limit_m.is_finite() || wave_limit_m <= 0.0 {
            bail!("thresholds.wave_limit_m must be a positive number, got {wave_limit_m}");
        }
        if self.provider.timeout_secs == 0 {
            bail!("provider.timeout_secs must be at least 1");
        }

        Ok(())
    }

    /// Load config from disk, or return defaults if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "seacheck", "seacheck")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}
