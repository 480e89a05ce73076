//! Application configuration.
//!
//! Loaded from ~/.config/trakr/trakr.yml or .trakr.yml

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Global configuration for trakr.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Forecast defaults.
    pub forecast: ForecastConfig,

    /// Date/time input parsing.
    pub time: TimeConfig,

    /// Interactive mode settings.
    pub tui: TuiConfig,

    /// Storage settings.
    pub storage: StorageConfig,
}

impl Config {
    /// Load configuration with fallback chain.
    ///
    /// Search order:
    /// 1. Explicit path if provided
    /// 2. .trakr.yml in current directory
    /// 3. ~/.config/trakr/trakr.yml
    /// 4. Defaults
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // Explicit path takes precedence
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Try project config
        let project_config = PathBuf::from(".trakr.yml");
        if project_config.exists() {
            match Self::load_from_file(&project_config) {
                Ok(config) => {
                    log::info!("Loaded config from .trakr.yml");
                    return Ok(config);
                }
                Err(e) => {
                    log::warn!("Failed to load .trakr.yml: {}", e);
                }
            }
        }

        // Try user config
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("trakr").join("trakr.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => {
                        log::info!("Loaded config from {}", user_config.display());
                        return Ok(config);
                    }
                    Err(e) => {
                        log::warn!("Failed to load {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        // Use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if !self.forecast.default_sigma.is_finite() || self.forecast.default_sigma < 0.0 {
            eyre::bail!("forecast.default-sigma must be >= 0");
        }
        if self.tui.tick_rate_ms == 0 {
            eyre::bail!("tui.tick-rate-ms must be > 0");
        }
        if self.tui.page_size == 0 || self.tui.page_size > 26 {
            eyre::bail!("tui.page-size must be between 1 and 26");
        }
        Ok(())
    }
}

/// Forecast defaults.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Sigma given to newly created trackers.
    #[serde(rename = "default-sigma")]
    pub default_sigma: f64,
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            default_sigma: crate::domain::DEFAULT_SIGMA,
        }
    }
}

/// Date/time input parsing settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeConfig {
    /// Accept 12-hour clock forms like 9:30am.
    pub ampm: bool,

    /// Read slash dates as year-first (2025/06/14).
    pub yearfirst: bool,

    /// Read slash dates as day-first (14/06/2025).
    pub dayfirst: bool,
}

impl Default for TimeConfig {
    fn default() -> Self {
        Self {
            ampm: false,
            yearfirst: true,
            dayfirst: false,
        }
    }
}

/// Interactive mode settings.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct TuiConfig {
    /// Milliseconds between refresh ticks.
    #[serde(rename = "tick-rate-ms")]
    pub tick_rate_ms: u64,

    /// Rows per page, one tag letter (a-z) each.
    #[serde(rename = "page-size")]
    pub page_size: usize,
}

impl Default for TuiConfig {
    fn default() -> Self {
        Self {
            tick_rate_ms: 250,
            page_size: 26,
        }
    }
}

/// Storage settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the tracker database.
    #[serde(rename = "data-dir")]
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let default_dir = dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trakr");

        Self { data_dir: default_dir }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.forecast.default_sigma, 2.0);
        assert_eq!(config.tui.tick_rate_ms, 250);
        assert_eq!(config.tui.page_size, 26);
        assert!(!config.time.ampm);
        assert!(config.time.yearfirst);
        assert!(!config.time.dayfirst);
    }

    #[test]
    fn test_config_validation() {
        let config = Config::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_invalid_sigma() {
        let config = Config {
            forecast: ForecastConfig { default_sigma: -1.0 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_tick_rate() {
        let mut config = Config::default();
        config.tui.tick_rate_ms = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_page_size_bounds() {
        let mut config = Config::default();
        config.tui.page_size = 27;
        assert!(config.validate().is_err());
        config.tui.page_size = 0;
        assert!(config.validate().is_err());
        config.tui.page_size = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
forecast:
  default-sigma: 3.0
time:
  ampm: true
  dayfirst: true
tui:
  tick-rate-ms: 500
"#;
        let config: Config = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.forecast.default_sigma, 3.0);
        assert!(config.time.ampm);
        assert!(config.time.dayfirst);
        assert_eq!(config.tui.tick_rate_ms, 500);
        // Other fields should have defaults
        assert_eq!(config.tui.page_size, 26);
        assert!(config.time.yearfirst);
    }

    #[test]
    fn test_default_data_dir_ends_with_app_name() {
        let config = Config::default();
        assert!(config.storage.data_dir.ends_with("trakr"));
    }
}
