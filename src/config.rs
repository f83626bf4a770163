//! Configuration management module.

use chrono_tz::Tz;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration load result.
#[derive(Debug)]
pub enum ConfigLoadResult {
    /// Config loaded successfully.
    Loaded(AppConfig),
    /// Config file missing (first run).
    Missing,
    /// Config file exists but invalid.
    Invalid(ConfigError),
}

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation failed: {0}")]
    Validation(String),
}

/// Main application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub schedule: ScheduleConfig,
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Booking API connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    /// Request timeout in seconds (default: 30).
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Staff break settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// IANA zone used for submitted break times and day of week.
    pub time_zone: String,
    /// Name recorded on every break.
    #[serde(default = "default_break_name")]
    pub break_name: String,
}

fn default_break_name() -> String {
    "lunch".to_string()
}

/// Checkout wizard settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    pub currency_symbol: String,
    /// Items requested per catalog page.
    pub page_size: u32,
    pub sort: String,
    /// Accepted payment methods. The first one is preselected.
    pub payment_methods: Vec<String>,
}

/// Log output settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Write a daily rolling log file here in addition to stderr.
    pub directory: Option<PathBuf>,
}

impl AppConfig {
    /// Get config file path from the platform config directory.
    pub fn default_path() -> PathBuf {
        ProjectDirs::from("com", "Gianged", "salon-desk")
            .map(|dirs| dirs.config_dir().to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."))
            .join("config.toml")
    }

    /// Attempt to load config with detailed result.
    pub fn try_load(path: &Path) -> ConfigLoadResult {
        if !path.exists() {
            return ConfigLoadResult::Missing;
        }

        match std::fs::read_to_string(path) {
            Ok(content) => match toml::from_str::<AppConfig>(&content) {
                Ok(config) => match config.validate() {
                    Ok(()) => ConfigLoadResult::Loaded(config),
                    Err(e) => ConfigLoadResult::Invalid(e),
                },
                Err(e) => ConfigLoadResult::Invalid(ConfigError::Parse(e)),
            },
            Err(e) => ConfigLoadResult::Invalid(ConfigError::Read(e)),
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.api.base_url.starts_with("http") {
            return Err(ConfigError::Validation(
                "API URL must start with http:// or https://".to_string(),
            ));
        }
        if self.api.timeout_secs < 1 {
            return Err(ConfigError::Validation(
                "API timeout must be at least 1 second".to_string(),
            ));
        }
        if self.schedule.time_zone.parse::<Tz>().is_err() {
            return Err(ConfigError::Validation(format!(
                "Unknown time zone: {}",
                self.schedule.time_zone
            )));
        }
        if self.schedule.break_name.trim().is_empty() {
            return Err(ConfigError::Validation("Break name cannot be empty".to_string()));
        }
        if self.checkout.page_size < 1 {
            return Err(ConfigError::Validation("Page size must be at least 1".to_string()));
        }
        if self.checkout.page_size > 500 {
            return Err(ConfigError::Validation("Page size cannot exceed 500".to_string()));
        }
        if self.checkout.payment_methods.iter().any(|m| m.trim().is_empty()) {
            return Err(ConfigError::Validation(
                "Payment methods cannot be empty strings".to_string(),
            ));
        }
        Ok(())
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl ScheduleConfig {
    /// Resolve the configured zone.
    ///
    /// Falls back to UTC only if called on an unvalidated config.
    pub fn tz(&self) -> Tz {
        self.time_zone.parse().unwrap_or(Tz::UTC)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:4000/api".to_string(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            time_zone: "America/Edmonton".to_string(),
            break_name: default_break_name(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            currency_symbol: "$".to_string(),
            page_size: 100,
            sort: "name_asc".to_string(),
            payment_methods: vec!["cash".to_string(), "card".to_string()],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_zone_resolves() {
        let config = AppConfig::default();
        assert_eq!(config.schedule.tz(), chrono_tz::America::Edmonton);
    }

    #[test]
    fn test_validation_invalid_api_url() {
        let mut config = AppConfig::default();
        config.api.base_url = "ftp://invalid".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_unknown_zone() {
        let mut config = AppConfig::default();
        config.schedule.time_zone = "Mars/Olympus".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_page_size_bounds() {
        let mut config = AppConfig::default();

        config.checkout.page_size = 0;
        assert!(config.validate().is_err());

        config.checkout.page_size = 501;
        assert!(config.validate().is_err());

        config.checkout.page_size = 100;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_minimal_toml() {
        let content = r#"
            [api]
            base_url = "https://salon.example.com/api"

            [schedule]
            time_zone = "America/Toronto"

            [checkout]
            currency_symbol = "$"
            page_size = 50
            sort = "name_asc"
            payment_methods = ["card"]
        "#;
        let config: AppConfig = toml::from_str(content).unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.schedule.break_name, "lunch");
        assert!(config.logging.directory.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_missing_file() {
        let path = std::env::temp_dir().join("salon-desk-missing-config-test.toml");
        assert!(matches!(AppConfig::try_load(&path), ConfigLoadResult::Missing));
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir()
            .join(format!("salon-desk-config-{}", std::process::id()))
            .join("config.toml");
        let mut config = AppConfig::default();
        config.checkout.page_size = 25;
        config.save(&path).unwrap();

        match AppConfig::try_load(&path) {
            ConfigLoadResult::Loaded(loaded) => assert_eq!(loaded.checkout.page_size, 25),
            other => panic!("unexpected load result: {other:?}"),
        }
        let _ = std::fs::remove_file(&path);
    }
}
