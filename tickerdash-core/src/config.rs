//! Dashboard configuration: a TOML file with defaults for every field.
//!
//! A missing file yields the defaults. A file that exists but fails to parse
//! is an error: silently ignoring a typo in an API key is worse than failing.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::PriceRange;

/// Environment variable that overrides `fred_api_key`.
pub const FRED_API_KEY_ENV: &str = "FRED_API_KEY";

/// Errors from loading configuration or reference data.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse {what}: {message}")]
    Parse { what: String, message: String },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

/// Settings shared by the live providers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    pub timeout_secs: u64,
    pub max_retries: u32,
    pub breaker_cooldown_secs: u64,
    /// Skip the live tier entirely.
    pub offline: bool,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            max_retries: 2,
            breaker_cooldown_secs: 30 * 60,
            offline: false,
        }
    }
}

/// Top-level configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Selectable tickers. Empty means the reference table's list.
    pub tickers: Vec<String>,
    pub default_ticker: String,
    pub default_range: PriceRange,
    pub default_indicator: String,
    pub fred_api_key: Option<String>,
    /// Extra secondary-tier records (news, profiles, macro series).
    pub sample_fixtures: Option<PathBuf>,
    pub worker_threads: usize,
    pub provider: ProviderSettings,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            tickers: Vec::new(),
            default_ticker: "NVDA".to_string(),
            default_range: PriceRange::TenYears,
            default_indicator: "US Inflation".to_string(),
            fred_api_key: None,
            sample_fixtures: None,
            worker_threads: 4,
            provider: ProviderSettings::default(),
        }
    }
}

impl DashboardConfig {
    /// Parse configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            what: "dashboard config".into(),
            message: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path`, falling back to defaults if the file does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => Self::from_toml(&content),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "no config file, using defaults");
                Ok(Self::default())
            }
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// Load from an explicit path or the platform default location, then apply
    /// environment overrides.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(p) => Self::load(p)?,
            None => match default_config_path() {
                Some(p) => Self::load(&p)?,
                None => Self::default(),
            },
        };
        Ok(config.with_env_overrides())
    }

    /// Apply `FRED_API_KEY` if set and non-empty.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(key) = std::env::var(FRED_API_KEY_ENV) {
            if !key.trim().is_empty() {
                self.fred_api_key = Some(key.trim().to_string());
            }
        }
        self
    }

    /// Worker pool size, clamped to 1..=16.
    pub fn worker_threads(&self) -> usize {
        self.worker_threads.clamp(1, 16)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_ticker.trim().is_empty() {
            return Err(ConfigError::Invalid("default_ticker must not be empty".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(ConfigError::Invalid("provider.timeout_secs must be > 0".into()));
        }
        Ok(())
    }
}

/// `<config dir>/tickerdash/config.toml`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("tickerdash").join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_yields_defaults() {
        let config = DashboardConfig::from_toml("").unwrap();
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.default_ticker, "NVDA");
        assert_eq!(config.default_range, PriceRange::TenYears);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let config = DashboardConfig::from_toml(
            r#"
            default_range = "1y"
            worker_threads = 64

            [provider]
            offline = true
            "#,
        )
        .unwrap();
        assert_eq!(config.default_range, PriceRange::OneYear);
        assert!(config.provider.offline);
        assert_eq!(config.provider.max_retries, 2);
        assert_eq!(config.worker_threads(), 16);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let err = DashboardConfig::from_toml("default_range = [").unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn rejects_empty_default_ticker() {
        let err = DashboardConfig::from_toml("default_ticker = \"  \"").unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn missing_file_yields_defaults() {
        let config =
            DashboardConfig::load(Path::new("/nonexistent/tickerdash/config.toml")).unwrap();
        assert_eq!(config, DashboardConfig::default());
    }
}
