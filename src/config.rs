//! Service configuration loading and validation.
//!
//! Configuration is loaded from an optional TOML file, then selected values
//! are overridden from the environment (a `.env` file is honoured).
//! Every section has defaults, so an empty file is a valid configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::logging::LoggingConfig;

/// Environment variable naming the configuration file.
pub const ENV_CONFIG_PATH: &str = "SCHUSS_CONFIG";
/// Environment variable naming the resort catalog file.
pub const ENV_CATALOG_PATH: &str = "SCHUSS_CATALOG";
/// Environment variable overriding the log level.
pub const ENV_LOG_LEVEL: &str = "SCHUSS_LOG_LEVEL";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServiceConfig {
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub batch: BatchConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Resort catalog file; the built-in catalog is used when unset.
    #[serde(default)]
    pub catalog_path: Option<PathBuf>,
}

/// Upstream endpoints.
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    /// MeteoSwiss current-measurements CSV.
    #[serde(default = "default_meteoswiss_url")]
    pub meteoswiss_url: String,
    /// SLF measurement API base; the station path is appended.
    #[serde(default = "default_slf_url")]
    pub slf_url: String,
    /// Open-Meteo forecast endpoint.
    #[serde(default = "default_open_meteo_url")]
    pub open_meteo_url: String,
    /// SLF latest-bulletins endpoint.
    #[serde(default = "default_bulletin_url")]
    pub bulletin_url: String,
    /// Optional per-request timeout. Unset means the HTTP client default.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

fn default_meteoswiss_url() -> String {
    "https://data.geo.admin.ch/ch.meteoschweiz.messwerte-aktuell/VQHA80.csv".into()
}

fn default_slf_url() -> String {
    "https://measurement-api.slf.ch/api/stations".into()
}

fn default_open_meteo_url() -> String {
    "https://api.open-meteo.com/v1/forecast".into()
}

fn default_bulletin_url() -> String {
    "https://www.slf.ch/avalanche/bulletin/api/bulletins/latest".into()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            meteoswiss_url: default_meteoswiss_url(),
            slf_url: default_slf_url(),
            open_meteo_url: default_open_meteo_url(),
            bulletin_url: default_bulletin_url(),
            request_timeout_secs: None,
        }
    }
}

/// Batch cycle scheduling.
#[derive(Debug, Clone, Deserialize)]
pub struct BatchConfig {
    /// Resorts processed concurrently in one group.
    #[serde(default = "default_group_size")]
    pub group_size: usize,
    /// Pause between consecutive groups, in milliseconds.
    #[serde(default = "default_group_delay_ms")]
    pub group_delay_ms: u64,
}

fn default_group_size() -> usize {
    5
}

fn default_group_delay_ms() -> u64 {
    500
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            group_size: default_group_size(),
            group_delay_ms: default_group_delay_ms(),
        }
    }
}

impl BatchConfig {
    pub fn group_delay(&self) -> Duration {
        Duration::from_millis(self.group_delay_ms)
    }
}

impl ServiceConfig {
    /// Parses configuration text and validates it. Environment overrides
    /// are not applied here.
    pub fn parse(text: &str) -> Result<Self, ConfigError> {
        let config: ServiceConfig = toml::from_str(text).map_err(ConfigError::Parse)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse(&text)
    }

    /// Loads `.env`, then the file named by `SCHUSS_CONFIG` (defaults if
    /// unset), then applies environment overrides.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();

        let mut config = match std::env::var(ENV_CONFIG_PATH) {
            Ok(path) => Self::load(path)?,
            Err(_) => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Applies overrides from a key lookup. Split out from `from_env` so
    /// tests do not have to mutate the process environment.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(path) = lookup(ENV_CATALOG_PATH) {
            self.catalog_path = Some(PathBuf::from(path));
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.logging.level = level;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch.group_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: "batch.group_size",
                reason: "must be at least 1".into(),
            });
        }
        let urls = [
            ("sources.meteoswiss_url", &self.sources.meteoswiss_url),
            ("sources.slf_url", &self.sources.slf_url),
            ("sources.open_meteo_url", &self.sources.open_meteo_url),
            ("sources.bulletin_url", &self.sources.bulletin_url),
        ];
        for (field, url) in urls {
            if url.trim().is_empty() {
                return Err(ConfigError::InvalidValue {
                    field,
                    reason: "must not be empty".into(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ServiceConfig::parse("").expect("empty config is valid");
        assert_eq!(config.batch.group_size, 5);
        assert_eq!(config.batch.group_delay(), Duration::from_millis(500));
        assert!(config.sources.meteoswiss_url.ends_with("VQHA80.csv"));
        assert!(config.sources.request_timeout_secs.is_none());
        assert!(config.catalog_path.is_none());
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_sections_keep_remaining_defaults() {
        let config = ServiceConfig::parse(
            r#"
            [batch]
            group_delay_ms = 250

            [sources]
            bulletin_url = "http://localhost:9000/bulletins"
            "#,
        )
        .unwrap();
        assert_eq!(config.batch.group_size, 5);
        assert_eq!(config.batch.group_delay_ms, 250);
        assert_eq!(config.sources.bulletin_url, "http://localhost:9000/bulletins");
        assert_eq!(config.sources.slf_url, default_slf_url());
    }

    #[test]
    fn test_zero_group_size_is_rejected() {
        let result = ServiceConfig::parse("[batch]\ngroup_size = 0\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "batch.group_size", .. })
        ));
    }

    #[test]
    fn test_empty_url_is_rejected() {
        let result = ServiceConfig::parse("[sources]\nslf_url = \"  \"\n");
        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue { field: "sources.slf_url", .. })
        ));
    }

    #[test]
    fn test_load_reads_file_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "catalog_path = \"/etc/schuss/resorts.toml\"").unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\nformat = \"json\"").unwrap();

        let config = ServiceConfig::load(file.path()).expect("config file should load");
        assert_eq!(
            config.catalog_path.as_deref(),
            Some(Path::new("/etc/schuss/resorts.toml"))
        );
        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "json");
    }

    #[test]
    fn test_missing_file_is_read_error() {
        let result = ServiceConfig::load("/nonexistent/schuss.toml");
        assert!(matches!(result, Err(ConfigError::ReadFile(_))));
    }

    #[test]
    fn test_overrides_replace_catalog_and_log_level() {
        let env: HashMap<&str, &str> = [
            (ENV_CATALOG_PATH, "/srv/resorts.toml"),
            (ENV_LOG_LEVEL, "warn"),
        ]
        .into_iter()
        .collect();

        let mut config = ServiceConfig::default();
        config.apply_overrides(|key| env.get(key).map(|v| v.to_string()));
        assert_eq!(config.catalog_path, Some(PathBuf::from("/srv/resorts.toml")));
        assert_eq!(config.logging.level, "warn");
    }
}
