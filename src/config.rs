//! Client configuration: built-in defaults, overridden by an optional JSON file and
//! then by environment variables.

use crate::orchestrator::settings::{PollSettings, DEFAULT_MAX_WAIT, DEFAULT_POLL_INTERVAL};
use crate::service::geocoding::{
    DEFAULT_DEBOUNCE, DEFAULT_GEOCODING_URL, DEFAULT_LANGUAGE, DEFAULT_RESULT_COUNT,
};
use crate::utils::{get_config_file, trim_base_url};
use log::{debug, info};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_API_BASE_URL: &str = "https://python-s-nasa-space-app-production.up.railway.app";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

pub const ENV_API_URL: &str = "CRONOWEATH_API_URL";
pub const ENV_MAX_WAIT_MS: &str = "CRONOWEATH_MAX_WAIT_MS";
pub const ENV_GEOCODING_URL: &str = "CRONOWEATH_GEOCODING_URL";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to determine configuration directory")]
    ConfigDirResolution,

    #[error("Failed to read configuration file '{0}'")]
    Read(PathBuf, #[source] std::io::Error),

    #[error("Failed to decode configuration file '{0}'")]
    Decode(PathBuf, #[source] serde_json::Error),

    #[error("Invalid URL for {field}: '{value}' ({reason})")]
    InvalidUrl {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Invalid value for {0}: '{1}'")]
    InvalidNumber(&'static str, String, #[source] std::num::ParseIntError),

    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),
}

mod millis {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Endpoints and timings of the client.
///
/// In the configuration file durations are written in milliseconds, e.g.
///
/// ```json
/// { "api_base_url": "http://localhost:8000", "max_wait_ms": 120000 }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub geocoding_url: String,
    #[serde(rename = "poll_interval_ms", with = "millis")]
    pub poll_interval: Duration,
    #[serde(rename = "max_wait_ms", with = "millis")]
    pub max_wait: Duration,
    #[serde(rename = "request_timeout_ms", with = "millis")]
    pub request_timeout: Duration,
    #[serde(rename = "geocode_debounce_ms", with = "millis")]
    pub geocode_debounce: Duration,
    pub geocode_count: u32,
    pub language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            geocoding_url: DEFAULT_GEOCODING_URL.to_string(),
            poll_interval: DEFAULT_POLL_INTERVAL,
            max_wait: DEFAULT_MAX_WAIT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            geocode_debounce: DEFAULT_DEBOUNCE,
            geocode_count: DEFAULT_RESULT_COUNT,
            language: DEFAULT_LANGUAGE.to_string(),
        }
    }
}

fn validate_url(field: &'static str, value: &str) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidUrl {
        field,
        value: value.to_string(),
        reason,
    };
    let url = Url::parse(value).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(invalid(format!("unsupported scheme {other}"))),
    }
}

impl ClientConfig {
    /// `<config dir>/cronoweath/config.json`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        get_config_file().ok_or(ConfigError::ConfigDirResolution)
    }

    /// Reads a configuration file. Absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes =
            std::fs::read(path).map_err(|e| ConfigError::Read(path.to_path_buf(), e))?;
        serde_json::from_slice(&bytes).map_err(|e| ConfigError::Decode(path.to_path_buf(), e))
    }

    /// Defaults, then `path` if given or the default file if it exists, then the
    /// process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match get_config_file().filter(|path| path.is_file()) {
                Some(path) => {
                    info!("Loading configuration from {}", path.display());
                    Self::from_file(&path)?
                }
                None => {
                    debug!("No configuration file, using defaults");
                    Self::default()
                }
            },
        };
        config
            .with_env(|name| std::env::var(name).ok())?
            .validated()
    }

    /// Applies the `CRONOWEATH_*` overrides found by `lookup`.
    pub fn with_env(
        mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(url) = lookup(ENV_API_URL).filter(|url| !url.trim().is_empty()) {
            self.api_base_url = url;
        }
        if let Some(url) = lookup(ENV_GEOCODING_URL).filter(|url| !url.trim().is_empty()) {
            self.geocoding_url = url;
        }
        if let Some(raw) = lookup(ENV_MAX_WAIT_MS) {
            let millis = raw
                .trim()
                .parse::<u64>()
                .map_err(|e| ConfigError::InvalidNumber(ENV_MAX_WAIT_MS, raw.clone(), e))?;
            self.max_wait = Duration::from_millis(millis);
        }
        Ok(self)
    }

    /// Normalizes the base URLs and rejects unusable values.
    pub fn validated(mut self) -> Result<Self, ConfigError> {
        self.api_base_url = trim_base_url(&self.api_base_url);
        self.geocoding_url = self.geocoding_url.trim().to_string();
        validate_url("api_base_url", &self.api_base_url)?;
        validate_url("geocoding_url", &self.geocoding_url)?;
        for (name, value) in [
            ("poll_interval_ms", self.poll_interval),
            ("max_wait_ms", self.max_wait),
            ("request_timeout_ms", self.request_timeout),
        ] {
            if value.is_zero() {
                return Err(ConfigError::ZeroDuration(name));
            }
        }
        Ok(self)
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings::new(self.poll_interval, self.max_wait)
    }
}
