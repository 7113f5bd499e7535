use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use crate::model::Units;

/// Environment variable holding the OpenWeather API key.
pub const API_KEY_ENV: &str = "OpenWeather_API_KEY";

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// units = "metric"
/// timeout_secs = 10
/// strict_status = false
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Units>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Treat non-2xx responses as errors instead of returning their body.
    pub strict_status: bool,

    /// Endpoint override, mostly useful against a local mock.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl Config {
    /// Load config from the platform location, or an empty default if it doesn't exist yet.
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_file_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            // First run: no config file, return empty.
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg: Config = toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        if cfg.timeout_secs == Some(0) {
            return Err(anyhow!(
                "Invalid config file {}: timeout_secs must be at least 1",
                path.display()
            ));
        }

        Ok(cfg)
    }

    /// Save config to the platform location, creating parent directories as needed.
    pub fn save(&self) -> Result<PathBuf> {
        let path = Self::config_file_path()?;
        self.save_to(&path)?;
        Ok(path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-fetch", "weather-fetch")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.as_deref().is_some_and(|k| !k.is_empty())
    }
}

/// Reads the API key from the environment, loading `.env` from the working
/// directory first. Blank values count as absent.
pub fn env_api_key() -> Option<String> {
    match dotenvy::dotenv() {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(err) => tracing::debug!("No .env loaded: {err}"),
    }

    std::env::var(API_KEY_ENV)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// How non-2xx responses are reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusPolicy {
    /// Return the provider's body whatever the status.
    #[default]
    PassThrough,
    /// Fail with [`crate::FetchError::Status`] on any non-2xx status.
    Strict,
}

/// Values given on the command line; each one wins over env and file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub units: Option<Units>,
    pub timeout_secs: Option<u64>,
    pub strict_status: bool,
}

/// Everything a provider needs, resolved once and injected at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub api_key: String,
    pub base_url: String,
    pub units: Units,
    pub timeout: Duration,
    pub status_policy: StatusPolicy,
}

impl Settings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            units: Units::default(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            status_policy: StatusPolicy::default(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_units(mut self, units: Units) -> Self {
        self.units = units;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_status_policy(mut self, policy: StatusPolicy) -> Self {
        self.status_policy = policy;
        self
    }

    /// Merge the sources. Key precedence is overrides, then `env_api_key`, then
    /// the file. With no key anywhere the empty string is used and the provider
    /// will reject the request.
    pub fn resolve(config: &Config, env_api_key: Option<String>, overrides: Overrides) -> Self {
        let api_key = overrides
            .api_key
            .or(env_api_key)
            .or_else(|| config.api_key.clone())
            .unwrap_or_default();

        if api_key.is_empty() {
            tracing::warn!(
                "No API key found (set {API_KEY_ENV}, pass --api-key, or run `weather configure`); \
                 the request will be sent without one"
            );
        }

        let strict = overrides.strict_status || config.strict_status;

        Settings::new(api_key)
            .with_base_url(
                config
                    .base_url
                    .clone()
                    .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            )
            .with_units(overrides.units.or(config.units).unwrap_or_default())
            .with_timeout(Duration::from_secs(resolve_timeout_secs(
                overrides.timeout_secs,
                config.timeout_secs,
            )))
            .with_status_policy(if strict {
                StatusPolicy::Strict
            } else {
                StatusPolicy::PassThrough
            })
    }
}

/// A zero timeout would fail every request, so it counts as unset.
fn resolve_timeout_secs(flag: Option<u64>, file: Option<u64>) -> u64 {
    [flag, file]
        .into_iter()
        .flatten()
        .find(|&secs| {
            if secs == 0 {
                tracing::warn!("Ignoring a timeout of 0s");
            }
            secs > 0
        })
        .unwrap_or(DEFAULT_TIMEOUT_SECS)
}
