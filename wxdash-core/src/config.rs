use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{fmt, fs, path::PathBuf, time::Duration};

pub const DEFAULT_BASE_URL: &str = "https://api.openweathermap.org/data/2.5";

/// Environment variable that overrides the API key stored on disk.
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Everything a provider client needs for a request. Read-only once built.
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    pub api_key: String,
    pub base_url: String,
    pub timeout: Option<Duration>,
}

const REDACTED: &str = "<redacted>";

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderSettings {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self { api_key: api_key.into(), base_url: DEFAULT_BASE_URL.to_string(), timeout: None }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Top-level configuration stored on disk.
///
/// Example TOML:
/// ```toml
/// api_key = "..."
/// base_url = "https://api.openweathermap.org/data/2.5"
/// timeout_secs = 10
/// default_cities = ["Pretoria", "Cape Town"]
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub api_key: Option<String>,
    pub base_url: String,
    /// Unset means requests may wait indefinitely.
    pub timeout_secs: Option<u64>,
    /// Cities shown when none are given; empty means the whole registry.
    pub default_cities: Vec<String>,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &self.api_key.as_ref().map(|_| REDACTED))
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("default_cities", &self.default_cities)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: None,
            default_cities: Vec::new(),
        }
    }
}

impl Config {
    /// Load config from disk, or return an empty default if it doesn't exist yet.
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
        Ok(toml::from_str(contents)?)
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
        let dirs = ProjectDirs::from("dev", "wxdash", "wxdash")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    pub fn set_api_key(&mut self, api_key: String) {
        self.api_key = Some(api_key);
    }

    /// Resolve the credential, preferring `OPENWEATHER_API_KEY` over the file.
    pub fn api_key(&self) -> Option<String> {
        let from_env = std::env::var(API_KEY_ENV).ok();
        self.resolve_api_key(from_env)
    }

    fn resolve_api_key(&self, from_env: Option<String>) -> Option<String> {
        from_env
            .filter(|key| !key.trim().is_empty())
            .or_else(|| self.api_key.clone().filter(|key| !key.trim().is_empty()))
    }

    pub fn provider_settings(&self) -> Result<ProviderSettings> {
        let api_key = self.api_key().ok_or_else(|| {
            anyhow!(
                "No OpenWeather API key configured.\n\
                 Hint: run `wxdash configure` or set {API_KEY_ENV}."
            )
        })?;

        let mut settings =
            ProviderSettings::new(api_key).with_base_url(self.base_url.trim_end_matches('/'));
        if let Some(secs) = self.timeout_secs {
            settings = settings.with_timeout(Duration::from_secs(secs));
        }

        Ok(settings)
    }
}
