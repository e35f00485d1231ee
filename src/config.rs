use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_TOKEN_ENV: &str = "SAMCHAT_API_TOKEN";
pub const API_URL_ENV: &str = "SAMCHAT_API_URL";

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Endpoint of the orchestration task that answers prompts
    pub api_url: String,

    /// Bearer token; prefer the environment variable below
    pub api_token: Option<String>,

    /// Environment variable holding the bearer token
    pub api_token_env: String,

    /// Upper bound on a single backend call
    pub timeout_secs: u64,

    /// How long an identical prompt + history replays from cache (0 disables)
    pub cache_ttl_secs: u64,

    /// Example category selected when a session starts
    pub default_category: String,

    /// Send the last secondary payload back with each request
    pub send_full_data: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            api_url: String::new(),
            api_token: None,
            api_token_env: DEFAULT_TOKEN_ENV.to_string(),
            timeout_secs: 180,
            cache_ttl_secs: 600,
            default_category: "Brandville".to_string(),
            send_full_data: true,
        }
    }
}

impl Config {
    /// `~/.samchat`
    pub fn home_dir() -> Result<PathBuf> {
        let home = dirs::home_dir().context("Could not find home directory")?;
        Ok(home.join(".samchat"))
    }

    pub fn default_path() -> Result<PathBuf> {
        Ok(Self::home_dir()?.join("config.toml"))
    }

    /// Load configuration from the given file (or the default location) and
    /// apply environment overrides
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p.to_path_buf(),
            None => Self::default_path()?,
        };

        let mut config = Self::load_file(&config_path)?;
        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url;
            }
        }
        Ok(config)
    }

    /// Parse a config file; a missing file yields the defaults
    pub fn load_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Save configuration to file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config file")?;
        Ok(())
    }

    /// Get API token from config or environment
    pub fn get_api_token(&self) -> Option<String> {
        self.api_token
            .clone()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| std::env::var(&self.api_token_env).ok())
            .filter(|t| !t.trim().is_empty())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_secs)
    }

    /// Check that enough is configured to reach the backend
    pub fn validate(&self) -> Result<()> {
        let url = self.api_url.trim();
        if url.is_empty() {
            bail!(
                "No API URL configured. Set api_url in the config file or {}",
                API_URL_ENV
            );
        }
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            bail!("API URL must start with http:// or https://, got '{}'", url);
        }
        if self.get_api_token().is_none() {
            bail!(
                "No API token configured. Set api_token in the config file or {}",
                self.api_token_env
            );
        }
        if self.timeout_secs == 0 {
            bail!("timeout_secs must be greater than zero");
        }
        Ok(())
    }
}
