use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::info;

use crate::constants;
use crate::domain::Pagination;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub general: GeneralConfig,

    pub api: ApiConfig,

    pub pagination: PaginationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// `EnvFilter` directive; `RUST_LOG` takes precedence when set.
    pub log_level: String,

    /// "pretty" or "json"
    pub log_format: String,

    /// Number of tokio worker threads (default: 1)
    /// Set to 0 to use the number of CPU cores
    pub worker_threads: usize,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_level: "warn".to_string(),
            log_format: "pretty".to_string(),
            worker_threads: 1,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Root of the versioned REST API; `/users` is resolved beneath it.
    pub base_url: String,

    pub timeout_seconds: u64,

    pub user_agent: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: constants::api::DEFAULT_BASE_URL.to_string(),
            timeout_seconds: constants::api::DEFAULT_TIMEOUT_SECONDS,
            user_agent: constants::USER_AGENT.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    pub default_skip: u32,

    pub default_limit: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        let page = Pagination::default();
        Self {
            default_skip: page.skip,
            default_limit: page.limit,
        }
    }
}

impl PaginationConfig {
    /// Resolves command-line overrides against the configured defaults.
    #[must_use]
    pub fn resolve(&self, skip: Option<u32>, limit: Option<u32>) -> Pagination {
        Pagination::new(
            skip.unwrap_or(self.default_skip),
            limit.unwrap_or(self.default_limit),
        )
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let paths = Self::config_paths();

        let mut config = paths
            .iter()
            .find(|path| path.exists())
            .map_or_else(
                || Ok(Self::default()),
                |path| {
                    info!("Loading config from: {}", path.display());
                    Self::load_from_path(path)
                },
            )?;

        config.apply_env_overrides(std::env::var(constants::api::BASE_URL_ENV).ok().as_deref());
        Ok(config)
    }

    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Config saved to: {}", path.display());
        Ok(())
    }

    fn apply_env_overrides(&mut self, base_url: Option<&str>) {
        if self.override_base_url(base_url) {
            info!("Using API base URL from {}", constants::api::BASE_URL_ENV);
        }
    }

    /// Replaces the API base URL with `url`, trimmed. Blank values are
    /// ignored. Returns `true` when the value was applied.
    pub fn override_base_url(&mut self, url: Option<&str>) -> bool {
        match url.map(str::trim).filter(|url| !url.is_empty()) {
            Some(url) => {
                self.api.base_url = url.to_string();
                true
            }
            None => false,
        }
    }

    fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![Self::default_config_path()];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("openagri-users").join("config.toml"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".openagri-users").join("config.toml"));
        }

        paths
    }

    fn default_config_path() -> PathBuf {
        PathBuf::from("config.toml")
    }

    /// Writes a default `config.toml` into the working directory.
    /// Returns `false` when one already exists.
    pub fn create_default_if_missing() -> Result<bool> {
        Self::create_default_at(&Self::default_config_path())
    }

    pub fn create_default_at(path: &Path) -> Result<bool> {
        if path.exists() {
            Ok(false)
        } else {
            Self::default().save_to_path(path)?;
            info!("Created default config file: {}", path.display());
            Ok(true)
        }
    }

    pub fn validate(&self) -> Result<()> {
        let base_url = url::Url::parse(&self.api.base_url)
            .with_context(|| format!("Invalid API base URL: {}", self.api.base_url))?;

        // `host:port/path` parses with the host as its scheme
        if !matches!(base_url.scheme(), "http" | "https") {
            anyhow::bail!(
                "API base URL must start with http:// or https://: {}",
                self.api.base_url
            );
        }

        if self.api.timeout_seconds == 0 {
            anyhow::bail!("API timeout must be > 0 seconds");
        }

        Ok(())
    }
}
