//! Runtime configuration.
//!
//! Configuration comes from three layers, later layers winning:
//!
//! 1. Built-in defaults (public provider base URLs, 15 s timeout, 10 per page)
//! 2. An optional YAML file passed with `--config` / `NEWSHUB_CONFIG`
//! 3. Command-line flags and their environment variables (API keys, data dir)
//!
//! # Example File
//!
//! ```yaml
//! timeout_ms: 10000
//! page_size: 20
//! guardian:
//!   api_key: "..."
//! nyt:
//!   base_url: "https://api.nytimes.com/svc/search/v2"
//! ```

use crate::error::ConfigError;
use crate::models::{DEFAULT_PAGE_SIZE, Source};
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, instrument};

pub const GUARDIAN_BASE_URL: &str = "https://content.guardianapis.com";
pub const NYT_BASE_URL: &str = "https://api.nytimes.com/svc/search/v2";
pub const NEWSAPI_BASE_URL: &str = "https://newsapi.org/v2";
pub const GNEWS_BASE_URL: &str = "https://gnews.io/api/v4";

/// Endpoint and credentials for one provider.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

impl ProviderConfig {
    /// Provider at `base_url`, without a key.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            api_key: None,
        }
    }

    /// Attach an API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The configured key, ignoring blank values.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Base URL without a trailing slash, ready for `format!("{base}/path")`.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self::new(String::new())
    }
}

// Keys stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key().map(|_| "<redacted>"))
            .finish()
    }
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub guardian: ProviderConfig,
    pub nyt: ProviderConfig,
    pub newsapi: ProviderConfig,
    pub gnews: ProviderConfig,
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Page size used when a search does not ask for one.
    pub page_size: u32,
    /// Directory holding the persisted preferences.
    pub data_dir: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            guardian: ProviderConfig::new(GUARDIAN_BASE_URL),
            nyt: ProviderConfig::new(NYT_BASE_URL),
            newsapi: ProviderConfig::new(NEWSAPI_BASE_URL),
            gnews: ProviderConfig::new(GNEWS_BASE_URL),
            timeout_ms: crate::api::DEFAULT_TIMEOUT.as_millis() as u64,
            page_size: DEFAULT_PAGE_SIZE,
            data_dir: None,
        }
    }
}

impl AppConfig {
    /// Load a YAML file on top of the defaults.
    ///
    /// Providers missing from the file, or given without a `base_url`, keep
    /// their default endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, or
    /// [`ConfigError::Parse`] if it is not valid configuration YAML.
    #[instrument(level = "info", skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_yaml(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded configuration file");
        debug!(?config, "Effective configuration");
        Ok(config)
    }

    /// Parse YAML configuration text on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns the `serde_yaml` error when `raw` is not valid YAML or a field has
    /// the wrong type.
    pub fn from_yaml(raw: &str) -> Result<Self, serde_yaml::Error> {
        let mut config: Self = serde_yaml::from_str(raw)?;
        let defaults = Self::default();
        for source in Source::ALL {
            if config.provider(source).base_url.trim().is_empty() {
                config.provider_mut(source).base_url = defaults.provider(source).base_url.clone();
            }
        }
        Ok(config)
    }

    /// Settings for `source`.
    pub fn provider(&self, source: Source) -> &ProviderConfig {
        match source {
            Source::Guardian => &self.guardian,
            Source::NewYorkTimes => &self.nyt,
            Source::NewsApi => &self.newsapi,
            Source::GNews => &self.gnews,
        }
    }

    pub fn provider_mut(&mut self, source: Source) -> &mut ProviderConfig {
        match source {
            Source::Guardian => &mut self.guardian,
            Source::NewYorkTimes => &mut self.nyt,
            Source::NewsApi => &mut self.newsapi,
            Source::GNews => &mut self.gnews,
        }
    }

    /// Replace a provider key when an override is present.
    pub fn override_api_key(&mut self, source: Source, api_key: Option<String>) {
        if let Some(key) = api_key.filter(|k| !k.trim().is_empty()) {
            self.provider_mut(source).api_key = Some(key);
        }
    }

    /// Per-request timeout; never zero.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms.max(1))
    }
}
