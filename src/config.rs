//! Client configuration
//!
//! A [`ClientConfig`] is built once at startup (from code, YAML, or the
//! environment) and handed to [`Connection`](crate::http::Connection). There is
//! no hidden global configuration; the process-wide default client in
//! [`crate::default_client`] is built from `ClientConfig::default().apply_env()`.

use crate::error::{Error, Result};
use crate::http::RateLimiterConfig;
use crate::types::ApiVersion;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default API root
pub const DEFAULT_BASE_URL: &str = "https://api.twitch.tv/kraken/";

/// Largest page the server hands out
pub const DEFAULT_MAX_PAGE_SIZE: u32 = 100;

/// Environment variable overriding the client id
pub const ENV_CLIENT_ID: &str = "TWITCH_CLIENT_ID";

/// Environment variable overriding the base URL
pub const ENV_BASE_URL: &str = "TWITCH_API_BASE_URL";

// ============================================================================
// Client Config
// ============================================================================

/// Configuration for a client instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    /// API root every request path is resolved against
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Value of the `Client-ID` header
    #[serde(default = "default_client_id")]
    pub client_id: String,

    /// API version (selects the `Accept` media type)
    #[serde(default)]
    pub api_version: ApiVersion,

    /// Server-side cap on items per page
    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,

    /// Maximum pages fetched by one paginate call (`None` = unbounded)
    #[serde(default = "default_max_pages")]
    pub max_pages: Option<u32>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Rate limiting (`None` disables it)
    #[serde(default = "default_rate_limit")]
    pub rate_limit: Option<RateLimiterConfig>,

    /// User agent string
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// Extra headers sent with every request
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

/// Unique-enough client id for callers that never set one
fn default_client_id() -> String {
    let nanos = chrono::Utc::now().timestamp_subsec_nanos();
    format!("twitch-rest-{}-{nanos:09}", std::process::id())
}

fn default_max_page_size() -> u32 {
    DEFAULT_MAX_PAGE_SIZE
}

#[allow(clippy::unnecessary_wraps)]
fn default_max_pages() -> Option<u32> {
    Some(1000)
}

fn default_timeout_secs() -> u64 {
    30
}

#[allow(clippy::unnecessary_wraps)]
fn default_rate_limit() -> Option<RateLimiterConfig> {
    Some(RateLimiterConfig::default())
}

fn default_user_agent() -> String {
    format!("twitch-rest/{}", env!("CARGO_PKG_VERSION"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_id: default_client_id(),
            api_version: ApiVersion::default(),
            max_page_size: default_max_page_size(),
            max_pages: default_max_pages(),
            timeout_secs: default_timeout_secs(),
            rate_limit: default_rate_limit(),
            user_agent: default_user_agent(),
            headers: BTreeMap::new(),
        }
    }
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse a config from YAML
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a YAML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let yaml = std::fs::read_to_string(path.as_ref())?;
        Self::from_yaml_str(&yaml)
    }

    /// Override fields from `TWITCH_CLIENT_ID` and `TWITCH_API_BASE_URL`
    #[must_use]
    pub fn apply_env(mut self) -> Self {
        if let Ok(id) = std::env::var(ENV_CLIENT_ID) {
            if !id.is_empty() {
                self.client_id = id;
            }
        }
        if let Ok(url) = std::env::var(ENV_BASE_URL) {
            if !url.is_empty() {
                self.base_url = url;
            }
        }
        self
    }

    /// Check the config for values no request could succeed with
    pub fn validate(&self) -> Result<()> {
        if self.client_id.is_empty() {
            return Err(Error::config("client_id must not be empty"));
        }
        Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("base_url '{}': {e}", self.base_url)))?;
        if self.max_page_size == 0 {
            return Err(Error::config("max_page_size must be at least 1"));
        }
        if self.max_pages == Some(0) {
            return Err(Error::config("max_pages must be at least 1"));
        }
        Ok(())
    }

    /// Request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for [`ClientConfig`]
#[derive(Default)]
pub struct ClientConfigBuilder {
    config: ClientConfig,
}

impl ClientConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the client id
    pub fn client_id(mut self, id: impl Into<String>) -> Self {
        self.config.client_id = id.into();
        self
    }

    /// Set the API version
    pub fn api_version(mut self, version: ApiVersion) -> Self {
        self.config.api_version = version;
        self
    }

    /// Set the per-page cap
    pub fn max_page_size(mut self, size: u32) -> Self {
        self.config.max_page_size = size;
        self
    }

    /// Set the page cap per paginate call
    pub fn max_pages(mut self, pages: Option<u32>) -> Self {
        self.config.max_pages = pages;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout_secs = timeout.as_secs();
        self
    }

    /// Set rate limiter
    pub fn rate_limit(mut self, config: RateLimiterConfig) -> Self {
        self.config.rate_limit = Some(config);
        self
    }

    /// Disable rate limiting
    pub fn no_rate_limit(mut self) -> Self {
        self.config.rate_limit = None;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}
