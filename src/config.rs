//! Client configuration
//!
//! Settings for the API client, loadable from YAML and overlayable from the
//! environment.

use crate::error::{Error, Result};
use crate::http::HttpClientConfig;
use crate::types::{BackoffType, DEFAULT_BASE_URL, DEFAULT_CURSOR_MAX};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::time::Duration;

/// Environment variable overriding `base_url`
pub const ENV_BASE_URL: &str = "CROSSREF_BASE_URL";
/// Environment variable overriding `api_key`
pub const ENV_API_KEY: &str = "CROSSREF_API_KEY";
/// Environment variable overriding `mailto`
pub const ENV_MAILTO: &str = "CROSSREF_MAILTO";
/// Environment variable overriding `timeout_secs`
pub const ENV_TIMEOUT_SECS: &str = "CROSSREF_TIMEOUT_SECS";

// ============================================================================
// Client Config
// ============================================================================

/// API client configuration
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// API root
    pub base_url: String,

    /// Static API token
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Contact address added to the User-Agent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mailto: Option<String>,

    /// Base User-Agent
    pub user_agent: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    /// Transport retries of 429/5xx/timeouts
    pub max_retries: u32,

    /// Transport retry delays
    pub backoff: BackoffConfig,

    /// Default cap for cursor walks
    pub cursor_max: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            mailto: None,
            user_agent: default_user_agent(),
            timeout_secs: 30,
            max_retries: 0,
            backoff: BackoffConfig::default(),
            cursor_max: DEFAULT_CURSOR_MAX,
        }
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("mailto", &self.mailto)
            .field("user_agent", &self.user_agent)
            .field("timeout_secs", &self.timeout_secs)
            .field("max_retries", &self.max_retries)
            .field("backoff", &self.backoff)
            .field("cursor_max", &self.cursor_max)
            .finish()
    }
}

fn default_user_agent() -> String {
    format!("crossref-client/{}", env!("CARGO_PKG_VERSION"))
}

impl ClientConfig {
    /// Create a new config builder
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Parse from a YAML document
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from a YAML file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&content)
    }

    /// Defaults overlaid with the environment
    pub fn from_env() -> Result<Self> {
        Self::default().with_env()
    }

    /// Overlay `CROSSREF_*` environment variables
    pub fn with_env(self) -> Result<Self> {
        self.overlay(|name| std::env::var(name).ok())
    }

    /// Overlay values from a variable lookup
    pub(crate) fn overlay(mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        if let Some(url) = lookup(ENV_BASE_URL) {
            self.base_url = url;
        }
        if let Some(key) = lookup(ENV_API_KEY) {
            self.api_key = Some(key);
        }
        if let Some(mailto) = lookup(ENV_MAILTO) {
            self.mailto = Some(mailto);
        }
        if let Some(timeout) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = timeout.trim().parse().map_err(|_| {
                Error::config(format!("{ENV_TIMEOUT_SECS} must be an integer, got '{timeout}'"))
            })?;
        }
        self.validate()?;
        Ok(self)
    }

    /// Check values that would only fail later at request time
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.base_url)
            .map_err(|e| Error::config(format!("Invalid base_url '{}': {e}", self.base_url)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "base_url must be http or https, got '{}'",
                self.base_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(Error::config("timeout_secs must be greater than 0"));
        }
        if let Some(mailto) = &self.mailto {
            if !mailto.contains('@') {
                return Err(Error::config(format!("mailto '{mailto}' is not an address")));
            }
        }
        Ok(())
    }

    /// User-Agent sent with each request
    pub fn effective_user_agent(&self) -> String {
        match &self.mailto {
            Some(mailto) => format!("{} (mailto:{mailto})", self.user_agent),
            None => self.user_agent.clone(),
        }
    }

    /// Transport settings for the HTTP client
    pub fn to_http_config(&self) -> HttpClientConfig {
        let mut builder = HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(Duration::from_secs(self.timeout_secs))
            .max_retries(self.max_retries)
            .backoff(
                self.backoff.backoff_type,
                Duration::from_millis(self.backoff.initial_ms),
                Duration::from_millis(self.backoff.max_ms),
            )
            .user_agent(self.effective_user_agent());
        if let Some(key) = &self.api_key {
            builder = builder.api_key(key);
        }
        builder.build()
    }
}

/// Builder for client config
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

    /// Set the API key
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = Some(key.into());
        self
    }

    /// Set the contact address
    pub fn mailto(mut self, mailto: impl Into<String>) -> Self {
        self.config.mailto = Some(mailto.into());
        self
    }

    /// Set the base User-Agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.config.timeout_secs = secs;
        self
    }

    /// Set max transport retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.config.backoff = backoff;
        self
    }

    /// Set the default cursor cap
    pub fn cursor_max(mut self, max: u64) -> Self {
        self.config.cursor_max = max;
        self
    }

    /// Build the config
    pub fn build(self) -> ClientConfig {
        self.config
    }
}

// ============================================================================
// Backoff
// ============================================================================

/// Backoff configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Type of backoff
    #[serde(rename = "type", default)]
    pub backoff_type: BackoffType,

    /// Initial delay in milliseconds
    #[serde(default = "default_initial_ms")]
    pub initial_ms: u64,

    /// Maximum delay in milliseconds
    #[serde(default = "default_max_ms")]
    pub max_ms: u64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            backoff_type: BackoffType::Exponential,
            initial_ms: default_initial_ms(),
            max_ms: default_max_ms(),
        }
    }
}

fn default_initial_ms() -> u64 {
    100
}

fn default_max_ms() -> u64 {
    60000
}
