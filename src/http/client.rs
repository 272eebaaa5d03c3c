//! HTTP transport
//!
//! GET-only JSON client for the API:
//! - API key attached as the `Crossref-Plus-API-Token` header
//! - Optional retries with configurable backoff for 429/5xx and timeouts
//! - Status and body classification into the crate's error kinds

use crate::error::{is_retryable_status, Error, Result};
use crate::request::{QueryString, TransportOptions};
use crate::types::{BackoffType, JsonValue, DEFAULT_BASE_URL};
use reqwest::{Client, Response, StatusCode};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

/// Header carrying the API key
pub const API_KEY_HEADER: &str = "Crossref-Plus-API-Token";

/// Configuration for the HTTP client
#[derive(Clone)]
pub struct HttpClientConfig {
    /// Base URL for all requests
    pub base_url: String,
    /// API key, sent as `Crossref-Plus-API-Token: Bearer <key>`
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
    /// Maximum number of retries
    pub max_retries: u32,
    /// Initial delay for backoff
    pub initial_backoff: Duration,
    /// Maximum delay for backoff
    pub max_backoff: Duration,
    /// Type of backoff strategy
    pub backoff_type: BackoffType,
    /// Default headers for all requests
    pub default_headers: HashMap<String, String>,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: Duration::from_secs(30),
            max_retries: 0,
            initial_backoff: Duration::from_millis(100),
            max_backoff: Duration::from_secs(60),
            backoff_type: BackoffType::Exponential,
            default_headers: HashMap::new(),
            user_agent: format!("crossref-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl fmt::Debug for HttpClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClientConfig")
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("max_retries", &self.max_retries)
            .field("initial_backoff", &self.initial_backoff)
            .field("max_backoff", &self.max_backoff)
            .field("backoff_type", &self.backoff_type)
            .field("default_headers", &self.default_headers)
            .field("user_agent", &self.user_agent)
            .finish()
    }
}

impl HttpClientConfig {
    /// Create a new config builder
    pub fn builder() -> HttpClientConfigBuilder {
        HttpClientConfigBuilder::default()
    }
}

/// Builder for HTTP client config
#[derive(Default)]
pub struct HttpClientConfigBuilder {
    config: HttpClientConfig,
}

impl HttpClientConfigBuilder {
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

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set max retries
    pub fn max_retries(mut self, retries: u32) -> Self {
        self.config.max_retries = retries;
        self
    }

    /// Set backoff configuration
    pub fn backoff(mut self, backoff_type: BackoffType, initial: Duration, max: Duration) -> Self {
        self.config.backoff_type = backoff_type;
        self.config.initial_backoff = initial;
        self.config.max_backoff = max;
        self
    }

    /// Add a default header
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.config.default_headers.insert(key.into(), value.into());
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpClientConfig {
        self.config
    }
}

/// HTTP client with optional retries
pub struct HttpClient {
    client: Client,
    config: HttpClientConfig,
}

impl HttpClient {
    /// Create a new HTTP client with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(HttpClientConfig::default())
    }

    /// Create a new HTTP client with custom configuration
    pub fn with_config(config: HttpClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    /// Get the client configuration
    pub fn config(&self) -> &HttpClientConfig {
        &self.config
    }

    /// Resolve a route path against the base URL and attach the query string
    pub fn build_url(&self, path: &str, query: &QueryString) -> Result<Url> {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');

        let mut url = Url::parse(&format!("{base}/{path}"))?;
        if !query.is_empty() {
            url.set_query(Some(&query.to_string()));
        }
        Ok(url)
    }

    /// Issue a GET and decode the JSON body
    ///
    /// Non-2xx responses become `HttpStatus`, a body that is not JSON becomes
    /// `Decode`. Retries happen only when `max_retries` allows them.
    pub async fn get_json(
        &self,
        path: &str,
        query: &QueryString,
        options: &TransportOptions,
    ) -> Result<JsonValue> {
        let url = self.build_url(path, query)?;
        let response = self.send(&url, options).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| {
            Error::decode(format!("Response from {} is not JSON: {e}", url.path()))
        })
    }

    /// Send a GET with retries, returning the successful response
    async fn send(&self, url: &Url, options: &TransportOptions) -> Result<Response> {
        let max_retries = options.max_retries.unwrap_or(self.config.max_retries);
        let timeout = options.timeout.unwrap_or(self.config.timeout);

        let mut attempt = 0;

        loop {
            let mut req = self.client.get(url.clone()).timeout(timeout);

            // Add default headers
            for (key, value) in &self.config.default_headers {
                req = req.header(key.as_str(), value.as_str());
            }

            // Add request-specific headers
            for (key, value) in &options.headers {
                req = req.header(key.as_str(), value.as_str());
            }

            if let Some(key) = &self.config.api_key {
                req = req.header(API_KEY_HEADER, format!("Bearer {key}"));
            }

            debug!("GET {}", url);

            match req.send().await {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response);
                    }

                    if is_retryable_status(status.as_u16()) && attempt < max_retries {
                        let delay = if status == StatusCode::TOO_MANY_REQUESTS {
                            extract_retry_after(&response)
                                .unwrap_or_else(|| self.calculate_backoff(attempt))
                        } else {
                            self.calculate_backoff(attempt)
                        };
                        warn!(
                            "Request failed with {}, attempt {}/{}, retrying in {:?}",
                            status.as_u16(),
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    let body = response.text().await.unwrap_or_default();
                    return Err(Error::http_status(status.as_u16(), body));
                }
                Err(e) => {
                    let retryable = e.is_timeout() || e.is_connect();
                    if retryable && attempt < max_retries {
                        let delay = self.calculate_backoff(attempt);
                        warn!(
                            "Transport error ({e}), attempt {}/{}, retrying in {:?}",
                            attempt + 1,
                            max_retries + 1,
                            delay
                        );
                        tokio::time::sleep(delay).await;
                        attempt += 1;
                        continue;
                    }

                    if e.is_timeout() {
                        return Err(Error::Timeout {
                            timeout_ms: timeout.as_millis() as u64,
                        });
                    }
                    return Err(Error::Transport(e));
                }
            }
        }
    }

    /// Calculate backoff delay for a given attempt
    pub fn calculate_backoff(&self, attempt: u32) -> Duration {
        let delay = match self.config.backoff_type {
            BackoffType::Constant => self.config.initial_backoff,
            BackoffType::Linear => self.config.initial_backoff * (attempt + 1),
            BackoffType::Exponential => {
                let factor = 2u32.saturating_pow(attempt);
                self.config.initial_backoff * factor
            }
        };

        std::cmp::min(delay, self.config.max_backoff)
    }
}

impl fmt::Debug for HttpClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpClient")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Extract retry-after header value
fn extract_retry_after(response: &Response) -> Option<Duration> {
    response
        .headers()
        .get("retry-after")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.parse().ok())
        .map(Duration::from_secs)
}
