use std::time::Duration;

use crate::shared::config::{env_parse, normalize_base_url, ConfigError};

/// Default API base, including the `/api` prefix.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Default bound on session bootstrap.
pub const DEFAULT_BOOTSTRAP_TIMEOUT: Duration = Duration::from_millis(1500);

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Client configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without trailing slash, e.g. `http://localhost:5000/api`
    pub api_base_url: String,
    pub bootstrap_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_URL.to_string(),
            bootstrap_timeout: DEFAULT_BOOTSTRAP_TIMEOUT,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }
}

impl ClientConfig {
    pub fn builder() -> ClientConfigBuilder {
        ClientConfigBuilder::default()
    }

    /// Read `CLIENT_API_URL` and `CLIENT_BOOTSTRAP_TIMEOUT_MS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut builder = Self::builder();
        if let Ok(url) = std::env::var("CLIENT_API_URL") {
            builder = builder.api_base_url(url);
        }
        let timeout_ms = env_parse(
            "CLIENT_BOOTSTRAP_TIMEOUT_MS",
            DEFAULT_BOOTSTRAP_TIMEOUT.as_millis() as u64,
        )?;
        builder.bootstrap_timeout(Duration::from_millis(timeout_ms)).build()
    }

    /// Full URL for a path relative to the API base.
    pub fn url(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.api_base_url, path)
        } else {
            format!("{}/{}", self.api_base_url, path)
        }
    }
}

/// Builder for [`ClientConfig`]
#[derive(Debug, Default)]
pub struct ClientConfigBuilder {
    api_base_url: Option<String>,
    bootstrap_timeout: Option<Duration>,
    request_timeout: Option<Duration>,
}

impl ClientConfigBuilder {
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    pub fn bootstrap_timeout(mut self, timeout: Duration) -> Self {
        self.bootstrap_timeout = Some(timeout);
        self
    }

    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ClientConfig, ConfigError> {
        let api_base_url = normalize_base_url(self.api_base_url.as_deref().unwrap_or(DEFAULT_API_URL))?;

        let bootstrap_timeout = self.bootstrap_timeout.unwrap_or(DEFAULT_BOOTSTRAP_TIMEOUT);
        if bootstrap_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                key: "bootstrap_timeout",
                value: "0".to_string(),
            });
        }

        Ok(ClientConfig {
            api_base_url,
            bootstrap_timeout,
            request_timeout: self.request_timeout.unwrap_or(DEFAULT_REQUEST_TIMEOUT),
        })
    }
}
