//! Connection configuration
//!
//! The settings a connector instance is created from. Credentials may be
//! left empty here and supplied through `HUBSPOT_*` environment variables
//! instead; see [`crate::auth::Credentials::resolve`].

use crate::error::{Error, Result};
use crate::http::{HttpClientConfig, RateLimiterConfig};
use crate::pagination::MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use url::Url;

/// Default HubSpot API root
pub const DEFAULT_BASE_URL: &str = "https://api.hubapi.com";

/// Path of the OAuth token endpoint, relative to the base URL
pub const TOKEN_PATH: &str = "/oauth/v1/token";

// ============================================================================
// Connection Config
// ============================================================================

/// Configuration for one connector instance
#[derive(Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    /// Private app access token
    #[serde(default)]
    pub private_app_token: Option<String>,

    /// OAuth app client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth app client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// OAuth refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// API root URL
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Token endpoint override (defaults to `{base_url}/oauth/v1/token`)
    #[serde(default)]
    pub token_url: Option<String>,

    /// Per-request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Records requested per page (at most 100)
    #[serde(default = "default_page_size")]
    pub page_size: u32,

    /// Client-side request throttle
    #[serde(default)]
    pub rate_limit: RateLimiterConfig,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_page_size() -> u32 {
    MAX_PAGE_SIZE
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            private_app_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            base_url: default_base_url(),
            token_url: None,
            timeout_secs: default_timeout_secs(),
            page_size: default_page_size(),
            rate_limit: RateLimiterConfig::default(),
        }
    }
}

impl ConnectionConfig {
    /// Config using a private app token
    pub fn with_private_app_token(token: impl Into<String>) -> Self {
        Self {
            private_app_token: Some(token.into()),
            ..Self::default()
        }
    }

    /// Config using an OAuth refresh token
    pub fn with_oauth(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            client_id: Some(client_id.into()),
            client_secret: Some(client_secret.into()),
            refresh_token: Some(refresh_token.into()),
            ..Self::default()
        }
    }

    /// Point the config at a different API root
    #[must_use]
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Load config from a YAML or JSON file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.display().to_string(),
            });
        }
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Parse config from YAML or JSON text
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self> {
        // YAML is a superset of JSON, so one parser covers both
        let config: Self = serde_yaml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Build config from an inline JSON value
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        let config: Self = serde_json::from_value(value)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values (credentials are checked at resolve time)
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.base_url)
            .map_err(|e| Error::invalid_value("base_url", e.to_string()))?;

        if let Some(token_url) = &self.token_url {
            Url::parse(token_url).map_err(|e| Error::invalid_value("token_url", e.to_string()))?;
        }

        if self.page_size == 0 || self.page_size > MAX_PAGE_SIZE {
            return Err(Error::invalid_value(
                "page_size",
                format!("must be between 1 and {MAX_PAGE_SIZE}"),
            ));
        }

        if self.timeout_secs == 0 {
            return Err(Error::invalid_value("timeout_secs", "must be positive"));
        }

        Ok(())
    }

    /// Resolved token endpoint URL
    pub fn token_url(&self) -> String {
        self.token_url.clone().unwrap_or_else(|| {
            format!("{}{}", self.base_url.trim_end_matches('/'), TOKEN_PATH)
        })
    }

    /// Per-request timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// HTTP client settings derived from this config
    pub fn http_client_config(&self) -> HttpClientConfig {
        HttpClientConfig::builder()
            .base_url(&self.base_url)
            .timeout(self.timeout())
            .rate_limit(self.rate_limit.clone())
            .build()
    }
}

impl std::fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(value: &Option<String>) -> &'static str {
            if value.is_some() {
                "<set>"
            } else {
                "<unset>"
            }
        }

        f.debug_struct("ConnectionConfig")
            .field("private_app_token", &redact(&self.private_app_token))
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("refresh_token", &redact(&self.refresh_token))
            .field("base_url", &self.base_url)
            .field("token_url", &self.token_url)
            .field("timeout_secs", &self.timeout_secs)
            .field("page_size", &self.page_size)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}
