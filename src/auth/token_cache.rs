//! Token cache
//!
//! Hands out bearer tokens for the connector's credentials. Private app
//! tokens are returned as-is. OAuth credentials are exchanged at the token
//! endpoint and the result is reused until its adjusted expiry.

use super::types::{CachedToken, Credentials};
use crate::cache::KeyedCache;
use crate::error::{Error, Result};
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

/// Bearer token source for one connector instance
pub struct TokenCache {
    /// Resolved credentials
    credentials: Credentials,
    /// OAuth token endpoint
    token_url: String,
    /// Tokens keyed by credential fingerprint
    tokens: KeyedCache<CachedToken>,
    /// HTTP client for token requests
    http_client: Client,
}

impl TokenCache {
    /// Create a token cache with its own HTTP client
    pub fn new(credentials: Credentials, token_url: impl Into<String>) -> Self {
        Self::with_client(credentials, token_url, Client::new())
    }

    /// Create a token cache with a custom HTTP client
    pub fn with_client(
        credentials: Credentials,
        token_url: impl Into<String>,
        http_client: Client,
    ) -> Self {
        Self {
            credentials,
            token_url: token_url.into(),
            tokens: KeyedCache::new(),
            http_client,
        }
    }

    /// Get a valid bearer token, exchanging credentials if necessary
    pub async fn get_token(&self) -> Result<String> {
        let key = self.credentials.fingerprint();

        let cached = match &self.credentials {
            Credentials::PrivateAppToken(token) => {
                self.tokens
                    .get_or_compute(&key, || async { Ok(CachedToken::permanent(token.clone())) })
                    .await?
            }
            Credentials::OAuth {
                client_id,
                client_secret,
                refresh_token,
            } => {
                self.tokens
                    .get_or_refresh(
                        &key,
                        |token| token.is_valid_at(Utc::now()),
                        || self.exchange(client_id, client_secret, refresh_token),
                    )
                    .await?
            }
        };

        Ok(cached.token)
    }

    /// Exchange the refresh token for a new access token
    async fn exchange(
        &self,
        client_id: &str,
        client_secret: &str,
        refresh_token: &str,
    ) -> Result<CachedToken> {
        debug!("Exchanging refresh token at {}", self.token_url);

        let form = [
            ("grant_type", "refresh_token"),
            ("client_id", client_id),
            ("client_secret", client_secret),
            ("refresh_token", refresh_token),
        ];

        let response = self
            .http_client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(Error::Http)?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::token_refresh(format!(
                "Refresh token request failed with status {status}: {body}"
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| Error::token_refresh(format!("Malformed token response: {e}")))?;

        info!(
            "Obtained OAuth access token (expires in {}s)",
            token_response.expires_in
        );
        Ok(CachedToken::from_exchange(
            token_response.access_token,
            token_response.expires_in,
        ))
    }

    /// The credentials this cache serves
    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// The token currently cached, without refreshing
    pub fn cached(&self) -> Option<CachedToken> {
        self.tokens.peek(&self.credentials.fingerprint())
    }
}

impl std::fmt::Debug for TokenCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCache")
            .field("credentials", &self.credentials)
            .field("token_url", &self.token_url)
            .finish_non_exhaustive()
    }
}

/// OAuth token response
#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: i64,
    #[serde(default)]
    #[allow(dead_code)]
    token_type: Option<String>,
}
