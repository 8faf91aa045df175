//! Auth types
//!
//! Resolved credentials and the cached token shape.

use chrono::{DateTime, Duration, Utc};

/// Safety margin subtracted from a token's reported lifetime
pub const EXPIRY_MARGIN_SECS: i64 = 300;

/// Cache key used for the private app token path
pub const STATIC_TOKEN_KEY: &str = "private_app_token";

/// Credentials resolved for one connector instance
#[derive(Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Private app access token, sent as-is
    PrivateAppToken(String),

    /// OAuth app credentials exchanged for short-lived access tokens
    OAuth {
        /// Client ID
        client_id: String,
        /// Client secret
        client_secret: String,
        /// Refresh token
        refresh_token: String,
    },
}

impl Credentials {
    /// Key the token cache stores this credential's token under
    pub fn fingerprint(&self) -> String {
        match self {
            Credentials::PrivateAppToken(_) => STATIC_TOKEN_KEY.to_string(),
            Credentials::OAuth {
                client_id,
                client_secret,
                refresh_token,
            } => format!("{refresh_token}{client_id}{client_secret}"),
        }
    }

    /// Short name of the credential mode
    pub fn kind(&self) -> &'static str {
        match self {
            Credentials::PrivateAppToken(_) => "private_app_token",
            Credentials::OAuth { .. } => "oauth",
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Credentials::PrivateAppToken(_) => f
                .debug_tuple("PrivateAppToken")
                .field(&"<redacted>")
                .finish(),
            Credentials::OAuth { client_id, .. } => f
                .debug_struct("OAuth")
                .field("client_id", client_id)
                .finish_non_exhaustive(),
        }
    }
}

/// Cached token with expiration
#[derive(Debug, Clone)]
pub struct CachedToken {
    /// The access token
    pub token: String,
    /// When the token stops being used; `None` never expires
    pub expires_at: Option<DateTime<Utc>>,
}

impl CachedToken {
    /// A token that never expires
    pub fn permanent(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            expires_at: None,
        }
    }

    /// A token reported valid for `expires_in` seconds, minus the safety margin
    pub fn from_exchange(token: impl Into<String>, expires_in: i64) -> Self {
        Self::from_exchange_at(token, expires_in, Utc::now())
    }

    /// Same as [`CachedToken::from_exchange`] with an explicit issue time
    pub fn from_exchange_at(token: impl Into<String>, expires_in: i64, now: DateTime<Utc>) -> Self {
        Self {
            token: token.into(),
            expires_at: Some(now + Duration::seconds(expires_in - EXPIRY_MARGIN_SECS)),
        }
    }

    /// Check if the token can still be used at `now`
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map_or(true, |expires_at| now < expires_at)
    }

    /// Check if the token is expired
    pub fn is_expired(&self) -> bool {
        !self.is_valid_at(Utc::now())
    }
}
