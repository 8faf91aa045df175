//! Credential resolution
//!
//! Explicit config wins over the environment, field by field. A private app
//! token, when present, is used and any OAuth fields are ignored.

use super::types::Credentials;
use crate::config::ConnectionConfig;
use crate::error::{Error, Result};
use tracing::debug;

/// Environment variable for the private app token
pub const ENV_PRIVATE_APP_TOKEN: &str = "HUBSPOT_PRIVATE_APP_TOKEN";
/// Environment variable for the OAuth client ID
pub const ENV_CLIENT_ID: &str = "HUBSPOT_CLIENT_ID";
/// Environment variable for the OAuth client secret
pub const ENV_CLIENT_SECRET: &str = "HUBSPOT_CLIENT_SECRET";
/// Environment variable for the OAuth refresh token
pub const ENV_REFRESH_TOKEN: &str = "HUBSPOT_REFRESH_TOKEN";

impl Credentials {
    /// Resolve credentials from config, falling back to the process environment
    pub fn resolve(config: &ConnectionConfig) -> Result<Self> {
        Self::resolve_with(config, |name| std::env::var(name).ok())
    }

    /// Resolve credentials from config, falling back to `env`
    pub fn resolve_with<F>(config: &ConnectionConfig, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pick = |configured: &Option<String>, var: &str| {
            configured
                .clone()
                .or_else(|| env(var))
                .filter(|value| !value.is_empty())
        };

        if let Some(token) = pick(&config.private_app_token, ENV_PRIVATE_APP_TOKEN) {
            debug!("Using private app token credentials");
            return Ok(Credentials::PrivateAppToken(token));
        }

        let client_id = pick(&config.client_id, ENV_CLIENT_ID);
        let client_secret = pick(&config.client_secret, ENV_CLIENT_SECRET);
        let refresh_token = pick(&config.refresh_token, ENV_REFRESH_TOKEN);

        match (client_id, client_secret, refresh_token) {
            (Some(client_id), Some(client_secret), Some(refresh_token)) => {
                debug!("Using OAuth refresh token credentials");
                Ok(Credentials::OAuth {
                    client_id,
                    client_secret,
                    refresh_token,
                })
            }
            _ => Err(Error::MissingCredentials),
        }
    }
}
