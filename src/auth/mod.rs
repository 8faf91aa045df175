//! Authentication module
//!
//! Supports: private app tokens and OAuth refresh-token exchange.
//!
//! `Credentials::resolve` picks the credential mode from config and
//! environment. The `TokenCache` turns those credentials into bearer tokens
//! and memoizes exchanged tokens until shortly before they expire.

mod credentials;
mod token_cache;
mod types;

pub use credentials::{ENV_CLIENT_ID, ENV_CLIENT_SECRET, ENV_PRIVATE_APP_TOKEN, ENV_REFRESH_TOKEN};
pub use token_cache::TokenCache;
pub use types::{CachedToken, Credentials, EXPIRY_MARGIN_SECS, STATIC_TOKEN_KEY};

#[cfg(test)]
mod tests;
