//! HTTP client module
//!
//! Provides the HTTP client every remote call goes through.
//!
//! # Features
//!
//! - **Bearer Authentication**: Tokens come from the connector's token cache
//! - **Throttling**: Token bucket rate limiter using governor
//! - **Status Classification**: 404, 429 and auth failures map to distinct errors

mod client;
mod rate_limit;

pub use client::{
    path_segment, HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig,
};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
