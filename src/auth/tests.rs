//! Tests for the auth module

use super::*;
use crate::config::ConnectionConfig;
use crate::error::Error;
use std::collections::HashMap;
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect();
    move |name: &str| map.get(name).cloned()
}

fn oauth() -> Credentials {
    Credentials::OAuth {
        client_id: "my-client".to_string(),
        client_secret: "my-secret".to_string(),
        refresh_token: "my-refresh-token".to_string(),
    }
}

// ============================================================================
// Credential Resolution
// ============================================================================

#[test]
fn test_resolve_private_app_token_from_config() {
    let config = ConnectionConfig::with_private_app_token("pat-config");
    let creds = Credentials::resolve_with(&config, env_from(&[])).unwrap();
    assert_eq!(creds, Credentials::PrivateAppToken("pat-config".to_string()));
}

#[test]
fn test_config_overrides_environment() {
    let config = ConnectionConfig::with_private_app_token("pat-config");
    let env = env_from(&[(ENV_PRIVATE_APP_TOKEN, "pat-env")]);
    let creds = Credentials::resolve_with(&config, env).unwrap();
    assert_eq!(creds, Credentials::PrivateAppToken("pat-config".to_string()));
}

#[test]
fn test_environment_fallback() {
    let config = ConnectionConfig::default();
    let env = env_from(&[(ENV_PRIVATE_APP_TOKEN, "pat-env")]);
    let creds = Credentials::resolve_with(&config, env).unwrap();
    assert_eq!(creds, Credentials::PrivateAppToken("pat-env".to_string()));
}

#[test]
fn test_static_token_wins_over_oauth() {
    let mut config = ConnectionConfig::with_oauth("id", "secret", "rt");
    config.private_app_token = Some("pat".to_string());
    let creds = Credentials::resolve_with(&config, env_from(&[])).unwrap();
    assert_eq!(creds.kind(), "private_app_token");
}

#[test]
fn test_oauth_fields_mix_config_and_environment() {
    let mut config = ConnectionConfig::default();
    config.client_id = Some("config-id".to_string());
    let env = env_from(&[
        (ENV_CLIENT_ID, "env-id"),
        (ENV_CLIENT_SECRET, "env-secret"),
        (ENV_REFRESH_TOKEN, "env-refresh"),
    ]);

    let creds = Credentials::resolve_with(&config, env).unwrap();
    assert_eq!(
        creds,
        Credentials::OAuth {
            client_id: "config-id".to_string(),
            client_secret: "env-secret".to_string(),
            refresh_token: "env-refresh".to_string(),
        }
    );
}

#[test]
fn test_incomplete_oauth_is_missing_credentials() {
    let mut config = ConnectionConfig::default();
    config.client_id = Some("id".to_string());
    config.client_secret = Some("secret".to_string());

    let err = Credentials::resolve_with(&config, env_from(&[])).unwrap_err();
    assert!(matches!(err, Error::MissingCredentials));
    assert!(err.is_config());
}

#[test]
fn test_empty_token_counts_as_absent() {
    let config = ConnectionConfig::with_private_app_token("");
    let err = Credentials::resolve_with(&config, env_from(&[])).unwrap_err();
    assert!(matches!(err, Error::MissingCredentials));
}

// ============================================================================
// Token Cache
// ============================================================================

#[tokio::test]
async fn test_static_token_makes_no_requests() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&mock_server)
        .await;

    let cache = TokenCache::new(
        Credentials::PrivateAppToken("pat-123".to_string()),
        format!("{}/oauth/v1/token", mock_server.uri()),
    );

    for _ in 0..3 {
        assert_eq!(cache.get_token().await.unwrap(), "pat-123");
    }
    assert!(cache.cached().is_some());
}

#[tokio::test]
async fn test_oauth_exchange_sends_refresh_grant() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .and(body_string_contains("grant_type=refresh_token"))
        .and(body_string_contains("client_id=my-client"))
        .and(body_string_contains("client_secret=my-secret"))
        .and(body_string_contains("refresh_token=my-refresh-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "access-1",
            "refresh_token": "my-refresh-token",
            "expires_in": 1800,
            "token_type": "bearer"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = TokenCache::new(oauth(), format!("{}/oauth/v1/token", mock_server.uri()));
    assert_eq!(cache.get_token().await.unwrap(), "access-1");
}

#[tokio::test]
async fn test_oauth_token_is_cached_within_ttl() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "cached-token",
            "expires_in": 1800
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = TokenCache::new(oauth(), format!("{}/oauth/v1/token", mock_server.uri()));

    assert_eq!(cache.get_token().await.unwrap(), "cached-token");
    assert_eq!(cache.get_token().await.unwrap(), "cached-token");
    assert_eq!(cache.get_token().await.unwrap(), "cached-token");
}

#[tokio::test]
async fn test_oauth_token_refreshed_after_adjusted_expiry() {
    let mock_server = MockServer::start().await;

    // A 300s lifetime minus the 300s margin is already expired
    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "short-lived",
            "expires_in": 300
        })))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "long-lived",
            "expires_in": 1800
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = TokenCache::new(oauth(), format!("{}/oauth/v1/token", mock_server.uri()));

    assert_eq!(cache.get_token().await.unwrap(), "short-lived");
    assert_eq!(cache.get_token().await.unwrap(), "long-lived");
    assert_eq!(cache.get_token().await.unwrap(), "long-lived");
    assert_eq!(cache.cached().unwrap().token, "long-lived");
}

#[tokio::test]
async fn test_concurrent_callers_share_one_exchange() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({
                    "access_token": "shared",
                    "expires_in": 1800
                }))
                .set_delay(std::time::Duration::from_millis(50)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;

    let cache = Arc::new(TokenCache::new(
        oauth(),
        format!("{}/oauth/v1/token", mock_server.uri()),
    ));

    let mut handles = Vec::new();
    for _ in 0..10 {
        let cache = Arc::clone(&cache);
        handles.push(tokio::spawn(async move { cache.get_token().await }));
    }
    for handle in handles {
        assert_eq!(handle.await.unwrap().unwrap(), "shared");
    }
}

#[tokio::test]
async fn test_exchange_failure_is_not_cached() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
            "status": "BAD_REFRESH_TOKEN",
            "message": "missing or unknown refresh token"
        })))
        .up_to_n_times(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/oauth/v1/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "access_token": "second-try",
            "expires_in": 1800
        })))
        .mount(&mock_server)
        .await;

    let cache = TokenCache::new(oauth(), format!("{}/oauth/v1/token", mock_server.uri()));

    let err = cache.get_token().await.unwrap_err();
    assert!(matches!(err, Error::TokenRefresh { .. }));
    assert!(err.to_string().contains("400"));
    assert!(!err.is_retryable());
    assert!(cache.cached().is_none());

    assert_eq!(cache.get_token().await.unwrap(), "second-try");
}
