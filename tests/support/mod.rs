//! Shared fixtures for the wiremock-backed integration tests.
#![allow(dead_code)]

use serde_json::json;
use wiremock::MockServer;

use courier::{Config, Credentials, RetryPolicy, SecureClient, Token};

/// Config pointing at the mock server, with standard user credentials.
pub fn config_for(server: &MockServer) -> Config {
    Config::builder()
        .base_url(server.uri())
        .credentials(Credentials::user("max", "pw"))
        .build()
}

/// Secure client with a zero-backoff retry policy.
pub fn secure_client(server: &MockServer) -> SecureClient {
    SecureClient::new(config_for(server)).with_retry_policy(RetryPolicy::instant(3))
}

/// Secure client already holding a (stale) credential set.
pub fn seeded_client(server: &MockServer) -> SecureClient {
    secure_client(server).with_token(stale_token())
}

pub fn stale_token() -> Token {
    Token::new("Bearer", "StaleToken", "StaleRefresh")
}

/// Wire shape of a successful login, as the server would send it.
pub fn login_grant() -> serde_json::Value {
    json!({
        "AuthorizationType": "Bearer",
        "AccessToken": "NewAccessToken",
        "RefreshToken": "NewRefreshToken",
    })
}

/// Paths of every request the server received, in arrival order.
pub async fn recorded_paths(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .expect("request recording enabled")
        .iter()
        .map(|request| request.url.path().to_string())
        .collect()
}
