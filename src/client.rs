//! Request execution: the plain executor and its credential-guarded wrapper.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use serde::Serialize;
use tracing::debug;

use crate::auth::{AuthSession, Token};
use crate::classify::{classify, Outcome};
use crate::config::Config;
use crate::error::Result;
use crate::request::{Request, Response};
use crate::retry::RetryPolicy;
use crate::transport::{HttpTransport, Transport};

/// One trip through the pipeline: transport call wrapped in the retry
/// policy, with every attempt classified. Recovery classifications
/// (transient, token expiry) come back as errors for the layers above
/// to absorb.
pub(crate) async fn send_classified(
    transport: &dyn Transport,
    retry: &RetryPolicy,
    method: Method,
    url: &str,
    body: Option<&serde_json::Value>,
    headers: &[(String, String)],
    timeout: Duration,
) -> Result<Response> {
    retry
        .execute(|| {
            let method = method.clone();
            async move {
                let raw = transport.send(method, url, body, headers, timeout).await?;
                match classify(Some(raw.status), Some(&raw.headers)) {
                    Outcome::Success(status) => Ok(Response::new(status, raw.body)),
                    outcome => Err(outcome
                        .into_error(url, String::from_utf8_lossy(&raw.body).into_owned())),
                }
            }
        })
        .await
}

/// Plain request executor: retry plus error classification, no
/// credential handling.
#[derive(Clone)]
pub struct ApiClient {
    pub(crate) config: Arc<Config>,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let retry = RetryPolicy::new(config.max_retry_attempts);
        Self {
            config: Arc::new(config),
            transport,
            retry,
        }
    }

    /// Replace the retry policy, e.g. with an instant backoff in tests.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Execute a request against the configured endpoint.
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        self.send(request).await.map_err(|error| error.into_terminal())
    }

    /// Execute without terminal mapping, leaving recovery
    /// classifications visible to the secured wrapper.
    pub(crate) async fn send(&self, request: &Request) -> Result<Response> {
        let url = self.config.request_url(&request.path);
        debug!(method = %request.method, url = %url, "executing request");
        send_classified(
            self.transport.as_ref(),
            &self.retry,
            request.method.clone(),
            &url,
            request.body.as_ref(),
            &request.headers,
            self.config.request_timeout,
        )
        .await
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.execute(&Request::get(path)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(&Request::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(&Request::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.execute(&Request::delete(path)).await
    }
}

/// Credential-guarded executor: an [`ApiClient`] wrapped with the
/// login/refresh lifecycle. Every call is sent with an `Authorization`
/// header, and an access-token rejection triggers one refresh followed
/// by one replay of the original request — never more.
pub struct SecureClient {
    inner: ApiClient,
    session: AuthSession,
}

impl SecureClient {
    pub fn new(config: Config) -> Self {
        Self::with_transport(config, Arc::new(HttpTransport))
    }

    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        let inner = ApiClient::with_transport(config, transport);
        let session = AuthSession::new(inner.config.clone(), inner.transport.clone(), inner.retry);
        Self { inner, session }
    }

    /// Replace the retry policy on both the executor and the lifecycle.
    pub fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.inner = self.inner.with_retry_policy(retry);
        self.session = self.session.with_retry_policy(retry);
        self
    }

    /// Adopt an existing credential set instead of logging in on first
    /// use.
    pub fn with_token(mut self, token: Token) -> Self {
        self.session = self.session.with_token(token);
        self
    }

    pub fn config(&self) -> &Config {
        self.inner.config()
    }

    /// Snapshot of the session's credential set; `None` when logged out.
    pub async fn token(&self) -> Option<Token> {
        self.session.token().await
    }

    /// Execute a request with the credential guard: login when logged
    /// out, attach the Authorization header, and refresh-and-replay
    /// once when the access token is rejected as expired.
    pub async fn execute(&self, request: &Request) -> Result<Response> {
        let token = self.session.login_when_logged_out().await?;
        let authed = request
            .clone()
            .header(AUTHORIZATION.as_str(), token.authorization_value());

        match self.inner.send(&authed).await {
            Err(error) if error.is_access_token_expired() => {
                let refreshed = self.session.refresh(&token.access_token).await?;
                let replay = request
                    .clone()
                    .header(AUTHORIZATION.as_str(), refreshed.authorization_value());
                self.inner
                    .send(&replay)
                    .await
                    .map_err(|error| error.into_terminal())
            }
            other => other.map_err(|error| error.into_terminal()),
        }
    }

    pub async fn get(&self, path: &str) -> Result<Response> {
        self.execute(&Request::get(path)).await
    }

    pub async fn post<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(&Request::post(path).json(body)?).await
    }

    pub async fn put<B: Serialize>(&self, path: &str, body: &B) -> Result<Response> {
        self.execute(&Request::put(path).json(body)?).await
    }

    pub async fn delete(&self, path: &str) -> Result<Response> {
        self.execute(&Request::delete(path)).await
    }
}
