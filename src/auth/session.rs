//! Login and token-refresh lifecycle for secured clients.

use std::sync::Arc;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::debug;

use super::token::Token;
use crate::client::send_classified;
use crate::config::{Config, Credentials};
use crate::error::{ApiError, Result};
use crate::retry::RetryPolicy;
use crate::transport::Transport;

/// Wire shape of a successful login.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct LoginGrant {
    authorization_type: String,
    access_token: String,
    refresh_token: String,
}

/// Wire shape of the refresh POST body.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct RefreshRequest<'a> {
    access_token: &'a str,
    refresh_token: &'a str,
}

/// Wire shape of a successful refresh.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct RefreshGrant {
    access_token: String,
}

/// Owns the credential set for one secured client and drives it through
/// the `LoggedOut → LoggingIn → LoggedIn → Refreshing` lifecycle.
///
/// All transitions happen while holding the internal lock, so
/// concurrent callers coalesce into a single login or refresh instead
/// of racing each other.
pub struct AuthSession {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    retry: RetryPolicy,
    token: Mutex<Option<Token>>,
}

impl AuthSession {
    pub(crate) fn new(
        config: Arc<Config>,
        transport: Arc<dyn Transport>,
        retry: RetryPolicy,
    ) -> Self {
        Self {
            config,
            transport,
            retry,
            token: Mutex::new(None),
        }
    }

    /// Adopt an existing credential set instead of logging in.
    pub(crate) fn with_token(mut self, token: Token) -> Self {
        self.token = Mutex::new(Some(token));
        self
    }

    pub(crate) fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Snapshot of the current credential set; `None` when logged out.
    pub async fn token(&self) -> Option<Token> {
        self.token.lock().await.clone()
    }

    /// Guard run before every secured call: log in only when no
    /// credential set is held.
    pub async fn login_when_logged_out(&self) -> Result<Token> {
        let mut slot = self.token.lock().await;
        match &*slot {
            Some(token) => Ok(token.clone()),
            None => self.login_locked(&mut slot).await,
        }
    }

    /// Exchange the refresh token for a new access token, falling back
    /// to a full re-login when the refresh token itself is expired or
    /// invalid.
    ///
    /// `sent_access_token` is the token the caller actually attached to
    /// the rejected request; when the stored token already differs,
    /// another caller refreshed first and this call returns it as is.
    pub async fn refresh(&self, sent_access_token: &str) -> Result<Token> {
        let mut slot = self.token.lock().await;
        let current = match &*slot {
            Some(token) if token.access_token != sent_access_token => return Ok(token.clone()),
            Some(token) => token.clone(),
            None => return self.login_locked(&mut slot).await,
        };

        let credentials = self.credentials()?;
        let url = self.config.authentication_url(credentials.refresh_path());
        debug!(url = %url, "access token expired; refreshing");
        let body = serde_json::to_value(RefreshRequest {
            access_token: &current.access_token,
            refresh_token: &current.refresh_token,
        })?;

        let outcome = send_classified(
            self.transport.as_ref(),
            &self.retry,
            Method::POST,
            &url,
            Some(&body),
            &[],
            self.config.request_timeout,
        )
        .await;

        match outcome {
            Ok(response) => match response.json::<RefreshGrant>() {
                Ok(grant) => {
                    // Only the access token changes on refresh.
                    let mut token = current;
                    token.access_token = grant.access_token;
                    *slot = Some(token.clone());
                    debug!("access token refreshed");
                    Ok(token)
                }
                Err(error) => {
                    *slot = None;
                    Err(error)
                }
            },
            Err(
                ApiError::RefreshTokenExpired { .. } | ApiError::RefreshTokenInvalid { .. },
            ) => {
                debug!("refresh token rejected; logging back in");
                self.login_locked(&mut slot).await
            }
            Err(error) => {
                // Unexpected refresh failure: drop the whole credential
                // set and surface the terminal error.
                *slot = None;
                Err(error.into_terminal())
            }
        }
    }

    /// Full login, replacing whatever credential set was held.
    async fn login_locked(&self, slot: &mut Option<Token>) -> Result<Token> {
        let credentials = self.credentials()?;
        let url = self.config.authentication_url(credentials.login_path());
        debug!(url = %url, "logging in");

        let outcome = send_classified(
            self.transport.as_ref(),
            &self.retry,
            Method::POST,
            &url,
            Some(&credentials.login_body()),
            &[],
            self.config.request_timeout,
        )
        .await;

        let response = match outcome {
            Ok(response) => response,
            Err(error) => {
                *slot = None;
                return Err(login_failure(credentials, &url, error));
            }
        };
        match response.json::<LoginGrant>() {
            Ok(grant) => {
                let token = Token::new(
                    grant.authorization_type,
                    grant.access_token,
                    grant.refresh_token,
                );
                *slot = Some(token.clone());
                debug!("login succeeded");
                Ok(token)
            }
            Err(error) => {
                *slot = None;
                Err(login_failure(credentials, &url, error))
            }
        }
    }

    fn credentials(&self) -> Result<&Credentials> {
        self.config.credentials.as_ref().ok_or_else(|| {
            ApiError::Configuration("no credentials configured for login".to_string())
        })
    }
}

/// Map a login failure onto the three kinds callers see: a plain 401 is
/// a credential rejection, no response stays as is, and everything else
/// is an internal error in the login process.
fn login_failure(credentials: &Credentials, url: &str, error: ApiError) -> ApiError {
    match error {
        ApiError::Unauthorized { .. } => ApiError::InvalidCredential {
            user: credentials.user_label().to_string(),
        },
        error @ ApiError::NoResponse { .. } => error,
        other => ApiError::InternalError {
            url: url.to_string(),
            status: other.status().unwrap_or(500),
            body: other.body().unwrap_or_default().to_string(),
        },
    }
}
