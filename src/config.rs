//! Endpoint configuration and URL composition.

use std::fmt;
use std::time::Duration;

use bon::Builder;

/// How a client proves its identity to the authentication endpoint.
#[derive(Clone)]
pub enum Credentials {
    /// Standard login with a user id and password.
    User { user_id: String, password: String },
    /// External-system login with a single API key.
    ApiKey(String),
}

impl Credentials {
    pub fn user(user_id: impl Into<String>, password: impl Into<String>) -> Self {
        Self::User {
            user_id: user_id.into(),
            password: password.into(),
        }
    }

    pub fn api_key(key: impl Into<String>) -> Self {
        Self::ApiKey(key.into())
    }

    /// Login path segment under `Authentication/`.
    pub(crate) fn login_path(&self) -> &'static str {
        match self {
            Self::User { .. } => "logon",
            Self::ApiKey(_) => "logonforexternalsystem",
        }
    }

    /// Refresh path segment under `Authentication/`.
    pub(crate) fn refresh_path(&self) -> &'static str {
        match self {
            Self::User { .. } => "refresh",
            Self::ApiKey(_) => "refreshforexternalsystem",
        }
    }

    /// JSON payload for the login POST.
    pub(crate) fn login_body(&self) -> serde_json::Value {
        match self {
            Self::User { user_id, password } => serde_json::json!({
                "UserId": user_id,
                "Password": password,
            }),
            Self::ApiKey(key) => serde_json::json!({ "ApiKey": key }),
        }
    }

    /// Identity to report when the login is rejected. Never the secret.
    pub(crate) fn user_label(&self) -> &str {
        match self {
            Self::User { user_id, .. } => user_id,
            Self::ApiKey(_) => "api key",
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User { user_id, .. } => f
                .debug_struct("User")
                .field("user_id", user_id)
                .field("password", &"..")
                .finish(),
            Self::ApiKey(_) => f.debug_tuple("ApiKey").field(&"..").finish(),
        }
    }
}

/// Endpoint configuration for one client instance.
///
/// # Example
/// ```
/// use courier::{Config, Credentials};
///
/// let config = Config::builder()
///     .base_url("https://api.example.com")
///     .api_prefix("v2")
///     .credentials(Credentials::user("dispatch", "hunter2"))
///     .build();
/// assert_eq!(config.request_url("units"), "https://api.example.com/v2/units");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Base URL for business requests.
    #[builder(into)]
    pub base_url: String,
    /// Base URL for authentication requests; falls back to `base_url`.
    #[builder(into)]
    pub auth_base_url: Option<String>,
    /// Path prefix inserted between the base URL and every path.
    #[builder(into)]
    pub api_prefix: Option<String>,
    /// Budget for a single attempt; each retry gets a fresh one.
    #[builder(default = Duration::from_secs(5))]
    pub request_timeout: Duration,
    /// Additional attempts after the first on transient failures.
    #[builder(default = 3)]
    pub max_retry_attempts: u32,
    /// Login identity; required for secured clients.
    pub credentials: Option<Credentials>,
}

impl Config {
    /// Absolute URL for a business request path.
    pub fn request_url(&self, path: &str) -> String {
        join(&self.base_url, self.api_prefix.as_deref(), path)
    }

    /// Absolute URL for a login/refresh path segment.
    pub fn authentication_url(&self, path: &str) -> String {
        let base = self.auth_base_url.as_deref().unwrap_or(&self.base_url);
        join(
            base,
            self.api_prefix.as_deref(),
            &format!("Authentication/{path}"),
        )
    }
}

fn join(base: &str, prefix: Option<&str>, path: &str) -> String {
    let mut url = base.trim_end_matches('/').to_string();
    if let Some(prefix) = prefix {
        let prefix = prefix.trim_matches('/');
        if !prefix.is_empty() {
            url.push('/');
            url.push_str(prefix);
        }
    }
    url.push('/');
    url.push_str(path.trim_start_matches('/'));
    url
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        Config::builder().base_url("http://test/").build()
    }

    #[test]
    fn request_url_joins_base_and_path() {
        assert_eq!(base_config().request_url("mock"), "http://test/mock");
        assert_eq!(base_config().request_url("/mock"), "http://test/mock");
    }

    #[test]
    fn request_url_inserts_the_prefix() {
        let config = Config::builder()
            .base_url("http://test")
            .api_prefix("/api/")
            .build();
        assert_eq!(config.request_url("mock"), "http://test/api/mock");
    }

    #[test]
    fn authentication_url_defaults_to_the_main_base() {
        assert_eq!(
            base_config().authentication_url("logon"),
            "http://test/Authentication/logon"
        );
    }

    #[test]
    fn authentication_url_prefers_the_auth_base() {
        let config = Config::builder()
            .base_url("http://test")
            .auth_base_url("http://test-for-authentication")
            .build();
        assert_eq!(
            config.authentication_url("logon"),
            "http://test-for-authentication/Authentication/logon"
        );
    }

    #[test]
    fn defaults_match_the_documented_values() {
        let config = base_config();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.max_retry_attempts, 3);
    }

    #[test]
    fn user_credentials_use_the_standard_paths() {
        let credentials = Credentials::user("max", "pw");
        assert_eq!(credentials.login_path(), "logon");
        assert_eq!(credentials.refresh_path(), "refresh");
        assert_eq!(
            credentials.login_body(),
            serde_json::json!({"UserId": "max", "Password": "pw"})
        );
    }

    #[test]
    fn api_key_credentials_use_the_external_system_paths() {
        let credentials = Credentials::api_key("secret");
        assert_eq!(credentials.login_path(), "logonforexternalsystem");
        assert_eq!(credentials.refresh_path(), "refreshforexternalsystem");
        assert_eq!(
            credentials.login_body(),
            serde_json::json!({"ApiKey": "secret"})
        );
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let rendered = format!("{:?}", Credentials::user("max", "pw"));
        assert!(!rendered.contains("pw"));
        let rendered = format!("{:?}", Credentials::api_key("secret"));
        assert!(!rendered.contains("secret"));
    }
}
