//! Error types for Courier.

use thiserror::Error;

/// Primary error type for all Courier operations.
///
/// The first block of variants are terminal: they surface to callers
/// once every recovery path has been exhausted. `Transient` and the
/// three token-expiry variants are recovery classifications — the retry
/// engine and the secure client consume them, and [`into_terminal`]
/// collapses any that leak through.
///
/// [`into_terminal`]: ApiError::into_terminal
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("API returned a 400 (bad request) response for url '{url}'")]
    BadParameter { url: String, body: String },

    #[error("API returned a 401 (unauthorized) response for url '{url}'")]
    Unauthorized { url: String, body: String },

    #[error("API returned a 403 (forbidden) response for url '{url}'")]
    Forbidden { url: String, body: String },

    #[error("API returned a 404 (not found) response for url '{url}'")]
    NotFound { url: String, body: String },

    #[error("API returned a {status} error code response for url '{url}'")]
    InternalError {
        url: String,
        status: u16,
        body: String,
    },

    #[error("API didn't return an answer in a timely manner for url '{url}'")]
    NoResponse {
        url: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    #[error("credentials were rejected for user '{user}'")]
    InvalidCredential { user: String },

    #[error("transient {status} response for url '{url}'")]
    Transient {
        url: String,
        status: u16,
        body: String,
    },

    #[error("access token expired for url '{url}'")]
    AccessTokenExpired { url: String, body: String },

    #[error("refresh token expired")]
    RefreshTokenExpired { url: String, body: String },

    #[error("refresh token invalid")]
    RefreshTokenInvalid { url: String, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl ApiError {
    /// Whether the retry engine should attempt this failure again.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. } | Self::NoResponse { .. })
    }

    pub(crate) fn is_access_token_expired(&self) -> bool {
        matches!(self, Self::AccessTokenExpired { .. })
    }

    /// HTTP status carried by this error, when a response was received.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::BadParameter { .. } => Some(400),
            Self::Unauthorized { .. }
            | Self::AccessTokenExpired { .. }
            | Self::RefreshTokenExpired { .. }
            | Self::RefreshTokenInvalid { .. } => Some(401),
            Self::Forbidden { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::InternalError { status, .. } | Self::Transient { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Raw error-response body, when a response was received.
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::BadParameter { body, .. }
            | Self::Unauthorized { body, .. }
            | Self::Forbidden { body, .. }
            | Self::NotFound { body, .. }
            | Self::InternalError { body, .. }
            | Self::Transient { body, .. }
            | Self::AccessTokenExpired { body, .. }
            | Self::RefreshTokenExpired { body, .. }
            | Self::RefreshTokenInvalid { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Collapse recovery classifications into the terminal kind the
    /// caller sees once no recovery path applies: an exhausted
    /// transient failure keeps its real status code, and every 401
    /// flavor becomes plain `Unauthorized`.
    pub(crate) fn into_terminal(self) -> Self {
        match self {
            Self::Transient { url, status, body } => Self::InternalError { url, status, body },
            Self::AccessTokenExpired { url, body }
            | Self::RefreshTokenExpired { url, body }
            | Self::RefreshTokenInvalid { url, body } => Self::Unauthorized { url, body },
            other => other,
        }
    }
}

/// Convenience alias.
pub type Result<T> = std::result::Result<T, ApiError>;
