//! Response classification: one transport attempt in, one [`Outcome`] out.

use reqwest::header::HeaderMap;

use crate::error::ApiError;

/// Response header signaling that the access token is expired.
pub const TOKEN_EXPIRED: &str = "Token-Expired";
/// Response header signaling that the refresh token is expired.
pub const REFRESH_TOKEN_EXPIRED: &str = "Refresh-Token-Expired";
/// Response header signaling that the refresh token is invalid.
pub const REFRESH_TOKEN_INVALID: &str = "Refresh-Token-Invalid";

/// Semantic classification of a single transport attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success(u16),
    /// 408, 502, 503 or 504 — worth retrying.
    Transient(u16),
    /// No response received at all (connection or timeout failure).
    NoResponse,
    AccessTokenExpired,
    RefreshTokenExpired,
    RefreshTokenInvalid,
    BadParameter,
    Unauthorized,
    Forbidden,
    NotFound,
    /// 500 or any status without a more specific classification.
    InternalError(u16),
}

/// Classify a transport attempt from its status code and response
/// headers. `None` status means no response was received.
pub fn classify(status: Option<u16>, headers: Option<&HeaderMap>) -> Outcome {
    let Some(status) = status else {
        return Outcome::NoResponse;
    };
    match status {
        200..=299 => Outcome::Success(status),
        408 | 502 | 503 | 504 => Outcome::Transient(status),
        401 if has_indicator(headers, TOKEN_EXPIRED) => Outcome::AccessTokenExpired,
        401 if has_indicator(headers, REFRESH_TOKEN_EXPIRED) => Outcome::RefreshTokenExpired,
        401 if has_indicator(headers, REFRESH_TOKEN_INVALID) => Outcome::RefreshTokenInvalid,
        400 => Outcome::BadParameter,
        401 => Outcome::Unauthorized,
        403 => Outcome::Forbidden,
        404 => Outcome::NotFound,
        other => Outcome::InternalError(other),
    }
}

fn has_indicator(headers: Option<&HeaderMap>, name: &str) -> bool {
    headers
        .and_then(|headers| headers.get(name))
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.eq_ignore_ascii_case("true"))
}

impl Outcome {
    /// Convert a failure outcome into the matching [`ApiError`].
    ///
    /// Callers handle `Success` before converting; a success outcome
    /// falls into the `InternalError` bucket here.
    pub fn into_error(self, url: impl Into<String>, body: String) -> ApiError {
        let url = url.into();
        match self {
            Outcome::Success(status) | Outcome::InternalError(status) => ApiError::InternalError {
                url,
                status,
                body,
            },
            Outcome::Transient(status) => ApiError::Transient { url, status, body },
            Outcome::NoResponse => ApiError::NoResponse { url, source: None },
            Outcome::AccessTokenExpired => ApiError::AccessTokenExpired { url, body },
            Outcome::RefreshTokenExpired => ApiError::RefreshTokenExpired { url, body },
            Outcome::RefreshTokenInvalid => ApiError::RefreshTokenInvalid { url, body },
            Outcome::BadParameter => ApiError::BadParameter { url, body },
            Outcome::Unauthorized => ApiError::Unauthorized { url, body },
            Outcome::Forbidden => ApiError::Forbidden { url, body },
            Outcome::NotFound => ApiError::NotFound { url, body },
        }
    }
}
