use serde::{Deserialize, Serialize};

/// Credential set held by a logged-in session.
///
/// All three fields are always populated; a logged-out session is the
/// absence of a `Token`, never a partially cleared one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    /// Authorization scheme, e.g. `"Bearer"`.
    pub scheme: String,
    pub access_token: String,
    pub refresh_token: String,
}

impl Token {
    pub fn new(
        scheme: impl Into<String>,
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
        }
    }

    /// Value for the `Authorization` request header.
    pub fn authorization_value(&self) -> String {
        format!("{} {}", self.scheme, self.access_token)
    }
}
