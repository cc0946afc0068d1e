//! Request descriptors and response decoding.

use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::Result;

/// One HTTP call to make: verb, relative path, optional JSON body and
/// extra headers. Cloneable so the secure path can replay it once after
/// a token refresh.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub path: String,
    pub body: Option<serde_json::Value>,
    pub headers: Vec<(String, String)>,
}

impl Request {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body, serialized once so retries and replays send
    /// identical bytes.
    pub fn json<B: Serialize>(mut self, body: &B) -> Result<Self> {
        self.body = Some(serde_json::to_value(body)?);
        Ok(self)
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }
}

/// A successful response. The caller picks the decoder; nothing is
/// parsed until asked for.
#[derive(Debug, Clone)]
pub struct Response {
    status: u16,
    body: Vec<u8>,
}

impl Response {
    pub(crate) fn new(status: u16, body: Vec<u8>) -> Self {
        Self { status, body }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    /// Raw body bytes.
    pub fn bytes(&self) -> &[u8] {
        &self.body
    }

    /// Body as text, passed through unchanged.
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Case-insensitive comparison against `"true"`; anything else —
    /// including `"False"` and garbage — is `false`.
    pub fn boolean(&self) -> bool {
        self.text().trim().eq_ignore_ascii_case("true")
    }

    /// Lenient numeric decode: a non-numeric body is `0`, not an error.
    pub fn integer(&self) -> i64 {
        self.text().trim().parse().unwrap_or(0)
    }

    /// Structured decode through serde.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}
