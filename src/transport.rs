//! HTTP transport seam over a shared reqwest client.

use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::error::{ApiError, Result};

/// Raw result of one transport attempt that produced *any* response,
/// error statuses included.
#[derive(Debug)]
pub struct RawResponse {
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

/// Sends a single HTTP request. Implementations must distinguish a
/// received error status (an `Ok(RawResponse)`) from no response at all
/// (`Err(ApiError::NoResponse)`).
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<RawResponse>;
}

static SHARED_CLIENT: OnceLock<reqwest::Client> = OnceLock::new();

/// Get (or create) the shared reqwest client. Timeouts are applied per
/// request, not here, so every retry attempt gets a fresh budget.
fn shared_client() -> &'static reqwest::Client {
    SHARED_CLIENT.get_or_init(|| {
        reqwest::Client::builder()
            .pool_max_idle_per_host(10)
            .build()
            .expect("Failed to build HTTP client")
    })
}

/// Default transport over the process-wide shared client.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
        headers: &[(String, String)],
        timeout: Duration,
    ) -> Result<RawResponse> {
        let mut request = shared_client().request(method, url).timeout(timeout);
        if let Some(body) = body {
            request = request.json(body);
        }
        for (name, value) in headers {
            request = request.header(name.as_str(), value.as_str());
        }

        let no_response = |error: reqwest::Error| ApiError::NoResponse {
            url: url.to_string(),
            source: Some(error),
        };
        let response = request.send().await.map_err(no_response)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await.map_err(no_response)?.to_vec();
        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}
