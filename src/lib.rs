//! Courier — authenticated REST client.
//!
//! Executes HTTP requests against a configured endpoint, retrying
//! transient failures with exponential backoff and keeping a login /
//! token-refresh lifecycle running transparently underneath secured
//! calls.
//!
//! # Quick Start
//!
//! ```no_run
//! use courier::{Config, Credentials, SecureClient};
//!
//! # async fn example() -> courier::Result<()> {
//! let config = Config::builder()
//!     .base_url("https://api.example.com")
//!     .credentials(Credentials::user("dispatch", "hunter2"))
//!     .build();
//!
//! let client = SecureClient::new(config);
//! let version = client.get("system/version").await?.text();
//! println!("{version}");
//! # Ok(())
//! # }
//! ```
//!
//! Retries never re-send a request the server already answered with a
//! non-transient status, but the engine does not guarantee idempotency:
//! callers must make sure retried operations are safe to repeat.

pub mod auth;
pub mod classify;
pub mod client;
pub mod config;
pub mod error;
pub mod request;
pub mod retry;
pub mod transport;

pub use auth::Token;
pub use client::{ApiClient, SecureClient};
pub use config::{Config, Credentials};
pub use error::{ApiError, Result};
pub use request::{Request, Response};
pub use retry::RetryPolicy;
pub use transport::{HttpTransport, RawResponse, Transport};
