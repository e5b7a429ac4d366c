//! Transport trait: the network boundary of the pipeline.
//!
//! A transport performs exactly one HTTP GET and reports what came back.
//! Retries, jitter, user-agent rotation and the fetch budget live above it
//! in [`Fetcher`](crate::pipeline::Fetcher), so a transport stays trivial to
//! mock.
//!
//! # Usage
//!
//! ```rust,ignore
//! use article_extraction::traits::transport::{FetchRequest, Transport};
//!
//! let response = transport.get(&FetchRequest::new("https://example.com")).await?;
//! if response.is_ok() {
//!     println!("{}", response.body);
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FetchResult;

/// A single GET request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub url: String,

    /// `User-Agent` header; `None` keeps the client's default
    pub user_agent: Option<String>,

    /// Per-request timeout; `None` keeps the client's default
    pub timeout: Option<Duration>,
}

impl FetchRequest {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            user_agent: None,
            timeout: None,
        }
    }

    /// Set the user agent.
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Set the timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// What the server sent back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawResponse {
    /// Final URL after redirects
    pub url: String,

    pub status: u16,

    pub body: String,
}

impl RawResponse {
    pub fn new(url: impl Into<String>, status: u16, body: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            status,
            body: body.into(),
        }
    }

    /// Only 200 counts as success; redirects are followed by the transport
    /// and every other status is treated as a failure.
    pub fn is_ok(&self) -> bool {
        self.status == 200
    }
}

/// Pluggable HTTP GET.
///
/// Implementations:
/// - `HttpTransport` - reqwest-backed
/// - `MockTransport` - canned responses for tests
#[async_trait]
pub trait Transport: Send + Sync {
    /// Perform one GET.
    ///
    /// Returns `Err` only when no response was received (connection error,
    /// timeout). Non-200 responses are returned as `Ok` so callers can
    /// decide what they mean.
    async fn get(&self, request: &FetchRequest) -> FetchResult<RawResponse>;

    /// Get the transport name (for logging/debugging).
    fn name(&self) -> &str {
        "unknown"
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn get(&self, request: &FetchRequest) -> FetchResult<RawResponse> {
        (**self).get(request).await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}
