//! Mock transport for testing.
//!
//! Provides canned responses per URL, scripted failure sequences and call
//! recording.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, RwLock};

use crate::error::{FetchError, FetchResult};
use crate::traits::transport::{FetchRequest, RawResponse, Transport};

/// One scripted reply.
#[derive(Debug, Clone)]
pub enum MockReply {
    /// A response with the given status and body
    Response { status: u16, body: String },
    /// A 200 response served from another URL after redirects
    Redirect { location: String, body: String },
    /// No response at all (connection refused, reset, ...)
    ConnectionError(String),
    /// Request timed out
    Timeout,
}

impl MockReply {
    pub fn html(body: impl Into<String>) -> Self {
        Self::Response {
            status: 200,
            body: body.into(),
        }
    }

    pub fn status(status: u16) -> Self {
        Self::Response {
            status,
            body: String::new(),
        }
    }

    pub fn redirect(location: impl Into<String>, body: impl Into<String>) -> Self {
        Self::Redirect {
            location: location.into(),
            body: body.into(),
        }
    }

    pub fn connection_error() -> Self {
        Self::ConnectionError("connection refused".to_string())
    }
}

/// Mock transport for testing.
///
/// Each URL has a queue of replies. Replies are consumed in order and the
/// last one repeats forever. Unknown URLs answer 404.
///
/// # Example
///
/// ```rust
/// use article_extraction::transports::{MockReply, MockTransport};
///
/// let mock = MockTransport::new()
///     .with_html("https://example.com/a", "<title>A</title>")
///     .with_sequence(
///         "https://example.com/flaky",
///         vec![MockReply::connection_error(), MockReply::html("<title>B</title>")],
///     );
/// assert_eq!(mock.call_count(), 0);
/// ```
#[derive(Default)]
pub struct MockTransport {
    replies: Arc<RwLock<HashMap<String, VecDeque<MockReply>>>>,
    calls: Arc<RwLock<Vec<FetchRequest>>>,
}

impl MockTransport {
    /// Create a new empty mock transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the replies for a URL, replacing any previous script.
    pub fn set_sequence(&self, url: impl Into<String>, replies: Vec<MockReply>) {
        let mut map = self.replies.write().unwrap();
        map.insert(url.into(), replies.into_iter().collect());
    }

    /// Serve HTML with status 200 (builder pattern).
    pub fn with_html(self, url: impl Into<String>, html: impl Into<String>) -> Self {
        self.set_sequence(url, vec![MockReply::html(html)]);
        self
    }

    /// Serve a bare status code (builder pattern).
    pub fn with_status(self, url: impl Into<String>, status: u16) -> Self {
        self.set_sequence(url, vec![MockReply::status(status)]);
        self
    }

    /// Serve HTML from `location` as if `url` redirected there (builder pattern).
    pub fn with_redirect(
        self,
        url: impl Into<String>,
        location: impl Into<String>,
        html: impl Into<String>,
    ) -> Self {
        self.set_sequence(url, vec![MockReply::redirect(location, html)]);
        self
    }

    /// Fail every request to the URL with a connection error (builder pattern).
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.set_sequence(url, vec![MockReply::connection_error()]);
        self
    }

    /// Script a sequence of replies (builder pattern).
    pub fn with_sequence(self, url: impl Into<String>, replies: Vec<MockReply>) -> Self {
        self.set_sequence(url, replies);
        self
    }

    /// Total number of requests made.
    pub fn call_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Number of requests made for one URL.
    pub fn calls_for(&self, url: &str) -> usize {
        self.calls
            .read()
            .unwrap()
            .iter()
            .filter(|r| r.url == url)
            .count()
    }

    /// Every request, in order.
    pub fn calls(&self) -> Vec<FetchRequest> {
        self.calls.read().unwrap().clone()
    }

    /// Requested URLs, in order.
    pub fn requested_urls(&self) -> Vec<String> {
        self.calls
            .read()
            .unwrap()
            .iter()
            .map(|r| r.url.clone())
            .collect()
    }

    fn next_reply(&self, url: &str) -> Option<MockReply> {
        let mut map = self.replies.write().unwrap();
        let queue = map.get_mut(url)?;
        if queue.len() > 1 {
            queue.pop_front()
        } else {
            queue.front().cloned()
        }
    }
}

impl Clone for MockTransport {
    fn clone(&self) -> Self {
        Self {
            replies: Arc::clone(&self.replies),
            calls: Arc::clone(&self.calls),
        }
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn get(&self, request: &FetchRequest) -> FetchResult<RawResponse> {
        self.calls.write().unwrap().push(request.clone());

        match self.next_reply(&request.url) {
            Some(MockReply::Response { status, body }) => {
                Ok(RawResponse::new(request.url.clone(), status, body))
            }
            Some(MockReply::Redirect { location, body }) => {
                Ok(RawResponse::new(location, 200, body))
            }
            Some(MockReply::ConnectionError(message)) => Err(FetchError::Http(message.into())),
            Some(MockReply::Timeout) => Err(FetchError::Timeout {
                url: request.url.clone(),
            }),
            None => Ok(RawResponse::new(request.url.clone(), 404, "")),
        }
    }

    fn name(&self) -> &str {
        "mock"
    }
}
