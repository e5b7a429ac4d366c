//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the extraction library
//! without making real network or model calls.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use crate::error::CompletionError;
use crate::traits::completion::{CompletionClient, CompletionRequest};
use crate::transports::MockTransport;

/// A mock completion backend.
///
/// Returns queued responses in order, then the default response. Records
/// every request for assertions.
#[derive(Default)]
pub struct MockCompletionClient {
    responses: Arc<RwLock<Vec<String>>>,
    default_response: Option<String>,
    fail_with: Option<String>,
    calls: Arc<RwLock<Vec<CompletionRequest>>>,
}

impl MockCompletionClient {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response (builder pattern).
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.write().unwrap().push(response.into());
        self
    }

    /// Response returned once the queue is empty.
    pub fn with_default_response(mut self, response: impl Into<String>) -> Self {
        self.default_response = Some(response.into());
        self
    }

    /// Fail every call with an API error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.fail_with = Some(message.into());
        self
    }

    pub fn calls(&self) -> Vec<CompletionRequest> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for MockCompletionClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError> {
        self.calls.write().unwrap().push(request.clone());

        if let Some(message) = &self.fail_with {
            return Err(CompletionError::Api(message.clone()));
        }

        let mut responses = self.responses.write().unwrap();
        if !responses.is_empty() {
            return Ok(responses.remove(0));
        }

        self.default_response
            .clone()
            .ok_or_else(|| CompletionError::Config("no mock response configured".to_string()))
    }
}

/// Builder for article pages in the markup the default profile expects.
#[derive(Debug, Clone, Default)]
pub struct ArticleHtml {
    title: String,
    bylines: Vec<(String, String)>,
    body: String,
    with_container: bool,
}

impl ArticleHtml {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            with_container: true,
            ..Default::default()
        }
    }

    /// Add a `<span>label</span><a href=...>` byline block.
    pub fn byline(mut self, label: impl Into<String>, href: impl Into<String>) -> Self {
        self.bylines.push((label.into(), href.into()));
        self
    }

    /// Append raw HTML to the article body.
    pub fn body(mut self, html: impl Into<String>) -> Self {
        self.body.push_str(&html.into());
        self
    }

    /// Render the body without the `div.ArticleBody` wrapper.
    pub fn without_container(mut self) -> Self {
        self.with_container = false;
        self
    }

    pub fn build(&self) -> String {
        let bylines: String = self
            .bylines
            .iter()
            .map(|(label, href)| {
                format!(
                    "<div class=\"byline\"><span>{}</span> <a href=\"{}\">Profile</a></div>",
                    label, href
                )
            })
            .collect();

        let body = if self.with_container {
            format!("<div class=\"ArticleBody\">{}</div>", self.body)
        } else {
            format!("<div class=\"Story\">{}</div>", self.body)
        };

        format!(
            "<html><head><title>{} | Bankrate</title></head><body>{}<article>{}</article></body></html>",
            self.title, bylines, body
        )
    }
}

/// A simple page with a title and one paragraph.
pub fn simple_page(title: &str, text: &str) -> String {
    format!(
        "<html><head><title>{}</title></head><body><p>{}</p></body></html>",
        title, text
    )
}

/// A mock transport serving an article and any number of extra pages.
pub struct TestScenario {
    transport: MockTransport,
}

impl Default for TestScenario {
    fn default() -> Self {
        Self::new()
    }
}

impl TestScenario {
    pub fn new() -> Self {
        Self {
            transport: MockTransport::new(),
        }
    }

    /// Serve an HTML page with status 200.
    pub fn with_page(self, url: &str, html: impl Into<String>) -> Self {
        Self {
            transport: self.transport.with_html(url, html),
        }
    }

    /// Answer a URL with a bare status.
    pub fn with_status(self, url: &str, status: u16) -> Self {
        Self {
            transport: self.transport.with_status(url, status),
        }
    }

    pub fn transport(self) -> MockTransport {
        self.transport
    }
}
