//! reqwest-backed transport.

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use tracing::{debug, warn};
use url::Url;

use crate::error::{FetchError, FetchResult};
use crate::traits::transport::{FetchRequest, RawResponse, Transport};
use crate::types::config::PipelineConfig;

/// Transport that performs real HTTP requests.
///
/// # Example
///
/// ```rust,ignore
/// use article_extraction::{HttpTransport, PipelineConfig};
///
/// let transport = HttpTransport::new(&PipelineConfig::default())?;
/// ```
#[derive(Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    /// Build a client from the pipeline configuration.
    ///
    /// Honors `timeout_ms` and `accept_invalid_certs`.
    pub fn new(config: &PipelineConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(ACCEPT_LANGUAGE, HeaderValue::from_static("en-US,en;q=0.5"));

        if config.accept_invalid_certs {
            warn!("TLS certificate verification disabled for article fetches");
        }

        let client = reqwest::Client::builder()
            .timeout(config.timeout())
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .default_headers(headers)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self { client })
    }

    fn validate_url(url: &str) -> FetchResult<Url> {
        let parsed = Url::parse(url).map_err(|_| FetchError::InvalidUrl {
            url: url.to_string(),
        })?;
        match parsed.scheme() {
            "http" | "https" => Ok(parsed),
            _ => Err(FetchError::InvalidUrl {
                url: url.to_string(),
            }),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, request: &FetchRequest) -> FetchResult<RawResponse> {
        let url = Self::validate_url(&request.url)?;

        let mut builder = self.client.get(url);
        if let Some(user_agent) = &request.user_agent {
            builder = builder.header(USER_AGENT, user_agent);
        }
        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        debug!(url = %request.url, "HTTP GET");
        let response = builder.send().await.map_err(|e| {
            if e.is_timeout() {
                FetchError::Timeout {
                    url: request.url.clone(),
                }
            } else {
                FetchError::Http(Box::new(e))
            }
        })?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();
        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Http(Box::new(e)))?;

        debug!(
            url = %request.url,
            final_url = %final_url,
            status,
            content_length = body.len(),
            "HTTP GET finished"
        );

        Ok(RawResponse::new(final_url, status, body))
    }

    fn name(&self) -> &str {
        "http"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(HttpTransport::validate_url("https://www.bankrate.com/").is_ok());
        assert!(HttpTransport::validate_url("http://example.com/a?b=c").is_ok());
        assert!(matches!(
            HttpTransport::validate_url("ftp://example.com/file"),
            Err(FetchError::InvalidUrl { .. })
        ));
        assert!(matches!(
            HttpTransport::validate_url("not a url"),
            Err(FetchError::InvalidUrl { .. })
        ));
    }

    #[tokio::test]
    async fn test_invalid_url_fails_without_network() {
        let transport = HttpTransport::new(&PipelineConfig::default()).unwrap();
        let result = transport.get(&FetchRequest::new("file:///etc/hosts")).await;
        assert!(matches!(result, Err(FetchError::InvalidUrl { .. })));
    }
}
