//! Page fetching with retry, user-agent rotation and a per-run budget.

use scraper::Html;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn};

use super::dom::document_title;
use super::readability::extract_content;
use crate::error::{FetchError, FetchResult, Result};
use crate::traits::transport::{FetchRequest, RawResponse, Transport};
use crate::types::config::PipelineConfig;
use crate::types::page::{Extracted, FieldStatus, PageContent};
use crate::types::profile::SiteProfile;
use crate::types::result::{NO_TITLE_AVAILABLE, NO_TITLE_FOUND};

/// Bounds the network work of one run.
///
/// Every logical fetch (article page, contributor page, link title) takes
/// one unit; retries inside a fetch do not. Once the count or the deadline
/// is spent, fetches fail immediately without touching the network.
#[derive(Debug)]
pub struct FetchBudget {
    max_fetches: Option<usize>,
    used: AtomicUsize,
    deadline: Option<Instant>,
}

impl FetchBudget {
    pub fn new(max_fetches: Option<usize>, max_run: Option<Duration>) -> Self {
        Self {
            max_fetches,
            used: AtomicUsize::new(0),
            deadline: max_run.map(|d| Instant::now() + d),
        }
    }

    /// Budget for one run, started now.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(
            config.max_fetches,
            config.max_run_ms.map(Duration::from_millis),
        )
    }

    pub fn unlimited() -> Self {
        Self::new(None, None)
    }

    /// Take one fetch from the budget.
    pub fn try_acquire(&self) -> FetchResult<()> {
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(FetchError::BudgetExhausted);
            }
        }

        match self.max_fetches {
            None => {
                self.used.fetch_add(1, Ordering::Relaxed);
                Ok(())
            }
            Some(max) => self
                .used
                .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |used| {
                    (used < max).then_some(used + 1)
                })
                .map(|_| ())
                .map_err(|_| FetchError::BudgetExhausted),
        }
    }

    /// Fetches taken so far.
    pub fn used(&self) -> usize {
        self.used.load(Ordering::Relaxed)
    }

    /// Fetches left, or `None` when the count is unbounded.
    pub fn remaining(&self) -> Option<usize> {
        self.max_fetches
            .map(|max| max.saturating_sub(self.used()))
    }
}

/// Fetches pages and turns them into [`PageContent`].
pub struct Fetcher<T: Transport> {
    transport: T,
    config: PipelineConfig,
    profile: SiteProfile,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, config: PipelineConfig, profile: SiteProfile) -> Self {
        Self {
            transport,
            config,
            profile,
        }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Fetch a page and extract its body text and title.
    ///
    /// Never fails: on any error the value is an empty page and the status
    /// says why.
    pub async fn fetch(&self, url: &str, budget: &FetchBudget) -> Extracted<PageContent> {
        match self.try_fetch(url, budget).await {
            Ok(page) => {
                info!(
                    url = %url,
                    title = %page.title,
                    body_chars = page.body_chars(),
                    "Fetched page"
                );
                Extracted::ok(page)
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Page fetch failed");
                Extracted::with_status(PageContent::empty(url), FieldStatus::failed(e.to_string()))
            }
        }
    }

    async fn try_fetch(&self, url: &str, budget: &FetchBudget) -> Result<PageContent> {
        budget.try_acquire()?;
        let response = self.fetch_html(url).await?;
        let (body_text, title) = extract_content(&response.body, &response.url, &self.profile)?;
        Ok(PageContent::new(url, response.body, body_text, title).with_final_url(response.url))
    }

    /// GET a page, retrying until `max_attempts` is reached. Only status 200
    /// counts as success; the response keeps the URL after redirects.
    pub async fn fetch_html(&self, url: &str) -> FetchResult<RawResponse> {
        let pre_delay = self.config.pre_request_delay();
        if !pre_delay.is_zero() {
            sleep(pre_delay).await;
        }

        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            attempt += 1;

            let mut request = FetchRequest::new(url).with_timeout(self.config.timeout());
            if let Some(user_agent) = self.config.random_user_agent() {
                request = request.with_user_agent(user_agent);
            }

            let error = match self.transport.get(&request).await {
                Ok(response) if response.is_ok() => {
                    debug!(url = %url, attempt, transport = self.transport.name(), "GET succeeded");
                    return Ok(response);
                }
                Ok(response) => FetchError::Status {
                    url: url.to_string(),
                    status: response.status,
                },
                Err(e) => e,
            };

            if attempt >= max_attempts {
                return Err(error);
            }

            let delay = self.config.retry_delay();
            debug!(
                url = %url,
                attempt,
                delay_ms = delay.as_millis() as u64,
                error = %error,
                "Retrying page fetch"
            );
            sleep(delay).await;
        }
    }

    /// Title of a linked page from a single plain GET.
    ///
    /// Returns [`NO_TITLE_FOUND`] when the page loaded without a `<title>`
    /// and [`NO_TITLE_AVAILABLE`] when it could not be loaded at all.
    pub async fn fetch_title(&self, url: &str, budget: &FetchBudget) -> (String, FieldStatus) {
        if let Err(e) = budget.try_acquire() {
            debug!(url = %url, "Skipping title fetch, budget exhausted");
            return (NO_TITLE_AVAILABLE.to_string(), FieldStatus::failed(e.to_string()));
        }

        let request = FetchRequest::new(url).with_timeout(self.config.timeout());
        match self.transport.get(&request).await {
            Ok(response) if response.is_ok() => match page_title(&response.body) {
                Some(title) => (self.profile.clean_title(&title), FieldStatus::Ok),
                None => (NO_TITLE_FOUND.to_string(), FieldStatus::Absent),
            },
            Ok(response) => {
                let error = FetchError::Status {
                    url: url.to_string(),
                    status: response.status,
                };
                warn!(url = %url, status = response.status, "Title fetch got non-200");
                (NO_TITLE_AVAILABLE.to_string(), FieldStatus::failed(error.to_string()))
            }
            Err(e) => {
                warn!(url = %url, error = %e, "Title fetch failed");
                (NO_TITLE_AVAILABLE.to_string(), FieldStatus::failed(e.to_string()))
            }
        }
    }
}

fn page_title(html: &str) -> Option<String> {
    document_title(&Html::parse_document(html)).filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transports::{MockReply, MockTransport};

    const PAGE: &str = "<html><head><title>Author page | Bankrate</title></head>\
                        <body><p>Jane writes about savings.</p></body></html>";

    fn fetcher(mock: &MockTransport) -> Fetcher<MockTransport> {
        Fetcher::new(
            mock.clone(),
            PipelineConfig::without_delays(),
            SiteProfile::bankrate(),
        )
    }

    #[tokio::test]
    async fn test_fail_once_then_succeed_uses_two_attempts() {
        let url = "https://www.bankrate.com/authors/jane/";
        let mock = MockTransport::new().with_sequence(
            url,
            vec![MockReply::connection_error(), MockReply::html(PAGE)],
        );

        let page = fetcher(&mock).fetch(url, &FetchBudget::unlimited()).await;

        assert!(page.is_ok());
        assert_eq!(page.value.title, "Author page");
        assert_eq!(page.value.body_text, "Jane writes about savings.");
        assert_eq!(mock.calls_for(url), 2);
    }

    #[tokio::test]
    async fn test_redirect_keeps_final_url() {
        let url = "https://www.bankrate.com/authors/jane/";
        let moved = "https://www.bankrate.com/authors/jane-doe/";
        let mock = MockTransport::new().with_redirect(url, moved, PAGE);

        let response = fetcher(&mock).fetch_html(url).await.unwrap();
        assert_eq!(response.url, moved);

        let page = fetcher(&mock).fetch(url, &FetchBudget::unlimited()).await;
        assert!(page.is_ok());
        assert_eq!(page.value.url, url);
        assert_eq!(page.value.final_url, moved);
        assert_eq!(page.value.title, "Author page");
    }

    #[tokio::test]
    async fn test_always_failing_gives_empty_page_after_two_attempts() {
        let url = "https://www.bankrate.com/down/";
        let mock = MockTransport::new().with_status(url, 503);

        let page = fetcher(&mock).fetch(url, &FetchBudget::unlimited()).await;

        assert!(page.status.is_failed());
        assert_eq!(page.value, PageContent::empty(url));
        assert_eq!(mock.calls_for(url), 2);
    }

    #[tokio::test]
    async fn test_user_agent_and_timeout_are_sent() {
        let url = "https://www.bankrate.com/a/";
        let mock = MockTransport::new().with_html(url, PAGE);
        let fetcher = Fetcher::new(
            mock.clone(),
            PipelineConfig::without_delays()
                .with_user_agents(["UA/1"])
                .with_timeout_ms(2_500),
            SiteProfile::bankrate(),
        );

        fetcher.fetch(url, &FetchBudget::unlimited()).await;

        let calls = mock.calls();
        assert_eq!(calls[0].user_agent.as_deref(), Some("UA/1"));
        assert_eq!(calls[0].timeout, Some(Duration::from_millis(2_500)));
    }

    #[tokio::test]
    async fn test_extraction_failure_is_reported() {
        let url = "https://www.bankrate.com/untitled/";
        let mock = MockTransport::new().with_html(url, "<html><body>no title</body></html>");

        let page = fetcher(&mock).fetch(url, &FetchBudget::unlimited()).await;

        assert!(page.status.is_failed());
        assert!(page.value.raw_html.is_empty());
        assert_eq!(mock.calls_for(url), 1);
    }

    #[tokio::test]
    async fn test_title_sentinels() {
        let mock = MockTransport::new()
            .with_html("https://www.bankrate.com/t/", PAGE)
            .with_html("https://www.bankrate.com/nt/", "<html><body>x</body></html>")
            .with_status("https://www.bankrate.com/gone/", 404)
            .with_failure("https://www.bankrate.com/err/");
        let fetcher = fetcher(&mock);
        let budget = FetchBudget::unlimited();

        let (title, status) = fetcher.fetch_title("https://www.bankrate.com/t/", &budget).await;
        assert_eq!(title, "Author page");
        assert!(status.is_ok());

        let (title, status) = fetcher.fetch_title("https://www.bankrate.com/nt/", &budget).await;
        assert_eq!(title, NO_TITLE_FOUND);
        assert_eq!(status, FieldStatus::Absent);

        let (title, status) = fetcher.fetch_title("https://www.bankrate.com/gone/", &budget).await;
        assert_eq!(title, NO_TITLE_AVAILABLE);
        assert!(status.is_failed());

        let (title, _) = fetcher.fetch_title("https://www.bankrate.com/err/", &budget).await;
        assert_eq!(title, NO_TITLE_AVAILABLE);

        // Title fetches are never retried.
        assert_eq!(mock.calls_for("https://www.bankrate.com/err/"), 1);
        assert!(mock.calls().iter().all(|c| c.user_agent.is_none()));
    }

    #[tokio::test]
    async fn test_exhausted_budget_skips_network() {
        let url = "https://www.bankrate.com/a/";
        let mock = MockTransport::new().with_html(url, PAGE);
        let fetcher = fetcher(&mock);
        let budget = FetchBudget::new(Some(1), None);

        assert!(fetcher.fetch(url, &budget).await.is_ok());
        let second = fetcher.fetch(url, &budget).await;
        let (title, _) = fetcher.fetch_title(url, &budget).await;

        assert_eq!(
            second.status,
            FieldStatus::failed(
                crate::error::ExtractionError::from(FetchError::BudgetExhausted).to_string()
            )
        );
        assert_eq!(title, NO_TITLE_AVAILABLE);
        assert_eq!(mock.call_count(), 1);
        assert_eq!(budget.remaining(), Some(0));
    }

    #[test]
    fn test_budget_deadline() {
        let budget = FetchBudget::new(None, Some(Duration::ZERO));
        assert!(matches!(
            budget.try_acquire(),
            Err(FetchError::BudgetExhausted)
        ));
        assert_eq!(budget.remaining(), None);
    }
}
