//! The extraction pipeline.
//!
//! One run fetches the article, then works through byline links, the body
//! outline and in-domain link titles. Every fetch in a run is awaited in
//! turn and drawn from the same [`FetchBudget`].
//!
//! # Example
//!
//! ```rust,ignore
//! use article_extraction::{HttpTransport, Pipeline, PipelineConfig, SiteProfile};
//!
//! let config = PipelineConfig::default();
//! let pipeline = Pipeline::new(HttpTransport::new(&config)?, config, SiteProfile::bankrate())?;
//! let result = pipeline.run("https://www.bankrate.com/banking/cds/cd-vs-annuity/").await;
//! println!("{}", serde_json::to_string_pretty(&result)?);
//! ```

pub mod contributors;
pub mod dom;
pub mod fetch;
pub mod readability;
pub mod structure;

pub use contributors::{fetch_contributors, find_contributor_targets, ContributorTarget};
pub use dom::CompiledProfile;
pub use fetch::{FetchBudget, Fetcher};
pub use readability::extract_content;
pub use structure::{extract_headers, fetch_internal_links, find_internal_anchors, LinkTarget};

use scraper::Html;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{FetchError, Result};
use crate::traits::transport::Transport;
use crate::transports::HttpTransport;
use crate::types::config::PipelineConfig;
use crate::types::page::{Extracted, FieldStatus};
use crate::types::profile::SiteProfile;
use crate::types::result::{ExtractionResult, HeaderSection};

/// Everything the later stages need from the article HTML.
struct PageOutline {
    contributors: Vec<ContributorTarget>,
    headers: Option<Vec<HeaderSection>>,
    links: Option<Vec<LinkTarget>>,
}

impl PageOutline {
    fn parse(html: &str, page_url: &Url, compiled: &CompiledProfile) -> Self {
        let document = Html::parse_document(html);
        Self {
            contributors: find_contributor_targets(&document, page_url, compiled),
            headers: extract_headers(&document, compiled),
            links: find_internal_anchors(&document, page_url, compiled),
        }
    }
}

/// Article extraction for one site profile.
pub struct Pipeline<T: Transport> {
    fetcher: Fetcher<T>,
    compiled: CompiledProfile,
}

impl<T: Transport> Pipeline<T> {
    /// Build a pipeline. Fails if the profile holds an invalid selector.
    pub fn new(transport: T, config: PipelineConfig, profile: SiteProfile) -> Result<Self> {
        let compiled = CompiledProfile::new(profile.clone())?;
        Ok(Self {
            fetcher: Fetcher::new(transport, config, profile),
            compiled,
        })
    }

    pub fn profile(&self) -> &SiteProfile {
        &self.compiled.profile
    }

    pub fn config(&self) -> &PipelineConfig {
        self.fetcher.config()
    }

    /// Extract everything for one article URL.
    ///
    /// Never fails. Problems are reported through the result's `status`.
    pub async fn run(&self, url: &str) -> ExtractionResult {
        let profile = self.profile();
        let budget = FetchBudget::from_config(self.config());

        info!(url = %url, profile = %profile.name, "Starting extraction run");

        let page_url = match Url::parse(url) {
            Ok(parsed) => parsed,
            Err(_) => {
                let error = FetchError::InvalidUrl {
                    url: url.to_string(),
                };
                warn!(url = %url, "Rejecting unparseable article URL");
                return ExtractionResult::failed(url, error.to_string());
            }
        };
        if !profile.matches_url(&page_url) {
            warn!(url = %url, domain = %profile.domain, "Article URL is outside the profile domain");
        }

        let page = self.fetcher.fetch(url, &budget).await;
        if let FieldStatus::Failed { reason } = &page.status {
            return ExtractionResult::failed(url, reason.clone());
        }

        // Relative links resolve against where the page was actually served.
        let base_url = match Url::parse(&page.value.final_url) {
            Ok(final_url) if final_url != page_url => {
                debug!(url = %url, final_url = %final_url, "Article was redirected");
                final_url
            }
            _ => page_url,
        };
        let outline = PageOutline::parse(&page.value.raw_html, &base_url, &self.compiled);

        let contributors = fetch_contributors(&self.fetcher, outline.contributors, &budget).await;

        let headers = match outline.headers {
            Some(sections) => Extracted::ok(sections),
            None => Extracted::absent(),
        };

        let internal_links = match outline.links {
            Some(targets) => fetch_internal_links(&self.fetcher, targets, &budget).await,
            None => Extracted::absent(),
        };

        let result = ExtractionResult::assemble(page, contributors, headers, internal_links);

        info!(
            url = %url,
            contributors = result.contributors.len(),
            headers = result.article_headers_info.len(),
            internal_links = result.article_internal_links.len(),
            fetches = budget.used(),
            complete = result.status.is_complete(),
            "Extraction run finished"
        );

        result
    }
}

impl Pipeline<HttpTransport> {
    /// Pipeline over a fresh reqwest client built from `config`.
    pub fn http(config: PipelineConfig, profile: SiteProfile) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Self::new(transport, config, profile)
    }
}
