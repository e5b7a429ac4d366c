//! Site-Profiled Article Extraction Library
//!
//! Given the URL of a published article, fetch the page and pull out the
//! material an editor needs to review or rewrite it: clean body text and
//! title, the heading outline with the text under each heading, in-domain
//! links with the titles of the pages they point to, and the text of the
//! writer/editor/reviewer pages linked from the byline.
//!
//! # Design
//!
//! - All site-specific markup rules live in a [`SiteProfile`]
//! - The network sits behind the [`Transport`] trait (reqwest in production,
//!   [`MockTransport`] in tests)
//! - A run never fails: every field group carries a [`FieldStatus`] so
//!   "empty" and "failed" stay distinguishable
//! - Each run draws its fetches from a bounded [`FetchBudget`]
//!
//! # Usage
//!
//! ```rust,ignore
//! use article_extraction::{Pipeline, PipelineConfig, PromptVariables, SiteProfile};
//!
//! let pipeline = Pipeline::http(PipelineConfig::default(), SiteProfile::bankrate())?;
//! let result = pipeline.run("https://www.bankrate.com/banking/cds/cd-vs-annuity/").await;
//!
//! let prompt = PromptVariables::from_result(&result)
//!     .with("selected_topic", "retirement income")
//!     .render("Rewrite {article_title} for {selected_topic}:\n{article_text}")?;
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Transport and completion abstractions
//! - [`types`] - Configuration, site profiles and result types
//! - [`pipeline`] - Fetcher, extractors and the run orchestration
//! - [`transports`] - Transport implementations (HTTP, mock)
//! - [`prompt`] - Prompt variables and template rendering
//! - [`testing`] - Mock implementations and HTML builders for tests

pub mod error;
pub mod pipeline;
pub mod prompt;
pub mod testing;
pub mod traits;
pub mod transports;
pub mod types;

// Re-export core types at crate root
pub use error::{CompletionError, ExtractionError, FetchError, PromptError};
pub use traits::{
    completion::{CompletionClient, CompletionRequest},
    transport::{FetchRequest, RawResponse, Transport},
};
pub use types::{
    config::PipelineConfig,
    page::{Extracted, FieldStatus, PageContent},
    profile::{RoleLabel, SiteProfile},
    result::{
        ContributorLink, ContributorRole, ExtractionResult, HeaderSection, HeadingLevel,
        InternalLink, ResultStatus, NO_TITLE_AVAILABLE, NO_TITLE_FOUND,
    },
};

// Re-export pipeline components
pub use pipeline::{extract_content, CompiledProfile, FetchBudget, Fetcher, Pipeline};

// Re-export prompt helpers
pub use prompt::{truncate_text, PromptVariables};

// Re-export transports
pub use transports::{HttpTransport, MockReply, MockTransport};
