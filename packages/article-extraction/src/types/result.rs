//! Extraction output types.
//!
//! Field names on the serialized form are a contract with prompt templates
//! and any UI reading the JSON: `article_title`, `article_text`,
//! `article_internal_links`, `article_headers_info`, `writer_page_text_1`,
//! `editor_page_text_1`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use super::page::{Extracted, FieldStatus, PageContent};

/// Role a byline link plays for the article.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ContributorRole {
    Writer,
    Editor,
    Reviewer,
}

impl ContributorRole {
    /// Lowercase key used in positional field names (`writer_page_text_1`).
    pub fn key(&self) -> &'static str {
        match self {
            Self::Writer => "writer",
            Self::Editor => "editor",
            Self::Reviewer => "reviewer",
        }
    }
}

impl fmt::Display for ContributorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Writer => write!(f, "Writer"),
            Self::Editor => write!(f, "Editor"),
            Self::Reviewer => write!(f, "Reviewer"),
        }
    }
}

/// A byline link and the text of the page it points to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContributorLink {
    pub url: String,
    #[serde(rename = "link_type")]
    pub role: ContributorRole,
    pub body_text: String,
    pub status: FieldStatus,
}

/// Heading level of an outline entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingLevel {
    H2,
    H3,
    H4,
}

impl HeadingLevel {
    /// Map an element name to a level; other tags are not outline headings.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "h2" => Some(Self::H2),
            "h3" => Some(Self::H3),
            "h4" => Some(Self::H4),
            _ => None,
        }
    }
}

/// One heading of the article body and the text under it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderSection {
    /// 1-based position in document order
    #[serde(rename = "header_order")]
    pub order: usize,
    #[serde(rename = "header_title")]
    pub title: String,
    #[serde(rename = "header_type")]
    pub level: HeadingLevel,
    #[serde(rename = "header_body_text")]
    pub body_text: String,
}

/// Title given to a linked page whose `<title>` element is missing.
pub const NO_TITLE_FOUND: &str = "No Title Found";

/// Title given to a linked page that could not be fetched.
pub const NO_TITLE_AVAILABLE: &str = "No Title Available";

/// An in-domain link inside the article body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InternalLink {
    #[serde(rename = "internal_link_url")]
    pub url: String,
    pub anchor_text: String,
    #[serde(rename = "title_of_linked_page")]
    pub linked_page_title: String,
    pub status: FieldStatus,
}

/// Per-group status of an extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultStatus {
    pub page: FieldStatus,
    pub contributors: FieldStatus,
    pub headers: FieldStatus,
    pub internal_links: FieldStatus,
}

impl ResultStatus {
    /// True when every group either succeeded or was legitimately absent.
    pub fn is_complete(&self) -> bool {
        [
            &self.page,
            &self.contributors,
            &self.headers,
            &self.internal_links,
        ]
        .iter()
        .all(|s| !s.is_failed())
    }
}

/// Everything extracted for one article URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub article_url: String,
    pub article_title: String,
    pub article_text: String,
    pub article_headers_info: Vec<HeaderSection>,
    pub article_internal_links: Vec<InternalLink>,
    pub contributors: Vec<ContributorLink>,
    pub writer_page_text_1: Option<String>,
    pub editor_page_text_1: Option<String>,
    pub status: ResultStatus,
}

impl ExtractionResult {
    /// Assemble the aggregate from the outputs of each stage.
    pub fn assemble(
        page: Extracted<PageContent>,
        contributors: Extracted<Vec<ContributorLink>>,
        headers: Extracted<Vec<HeaderSection>>,
        internal_links: Extracted<Vec<InternalLink>>,
    ) -> Self {
        let writer_page_text_1 = first_text(&contributors.value, ContributorRole::Writer);
        let editor_page_text_1 = first_text(&contributors.value, ContributorRole::Editor);

        Self {
            article_url: page.value.url,
            article_title: page.value.title,
            article_text: page.value.body_text,
            article_headers_info: headers.value,
            article_internal_links: internal_links.value,
            contributors: contributors.value,
            writer_page_text_1,
            editor_page_text_1,
            status: ResultStatus {
                page: page.status,
                contributors: contributors.status,
                headers: headers.status,
                internal_links: internal_links.status,
            },
        }
    }

    /// Result for an article page that could not be fetched or parsed.
    pub fn failed(url: impl Into<String>, reason: impl Into<String>) -> Self {
        const SKIPPED: &str = "article page unavailable";
        Self::assemble(
            Extracted::with_status(PageContent::empty(url), FieldStatus::failed(reason)),
            Extracted::failed(SKIPPED),
            Extracted::failed(SKIPPED),
            Extracted::failed(SKIPPED),
        )
    }

    /// Positional fields in discovery order: `writer_page_url_1`,
    /// `writer_page_text_1`, `editor_page_url_1`, ...
    pub fn contributor_fields(&self) -> Vec<(String, String)> {
        let mut counters: HashMap<ContributorRole, usize> = HashMap::new();
        let mut fields = Vec::with_capacity(self.contributors.len() * 2);

        for contributor in &self.contributors {
            let n = counters.entry(contributor.role).or_insert(0);
            *n += 1;
            let key = contributor.role.key();
            fields.push((format!("{}_page_url_{}", key, n), contributor.url.clone()));
            fields.push((
                format!("{}_page_text_{}", key, n),
                contributor.body_text.clone(),
            ));
        }

        fields
    }
}

fn first_text(contributors: &[ContributorLink], role: ContributorRole) -> Option<String> {
    contributors
        .iter()
        .find(|c| c.role == role)
        .map(|c| c.body_text.clone())
}
