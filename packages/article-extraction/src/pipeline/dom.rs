//! DOM helpers shared by the extractors.

use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

use crate::error::{ExtractionError, Result};
use crate::types::profile::SiteProfile;

pub(crate) static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("title").expect("valid title selector"));

pub(crate) static ANCHOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[href]").expect("valid anchor selector"));

pub(crate) static HEADINGS: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, h4").expect("valid heading selector"));

/// A site profile with its selectors parsed once.
#[derive(Debug, Clone)]
pub struct CompiledProfile {
    pub profile: SiteProfile,
    pub body_container: Selector,
    pub byline_label: Selector,
}

impl CompiledProfile {
    pub fn new(profile: SiteProfile) -> Result<Self> {
        let body_container = parse_selector(&profile.body_container)?;
        let byline_label = parse_selector(&profile.byline_label_selector)?;
        Ok(Self {
            profile,
            body_container,
            byline_label,
        })
    }

    /// First element matching the body container selector.
    pub fn find_body<'a>(&self, document: &'a Html) -> Option<ElementRef<'a>> {
        document.select(&self.body_container).next()
    }
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| ExtractionError::InvalidSelector {
        selector: css.to_string(),
        reason: e.to_string(),
    })
}

/// Collapse runs of whitespace into single spaces and trim.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Text of an element: each text node trimmed, empty ones dropped, joined by
/// single spaces.
pub fn element_text(element: &ElementRef) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Text of the `<title>` element, if the document has one.
pub fn document_title(document: &Html) -> Option<String> {
    document
        .select(&TITLE)
        .next()
        .map(|el| collapse_whitespace(&el.text().collect::<String>()))
}
