//! Site profiles: the markup assumptions for one target site.
//!
//! Every site-specific rule the extractors rely on lives here, so the same
//! pipeline can be pointed at another site by swapping the profile.

use serde::{Deserialize, Serialize};
use url::Url;

use super::result::ContributorRole;

/// Byline label text for one contributor role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleLabel {
    pub role: ContributorRole,
    pub label: String,
}

impl RoleLabel {
    pub fn new(role: ContributorRole, label: impl Into<String>) -> Self {
        Self {
            role,
            label: label.into(),
        }
    }
}

/// Markup rules for a single site.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteProfile {
    /// Human-readable profile name (for logging)
    pub name: String,

    /// Registrable domain; links on it or its subdomains count as internal
    pub domain: String,

    /// CSS selector for the article body container
    pub body_container: String,

    /// Branding suffixes removed from the end of page titles
    #[serde(default)]
    pub title_suffixes: Vec<String>,

    /// CSS selector for elements that may hold a byline label
    #[serde(default = "default_byline_label_selector")]
    pub byline_label_selector: String,

    /// Tag names accepted as the byline's enclosing container
    #[serde(default = "default_byline_container_tags")]
    pub byline_container_tags: Vec<String>,

    /// Label text per role, scanned in this order
    #[serde(default = "default_contributor_labels")]
    pub contributor_labels: Vec<RoleLabel>,
}

fn default_byline_label_selector() -> String {
    "span".to_string()
}

fn default_byline_container_tags() -> Vec<String> {
    vec!["div".to_string()]
}

fn default_contributor_labels() -> Vec<RoleLabel> {
    vec![
        RoleLabel::new(ContributorRole::Writer, "Written by"),
        RoleLabel::new(ContributorRole::Editor, "Edited by"),
        RoleLabel::new(ContributorRole::Reviewer, "Reviewed by"),
    ]
}

impl Default for SiteProfile {
    fn default() -> Self {
        Self::bankrate()
    }
}

impl SiteProfile {
    /// Create a profile for a domain with the default byline rules.
    pub fn new(
        name: impl Into<String>,
        domain: impl Into<String>,
        body_container: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            domain: domain.into(),
            body_container: body_container.into(),
            title_suffixes: Vec::new(),
            byline_label_selector: default_byline_label_selector(),
            byline_container_tags: default_byline_container_tags(),
            contributor_labels: default_contributor_labels(),
        }
    }

    /// Profile for bankrate.com article pages.
    pub fn bankrate() -> Self {
        Self::new("bankrate", "bankrate.com", "div.ArticleBody")
            .with_title_suffix("| Bankrate")
            .with_title_suffix("- CreditCards.com")
    }

    /// Add a branding suffix to strip from titles.
    pub fn with_title_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.title_suffixes.push(suffix.into());
        self
    }

    /// Override the body container selector.
    pub fn with_body_container(mut self, selector: impl Into<String>) -> Self {
        self.body_container = selector.into();
        self
    }

    /// Override the byline container tags.
    pub fn with_byline_container_tags(
        mut self,
        tags: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.byline_container_tags = tags.into_iter().map(|t| t.into()).collect();
        self
    }

    /// Check whether a host belongs to this profile's domain.
    pub fn matches_host(&self, host: &str) -> bool {
        let host = host.to_ascii_lowercase();
        let domain = self.domain.to_ascii_lowercase();
        host == domain || host.ends_with(&format!(".{}", domain))
    }

    /// Check whether a URL belongs to this profile's domain.
    pub fn matches_url(&self, url: &Url) -> bool {
        matches!(url.scheme(), "http" | "https")
            && url.host_str().map(|h| self.matches_host(h)).unwrap_or(false)
    }

    /// Resolve an `href` against the page URL and keep it only if it stays
    /// on this profile's domain.
    pub fn resolve_internal(&self, base: &Url, href: &str) -> Option<Url> {
        let href = href.trim();
        if href.is_empty()
            || href.starts_with('#')
            || href.starts_with("javascript:")
            || href.starts_with("mailto:")
            || href.starts_with("tel:")
        {
            return None;
        }
        let resolved = base.join(href).ok()?;
        self.matches_url(&resolved).then_some(resolved)
    }

    /// Remove known branding suffixes and surrounding whitespace from a title.
    pub fn clean_title(&self, title: &str) -> String {
        let mut cleaned = title.trim();
        loop {
            let before = cleaned.len();
            for suffix in &self.title_suffixes {
                if let Some(stripped) = cleaned.strip_suffix(suffix.as_str()) {
                    cleaned = stripped.trim_end();
                }
            }
            if cleaned.len() == before {
                break;
            }
        }
        cleaned.trim().to_string()
    }
}
