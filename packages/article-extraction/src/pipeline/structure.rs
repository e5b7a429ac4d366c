//! Article outline and in-domain links, scoped to the body container.

use scraper::{ElementRef, Html, Node};
use tracing::debug;
use url::Url;

use super::dom::{collapse_whitespace, element_text, CompiledProfile, ANCHOR, HEADINGS};
use super::fetch::{FetchBudget, Fetcher};
use crate::traits::transport::Transport;
use crate::types::page::{Extracted, FieldStatus};
use crate::types::result::{HeaderSection, HeadingLevel, InternalLink};

/// Outline of the article body: one section per `h2`/`h3`/`h4`.
///
/// A section's body is every sibling node after its heading up to the next
/// heading in the list (or the end of the parent). Returns `None` when the
/// page has no body container.
pub fn extract_headers(document: &Html, compiled: &CompiledProfile) -> Option<Vec<HeaderSection>> {
    let body = compiled.find_body(document)?;
    let headings: Vec<ElementRef> = body.select(&HEADINGS).collect();
    let mut sections = Vec::with_capacity(headings.len());

    for (i, heading) in headings.iter().enumerate() {
        let Some(level) = HeadingLevel::from_tag(heading.value().name()) else {
            continue;
        };
        let next_id = headings.get(i + 1).map(|h| h.id());

        let mut pieces = Vec::new();
        for sibling in heading.next_siblings() {
            if Some(sibling.id()) == next_id {
                break;
            }
            match sibling.value() {
                Node::Text(text) => pieces.push(text.trim().to_string()),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(sibling) {
                        pieces.push(element_text(&el));
                    }
                }
                _ => {}
            }
        }

        sections.push(HeaderSection {
            order: sections.len() + 1,
            title: collapse_whitespace(&element_text(heading)),
            level,
            body_text: collapse_whitespace(&pieces.join(" ")),
        });
    }

    Some(sections)
}

/// An in-domain anchor waiting for its title fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    pub url: Url,
    pub anchor_text: String,
}

/// Every anchor in the body container whose target is on the profile domain,
/// in document order. Returns `None` when the page has no body container.
pub fn find_internal_anchors(
    document: &Html,
    page_url: &Url,
    compiled: &CompiledProfile,
) -> Option<Vec<LinkTarget>> {
    let body = compiled.find_body(document)?;

    let targets = body
        .select(&ANCHOR)
        .filter_map(|anchor| {
            let href = anchor.value().attr("href")?;
            let url = compiled.profile.resolve_internal(page_url, href)?;
            Some(LinkTarget {
                url,
                anchor_text: collapse_whitespace(&element_text(&anchor)),
            })
        })
        .collect();

    Some(targets)
}

/// Look up the title of every linked page, one plain GET each.
pub async fn fetch_internal_links<T: Transport>(
    fetcher: &Fetcher<T>,
    targets: Vec<LinkTarget>,
    budget: &FetchBudget,
) -> Extracted<Vec<InternalLink>> {
    let mut links = Vec::with_capacity(targets.len());

    for target in targets {
        let (title, status) = fetcher.fetch_title(target.url.as_str(), budget).await;
        debug!(url = %target.url, title = %title, "Resolved internal link title");
        links.push(InternalLink {
            url: target.url.into(),
            anchor_text: target.anchor_text,
            linked_page_title: title,
            status,
        });
    }

    let failed = links.iter().filter(|l| l.status.is_failed()).count();
    let status = if failed == 0 {
        FieldStatus::Ok
    } else {
        FieldStatus::failed(format!(
            "{} of {} link titles unavailable",
            failed,
            links.len()
        ))
    };

    Extracted::with_status(links, status)
}
