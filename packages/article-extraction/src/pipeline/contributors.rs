//! Byline discovery and contributor page fetching.

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

use super::dom::{element_text, CompiledProfile, ANCHOR};
use super::fetch::{FetchBudget, Fetcher};
use crate::traits::transport::Transport;
use crate::types::page::{Extracted, FieldStatus};
use crate::types::result::{ContributorLink, ContributorRole};

/// A byline link waiting to be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContributorTarget {
    pub url: Url,
    pub role: ContributorRole,
}

/// Find byline links on an article page.
///
/// Roles are scanned in profile order. A URL seen under an earlier role is
/// not repeated under a later one.
pub fn find_contributor_targets(
    document: &Html,
    page_url: &Url,
    compiled: &CompiledProfile,
) -> Vec<ContributorTarget> {
    let profile = &compiled.profile;
    let mut seen = HashSet::new();
    let mut targets = Vec::new();

    for role_label in &profile.contributor_labels {
        for label in document.select(&compiled.byline_label) {
            if !element_text(&label).contains(role_label.label.as_str()) {
                continue;
            }
            let Some(container) = byline_container(&label, &profile.byline_container_tags) else {
                continue;
            };

            for anchor in container.select(&ANCHOR) {
                let Some(href) = anchor.value().attr("href") else {
                    continue;
                };
                let Some(url) = profile.resolve_internal(page_url, href) else {
                    continue;
                };
                if seen.insert(url.to_string()) {
                    targets.push(ContributorTarget {
                        url,
                        role: role_label.role,
                    });
                } else {
                    debug!(url = %url, role = %role_label.role, "Contributor link already seen");
                }
            }
        }
    }

    targets
}

fn byline_container<'a>(label: &ElementRef<'a>, tags: &[String]) -> Option<ElementRef<'a>> {
    label
        .ancestors()
        .filter_map(ElementRef::wrap)
        .find(|el| tags.iter().any(|t| t.eq_ignore_ascii_case(el.value().name())))
}

/// Fetch every contributor page in order.
///
/// The group status is `Failed` when any page failed; each link keeps its
/// own status either way.
pub async fn fetch_contributors<T: Transport>(
    fetcher: &Fetcher<T>,
    targets: Vec<ContributorTarget>,
    budget: &FetchBudget,
) -> Extracted<Vec<ContributorLink>> {
    let mut links = Vec::with_capacity(targets.len());

    for target in targets {
        let page = fetcher.fetch(target.url.as_str(), budget).await;
        links.push(ContributorLink {
            url: target.url.into(),
            role: target.role,
            body_text: page.value.body_text,
            status: page.status,
        });
    }

    let failed = links.iter().filter(|l| l.status.is_failed()).count();
    let status = if failed == 0 {
        FieldStatus::Ok
    } else {
        FieldStatus::failed(format!(
            "{} of {} contributor pages failed",
            failed,
            links.len()
        ))
    };

    Extracted::with_status(links, status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::profile::SiteProfile;

    fn compiled() -> CompiledProfile {
        CompiledProfile::new(SiteProfile::bankrate()).unwrap()
    }

    fn page_url() -> Url {
        Url::parse("https://www.bankrate.com/banking/cds/cd-vs-annuity/").unwrap()
    }

    #[test]
    fn test_roles_in_order_with_relative_links() {
        let html = Html::parse_document(
            r#"<div class="byline">
                 <span>Edited by</span> <a href="/authors/ed/">Ed</a>
               </div>
               <div class="byline">
                 <span>Written by</span> <a href="https://www.bankrate.com/authors/jane/">Jane</a>
                 <a href="https://twitter.com/jane">Twitter</a>
               </div>"#,
        );

        let targets = find_contributor_targets(&html, &page_url(), &compiled());

        assert_eq!(
            targets,
            vec![
                ContributorTarget {
                    url: Url::parse("https://www.bankrate.com/authors/jane/").unwrap(),
                    role: ContributorRole::Writer,
                },
                ContributorTarget {
                    url: Url::parse("https://www.bankrate.com/authors/ed/").unwrap(),
                    role: ContributorRole::Editor,
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_url_keeps_first_role() {
        let html = Html::parse_document(
            r#"<div>
                 <span>Written by</span><a href="/authors/sam/">Sam</a>
                 <span>Edited by</span><a href="/authors/sam/">Sam</a>
               </div>"#,
        );

        let targets = find_contributor_targets(&html, &page_url(), &compiled());

        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].role, ContributorRole::Writer);
    }

    #[test]
    fn test_label_without_container_is_ignored() {
        let html = Html::parse_document(
            r#"<section><span>Written by</span><a href="/authors/x/">X</a></section>"#,
        );
        assert!(find_contributor_targets(&html, &page_url(), &compiled()).is_empty());
    }

    #[test]
    fn test_custom_byline_container_tags() {
        let html = Html::parse_document(
            r#"<section><span>Written by</span><a href="/authors/x/">X</a></section>"#,
        );
        let compiled = CompiledProfile::new(
            SiteProfile::bankrate().with_byline_container_tags(["section"]),
        )
        .unwrap();

        let targets = find_contributor_targets(&html, &page_url(), &compiled);

        assert_eq!(targets.len(), 1);
        assert_eq!(
            targets[0].url.as_str(),
            "https://www.bankrate.com/authors/x/"
        );
    }
}
