//! Main-content extraction.
//!
//! The primary pass hands the page to the `readability` crate and keeps the
//! paragraph-level blocks of the node it settles on. Its scorer only looks at
//! class and id names, so `nav`, `footer` and `aside` elements are removed
//! before scoring. When that pass errors or keeps no blocks, the fallback
//! strips `script`/`style` and takes every remaining text node.

use scraper::{ElementRef, Html, Node, Selector};
use std::sync::LazyLock;
use tracing::debug;
use url::Url;

use super::dom::{collapse_whitespace, document_title, element_text};
use crate::error::{ExtractionError, Result};
use crate::types::profile::SiteProfile;

/// Page chrome dropped before scoring.
static CHROME: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("nav, footer, aside, form, noscript, template")
        .expect("valid chrome selector")
});

static BLOCKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("p, h1, h2, h3, h4, h5, h6, li, blockquote, pre")
        .expect("valid block selector")
});

const BLOCK_TAGS: &[&str] = &[
    "p", "h1", "h2", "h3", "h4", "h5", "h6", "li", "blockquote", "pre",
];

/// Extract `(body_text, title)` from raw HTML.
///
/// Runs the readability pass and falls back to plain DOM text. Fails only
/// when the fallback cannot find a `<title>` either.
pub fn extract_content(html: &str, url: &str, profile: &SiteProfile) -> Result<(String, String)> {
    match readable_content(html, url, profile) {
        Ok(content) => Ok(content),
        Err(reason) => {
            debug!(url = %url, reason = %reason, "Readability pass failed, using DOM fallback");
            let document = Html::parse_document(html);
            fallback_content(&document, profile).ok_or_else(|| ExtractionError::Parse {
                url: url.to_string(),
                reason: format!("{}; fallback found no <title>", reason),
            })
        }
    }
}

fn readable_content(
    html: &str,
    url: &str,
    profile: &SiteProfile,
) -> std::result::Result<(String, String), String> {
    let base_url = Url::parse(url).map_err(|e| format!("invalid page url: {}", e))?;
    let cleaned = strip_chrome(html);

    let product = ::readability::extractor::extract(&mut cleaned.as_bytes(), &base_url)
        .map_err(|e| format!("readability error: {:?}", e))?;

    let title = profile.clean_title(&collapse_whitespace(&product.title));
    if title.is_empty() {
        return Err("no title metadata".to_string());
    }

    let body = block_text(&Html::parse_fragment(&product.content));
    if body.is_empty() {
        return Err("readability kept no readable blocks".to_string());
    }

    Ok((body, title))
}

/// Serialize `html` again without its navigation and other chrome.
fn strip_chrome(html: &str) -> String {
    let mut document = Html::parse_document(html);
    let chrome: Vec<_> = document.select(&CHROME).map(|el| el.id()).collect();
    for id in chrome {
        if let Some(mut node) = document.tree.get_mut(id) {
            node.detach();
        }
    }
    document.html()
}

/// Paragraph-level text, one block per line. Blocks nested in another block
/// are skipped since their text is already part of the outer one.
fn block_text(content: &Html) -> String {
    content
        .select(&BLOCKS)
        .filter(|block| !nested_in_block(block))
        .map(|block| collapse_whitespace(&element_text(&block)))
        .filter(|t| !t.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn nested_in_block(block: &ElementRef) -> bool {
    block
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|el| BLOCK_TAGS.contains(&el.value().name()))
}

fn fallback_content(document: &Html, profile: &SiteProfile) -> Option<(String, String)> {
    let title = document_title(document)?;
    let body = visible_text(document.root_element());
    Some((body, profile.clean_title(&title)))
}

/// Every text node outside `script`/`style`, trimmed and space-joined.
fn visible_text(root: ElementRef) -> String {
    let mut pieces = Vec::new();

    for node in root.descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };
        let hidden = node.ancestors().any(|a| {
            a.value()
                .as_element()
                .map(|e| matches!(e.name(), "script" | "style"))
                .unwrap_or(false)
        });
        let text = text.trim();
        if !hidden && !text.is_empty() {
            pieces.push(text);
        }
    }

    pieces.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    const ARTICLE: &str = r#"
        <html>
          <head>
            <title>Fixed annuities vs. CDs | Bankrate</title>
            <script>var tracking = "do not include";</script>
          </head>
          <body>
            <nav class="site-nav"><a href="/">Home</a><a href="/banking/">Banking</a></nav>
            <article>
              <h1>Fixed annuities vs. CDs</h1>
              <p>Both fixed annuities and certificates of deposit offer a guaranteed rate of return for savers, and both lock your money up for a set term.</p>
              <p>Annuities are issued by insurers, while CDs are issued by banks and credit unions, so the protections behind them differ.</p>
              <script>window.ad = "nope";</script>
            </article>
            <footer class="footer">Copyright and legal links</footer>
          </body>
        </html>
    "#;

    #[test]
    fn test_primary_pass_keeps_article_paragraphs() {
        let (body, title) =
            extract_content(ARTICLE, "https://www.bankrate.com/a", &SiteProfile::bankrate())
                .unwrap();

        assert_eq!(title, "Fixed annuities vs. CDs");
        assert!(body.contains("Both fixed annuities and certificates of deposit"));
        assert!(body.contains("Annuities are issued by insurers"));
        assert!(!body.contains("Home"));
        assert!(!body.contains("Copyright"));
        assert!(!body.contains("nope"));
        assert!(!body.contains("tracking"));
    }

    #[test]
    fn test_share_wrapper_class_keeps_body() {
        let first = "Savers compare high-yield savings accounts, money market accounts and \
                     certificates of deposit by looking at the rate, the minimum deposit, the \
                     fees and how quickly they can reach their cash when an emergency comes up.";
        let second = "Online banks usually pay more than branch banks, because they carry lower \
                      overhead, and many of them waive monthly fees, minimum balances and \
                      transfer charges for customers who set up direct deposit.";
        let html = format!(
            "<html><head><title>Best savings accounts | Bankrate</title></head><body>\
             <div class=\"ArticleBody article-share-wrapper\"><p>{}</p><p>{}</p></div>\
             <div class=\"promo\"><p>Sign up for our newsletter to get weekly rate alerts.</p></div>\
             </body></html>",
            first, second
        );

        let (body, title) =
            extract_content(&html, "https://www.bankrate.com/s", &SiteProfile::bankrate()).unwrap();

        assert_eq!(title, "Best savings accounts");
        assert!(body.starts_with("Savers compare high-yield savings accounts"));
        assert!(body.contains("Online banks usually pay more"));
        assert!(!body.contains("| Bankrate"));
        assert!(!body.contains("newsletter"));
    }

    #[test]
    fn test_short_author_page_drops_chrome() {
        let html = "<html><head><title>Author page | Bankrate</title></head><body>\
                    <nav>Home</nav><p>Jane writes about savings.</p>\
                    <footer>Copyright Bankrate</footer></body></html>";

        let (body, title) =
            extract_content(html, "https://www.bankrate.com/authors/jane/", &SiteProfile::bankrate())
                .unwrap();

        assert_eq!(title, "Author page");
        assert_eq!(body, "Jane writes about savings.");
    }

    #[test]
    fn test_fallback_takes_all_visible_text() {
        let html = r#"
            <html><head><title>Short page - CreditCards.com</title>
            <style>.x { color: red }</style></head>
            <body><span>Tiny</span> <script>alert(1)</script><b>page</b></body></html>
        "#;
        let (body, title) =
            extract_content(html, "https://www.bankrate.com/b", &SiteProfile::bankrate()).unwrap();

        assert_eq!(title, "Short page");
        assert_eq!(body, "Short page - CreditCards.com Tiny page");
    }

    #[test]
    fn test_unparseable_page_url_uses_fallback() {
        let (body, title) = extract_content(ARTICLE, "not a url", &SiteProfile::bankrate()).unwrap();

        assert_eq!(title, "Fixed annuities vs. CDs");
        assert!(body.contains("Home"));
        assert!(body.contains("Copyright"));
        assert!(!body.contains("tracking"));
    }

    #[test]
    fn test_no_title_anywhere_is_parse_error() {
        let html = "<html><body><p>Body without any title at all.</p></body></html>";
        let err =
            extract_content(html, "https://www.bankrate.com/c", &SiteProfile::bankrate()).unwrap_err();
        assert!(matches!(err, ExtractionError::Parse { .. }));
    }
}
