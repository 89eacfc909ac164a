// src/fetch/links.rs
// =============================================================================
// This module extracts links from HTML pages and sorts them into internal
// and external ones.
//
// We use the `scraper` crate to parse the HTML and select <a href> elements,
// and the `url` crate to resolve relative hrefs against the page URL.
//
// "Internal" here means "same host and port as the page". The crawler applies
// its own, stricter scope check (base path etc.) on top of this.
// =============================================================================

use crate::fetch::PageLinks;
use indexmap::IndexSet;
use scraper::{Html, Selector};
use url::Url;

// Parses a page once and pulls out its links and title
//
// Parameters:
//   html: the HTML content to parse
//   page_url: the URL the page was served from (for resolving relative links)
//
// Returns: PageLinks with absolute URLs, each listed once, in document order,
// plus the page title if it has one
pub(crate) fn parse_page(html: &str, page_url: &Url) -> (PageLinks, Option<String>) {
    let document = Html::parse_document(html);
    (extract_page_links(&document, page_url), extract_title(&document))
}

// Extracts all http(s) links from a parsed document
//
// Example:
//   html = "<a href='/docs'>Docs</a><a href='https://rust-lang.org'>Rust</a>"
//   page_url = "https://example.com/"
//   internal = ["https://example.com/docs"], external = ["https://rust-lang.org/"]
fn extract_page_links(document: &Html, page_url: &Url) -> PageLinks {
    // Constant selector, known to be valid
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    let mut internal = IndexSet::new();
    let mut external = IndexSet::new();

    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        let Some(absolute) = resolve_link(page_url, href) else {
            continue;
        };

        if same_origin_host(&absolute, page_url) {
            internal.insert(absolute.to_string());
        } else {
            external.insert(absolute.to_string());
        }
    }

    PageLinks {
        internal: internal.into_iter().collect(),
        external: external.into_iter().collect(),
    }
}

/// Text of the first <title> element, trimmed.
fn extract_title(document: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("static selector is valid");

    document
        .select(&selector)
        .next()
        .map(|title| title.text().collect::<String>().trim().to_string())
        .filter(|title| !title.is_empty())
}

// Resolves a link (possibly relative) to an absolute http(s) URL
fn resolve_link(base: &Url, href: &str) -> Option<Url> {
    let href = href.trim();

    // Same-page anchors point back at this page
    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let url = base.join(href).ok()?;

    // Skip mailto:, tel:, javascript:, data: ...
    match url.scheme() {
        "http" | "https" => Some(url),
        _ => None,
    }
}

fn same_origin_host(link: &Url, page: &Url) -> bool {
    link.host_str() == page.host_str() && link.port_or_known_default() == page.port_or_known_default()
}
