// src/canon/scope.rs
// =============================================================================
// Site scope: which URLs count as "internal" for one crawl run.
//
// The scope is taken from the canonical seed URL:
//   seed = "https://example.com/docs"  ->  host "example.com", base path "/docs"
//
// A link is crawled only if it lives on the same host AND under the base path.
// Everything else is out of scope. That is not an error, it is the filter
// that keeps the frontier finite.
// =============================================================================

use crate::canon::CanonicalUrl;
use crate::error::{CrawlError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    host: String,
    base_path: String,
}

impl SiteScope {
    /// Fails when the seed has no host (mailto:, data:, ...).
    pub fn from_seed(seed: &CanonicalUrl) -> Result<Self> {
        let host = seed
            .authority()
            .ok_or_else(|| CrawlError::NoHost(seed.to_string()))?;

        Ok(SiteScope {
            host,
            base_path: seed.path().to_string(),
        })
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn base_path(&self) -> &str {
        &self.base_path
    }
}

// Checks whether a canonical URL is a crawl target for this scope
//
// All of these must hold:
//   (a) the candidate is a real link, not a same-page "#fragment"
//   (b) same host (and port) as the seed
//   (c) the path is not empty, not just "/", and not the base path itself
//   (d) the path starts with the scope's base path
//
// (a) always holds for a CanonicalUrl: fragments are stripped and the value is
// absolute. Raw hrefs are screened with is_followable_href() before joining.
//
// Because of (c), a link back to the bare scope root is never enqueued as a
// new page. The seed itself is still fetched once, at depth 0.
//
// (d) is a plain string prefix check, so base "/a" also accepts "/ab".
pub fn is_in_scope(candidate: &CanonicalUrl, scope: &SiteScope) -> bool {
    let path = candidate.path();

    !candidate.as_str().is_empty()
        && candidate.authority().as_deref() == Some(scope.host())
        && !path.is_empty()
        && path != "/"
        && path != scope.base_path()
        && path.starts_with(scope.base_path())
}

// Screens a raw href before it is joined against the page URL
//
// Empty hrefs and pure fragment references ("#top") point back at the page
// they were found on, so there is nothing new to crawl.
pub fn is_followable_href(href: &str) -> bool {
    let href = href.trim();
    !href.is_empty() && !href.starts_with('#')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canon::canonicalize;

    fn scope(seed: &str) -> SiteScope {
        SiteScope::from_seed(&canonicalize(seed).unwrap()).unwrap()
    }

    fn in_scope(candidate: &str, seed: &str) -> bool {
        is_in_scope(&canonicalize(candidate).unwrap(), &scope(seed))
    }

    #[test]
    fn test_scope_from_seed() {
        let scope = scope("https://Example.com/docs/#intro");
        assert_eq!(scope.host(), "example.com");
        assert_eq!(scope.base_path(), "/docs");
    }

    #[test]
    fn test_scope_requires_host() {
        let seed = canonicalize("mailto:someone@example.com").unwrap();
        assert!(matches!(
            SiteScope::from_seed(&seed),
            Err(CrawlError::NoHost(_))
        ));
    }

    #[test]
    fn test_page_under_base_path() {
        assert!(in_scope("https://example.com/docs/guide", "https://example.com/docs"));
    }

    #[test]
    fn test_rejects_scope_root_itself() {
        assert!(!in_scope("https://example.com/docs", "https://example.com/docs"));
        assert!(!in_scope("https://example.com/docs/", "https://example.com/docs"));
    }

    #[test]
    fn test_rejects_other_host() {
        assert!(!in_scope("https://other.com/docs/guide", "https://example.com/docs"));
        assert!(!in_scope("https://sub.example.com/docs/guide", "https://example.com/docs"));
    }

    #[test]
    fn test_rejects_other_port() {
        assert!(!in_scope("http://localhost:9000/a/b", "http://localhost:8000/a"));
        assert!(in_scope("http://localhost:8000/a/b", "http://localhost:8000/a"));
    }

    #[test]
    fn test_rejects_root_path() {
        assert!(!in_scope("https://example.com/", "https://example.com/"));
        assert!(!in_scope("https://example.com", "https://example.com/"));
    }

    #[test]
    fn test_rejects_outside_base_path() {
        assert!(!in_scope("https://example.com/blog/post", "https://example.com/docs"));
    }

    #[test]
    fn test_base_path_is_a_string_prefix() {
        assert!(in_scope("https://example.com/docs-old/page", "https://example.com/docs"));
    }

    #[test]
    fn test_root_scope_accepts_any_page_on_host() {
        assert!(in_scope("https://example.com/anything/here", "https://example.com"));
    }

    #[test]
    fn test_rejects_hostless_candidate() {
        assert!(!in_scope("mailto:someone@example.com", "https://example.com/"));
    }

    #[test]
    fn test_followable_href() {
        assert!(is_followable_href("/docs/guide"));
        assert!(is_followable_href("../other"));
        assert!(!is_followable_href(""));
        assert!(!is_followable_href("   "));
        assert!(!is_followable_href("#section"));
    }
}
