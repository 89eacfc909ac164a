// src/canon/normalize.rs
// =============================================================================
// This module produces canonical URLs.
//
// A canonical URL:
// - has no fragment (#section)
// - has no trailing slash, unless the whole path is "/"
// - has a lowercase scheme and host (the url crate does this while parsing)
//
// Two links that only differ by fragment or trailing slash end up as the same
// CanonicalUrl, so the crawler fetches them once.
//
// Policy for unparsable input: reject with CrawlError::MalformedUrl. Relative
// strings like "/docs" need a base, so they are rejected too; use join() for
// those.
// =============================================================================

use crate::canon::SiteScope;
use crate::error::{CrawlError, Result};
use serde::{Serialize, Serializer};
use std::fmt;
use url::Url;

/// A URL in normalized form. Only `canonicalize` and `join` create these.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CanonicalUrl(Url);

impl CanonicalUrl {
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn as_url(&self) -> &Url {
        &self.0
    }

    pub fn path(&self) -> &str {
        self.0.path()
    }

    /// Host plus an explicit port, e.g. "example.com" or "127.0.0.1:8080".
    /// Default ports are already dropped by the url crate.
    pub fn authority(&self) -> Option<String> {
        let host = self.0.host_str()?;
        Some(match self.0.port() {
            Some(port) => format!("{}:{}", host, port),
            None => host.to_string(),
        })
    }
}

impl fmt::Display for CanonicalUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AsRef<str> for CanonicalUrl {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl Serialize for CanonicalUrl {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

// Parses a raw string and normalizes it
//
// Examples:
//   "https://Example.com/docs/#intro" -> "https://example.com/docs"
//   "https://example.com/"            -> "https://example.com/"
//   "/docs"                           -> Err(MalformedUrl)
pub fn canonicalize(raw: &str) -> Result<CanonicalUrl> {
    let url = Url::parse(raw).map_err(|e| CrawlError::malformed(raw, e))?;
    Ok(normalize(url))
}

// Resolves `relative` against the page it was found on
//
// Sites are sometimes crawled under a path prefix (e.g. /docs). Pages there
// often emit host-relative links like "/guide" that really mean "/docs/guide".
// If the resolved path falls outside the scope's base path, the base path is
// glued in front of it:
//
//   base_path = "/docs", resolved = "/other"  ->  "/docs/other"
//
// The host is not checked here; is_in_scope() does that.
pub fn join(base: &CanonicalUrl, scope: &SiteScope, relative: &str) -> Result<CanonicalUrl> {
    let mut resolved = base
        .as_url()
        .join(relative)
        .map_err(|e| CrawlError::malformed(relative, e))?;

    // mailto:, data: and friends have no hierarchical path to rewrite
    if !resolved.cannot_be_a_base() && !resolved.path().starts_with(scope.base_path()) {
        let rewritten = format!(
            "{}/{}",
            scope.base_path().trim_end_matches('/'),
            resolved.path().trim_start_matches('/')
        );
        resolved.set_path(&rewritten);
    }

    Ok(normalize(resolved))
}

fn normalize(mut url: Url) -> CanonicalUrl {
    url.set_fragment(None);

    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path.trim_end_matches('/').to_string();
        url.set_path(&trimmed);
    }

    CanonicalUrl(url)
}
