// src/fetch/mod.rs
// =============================================================================
// The page fetcher: the crawler's only window onto the network.
//
// Submodules:
// - http: the real fetcher (reqwest for HTTP, scraper for links)
// - links: pulls <a href> links out of an HTML page
//
// The crawler only cares about two things a fetch gives back: did it work,
// and which internal links did the page have. External links and the page
// payload are carried through to the report untouched. Tests plug in their
// own Fetcher instead of going to the network.
// =============================================================================

mod http;
mod links;

pub use http::{HtmlPage, HttpFetcher, DEFAULT_MAX_BODY_BYTES};

use crate::canon::CanonicalUrl;
use crate::error::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Links found on one page, already split by the fetcher.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageLinks {
    pub internal: Vec<String>,
    pub external: Vec<String>,
}

/// What a fetcher hands back for one URL.
///
/// `payload` is opaque to the crawler.
#[derive(Debug, Clone, Serialize)]
pub struct PageResult<P> {
    pub url: String,
    pub success: bool,
    pub links: PageLinks,
    pub payload: P,
}

#[async_trait]
pub trait Fetcher: Send + Sync {
    type Payload: Send + 'static;

    /// Fetches one page.
    ///
    /// `Err` means a transport failure. `Ok` with `success == false` means the
    /// server answered but the page is not usable (e.g. a 404). The crawler
    /// treats both as a failed page.
    async fn fetch(&self, url: &CanonicalUrl) -> Result<PageResult<Self::Payload>>;
}
