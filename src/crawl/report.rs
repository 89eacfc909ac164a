// src/crawl/report.rs
// =============================================================================
// The result of one crawl run.
//
// - pages: every successfully fetched page, keyed by canonical URL, in the
//   order the fetches completed
// - failures: pages that were attempted but failed (error, timeout, or the
//   fetcher said "not successful"). These never show up in `pages`.
// - cancelled: the run was stopped early and the report is partial
// =============================================================================

use crate::canon::CanonicalUrl;
use crate::fetch::PageResult;
use indexmap::IndexMap;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedPage {
    pub url: CanonicalUrl,
    pub depth: usize,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct CrawlReport<P> {
    pub pages: IndexMap<CanonicalUrl, PageResult<P>>,
    pub failures: Vec<FailedPage>,
    pub cancelled: bool,
}

impl<P> Default for CrawlReport<P> {
    fn default() -> Self {
        Self {
            pages: IndexMap::new(),
            failures: Vec::new(),
            cancelled: false,
        }
    }
}

impl<P> CrawlReport<P> {
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// Stores a fetched page. Returns false (and keeps the first entry) if the
    /// URL is already in the report.
    pub(crate) fn record_page(&mut self, url: CanonicalUrl, page: PageResult<P>) -> bool {
        if self.pages.contains_key(&url) {
            return false;
        }
        self.pages.insert(url, page);
        true
    }

    pub(crate) fn record_failure(&mut self, url: CanonicalUrl, depth: usize, reason: String) {
        self.failures.push(FailedPage { url, depth, reason });
    }
}
