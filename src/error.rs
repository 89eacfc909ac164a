// src/error.rs
// =============================================================================
// Error types for the crawler.
//
// Only two situations are fatal to a crawl run:
// - the seed URL cannot be parsed
// - the seed URL has no host, so no site scope can be established
//
// Everything else (a bad link on a page, a page that fails to load) is
// handled per link or per page and never aborts the run.
// =============================================================================

use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrawlError {
    #[error("Invalid URL '{url}': {source}")]
    MalformedUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("URL has no host: {0}")]
    NoHost(String),

    #[error("HTTP request failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("Fetch timed out after {0:?}")]
    Timeout(Duration),
}

impl CrawlError {
    pub(crate) fn malformed(url: &str, source: url::ParseError) -> Self {
        CrawlError::MalformedUrl {
            url: url.to_string(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, CrawlError>;
