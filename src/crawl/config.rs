// src/crawl/config.rs
// Settings for one crawl run.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlConfig {
    /// Depth 0 is the seed page. Pages deeper than this are never fetched.
    pub max_depth: usize,
    /// Upper bound on fetches in flight at once. 1 = strictly sequential.
    pub workers: usize,
    /// A fetch that takes longer than this counts as a failed page.
    pub fetch_timeout: Duration,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            workers: 1,
            fetch_timeout: Duration::from_secs(30),
        }
    }
}

impl CrawlConfig {
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_fetch_timeout(mut self, timeout: Duration) -> Self {
        self.fetch_timeout = timeout;
        self
    }
}
