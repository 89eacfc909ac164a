// src/crawl/traverser.rs
// =============================================================================
// This module implements the breadth-first crawl.
//
// How it works:
// 1. Canonicalize the seed URL and derive the site scope from it
// 2. Put the seed in the frontier at depth 0
// 3. Pop the oldest frontier entry, skip it if visited or too deep
// 4. Mark it visited, fetch it
// 5. On success, record the page and (if not at max depth) queue its
//    in-scope internal links at depth + 1
// 6. Repeat until the frontier is empty
//
// Guarantees:
// - every canonical URL is fetched at most once
// - nothing deeper than max_depth is ever fetched
// - a failed page never stops the run; it goes to report.failures
//
// Concurrency:
// - up to `workers` fetches are in flight at once (FuturesUnordered)
// - this single loop owns the frontier, visited set and report, so there is
//   exactly one writer and no locking
// - fetches are issued level by level: an entry at depth d+1 is only started
//   once every depth-d fetch has finished. With workers = 1 this is plain
//   sequential BFS.
// =============================================================================

use crate::canon::{canonicalize, is_followable_href, is_in_scope, join, CanonicalUrl, SiteScope};
use crate::crawl::{CrawlConfig, CrawlReport};
use crate::error::{CrawlError, Result};
use crate::fetch::{Fetcher, PageResult};
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::{HashSet, VecDeque};
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

// Represents a page in the crawl frontier
#[derive(Debug, Clone)]
struct FrontierEntry {
    url: CanonicalUrl,
    depth: usize, // How many link hops from the seed
}

// State of one crawl run. Built fresh for every crawl() call.
struct CrawlRun<'a, P> {
    scope: SiteScope,
    config: &'a CrawlConfig,
    frontier: VecDeque<FrontierEntry>,
    visited: HashSet<CanonicalUrl>,
    report: CrawlReport<P>,
}

impl<'a, P> CrawlRun<'a, P> {
    fn new(seed: CanonicalUrl, scope: SiteScope, config: &'a CrawlConfig) -> Self {
        let mut frontier = VecDeque::new();
        frontier.push_back(FrontierEntry {
            url: seed,
            depth: 0,
        });

        Self {
            scope,
            config,
            frontier,
            visited: HashSet::new(),
            report: CrawlReport::default(),
        }
    }

    // Pops the next entry to fetch and marks it visited
    //
    // `level` is the depth of the fetches currently in flight, or None if
    // nothing is in flight. An entry from another level stays in the frontier
    // until the current level has drained.
    fn next_entry(&mut self, level: Option<usize>) -> Option<FrontierEntry> {
        while let Some(entry) = self.frontier.pop_front() {
            if self.visited.contains(&entry.url) {
                continue;
            }

            if entry.depth > self.config.max_depth {
                debug!("Too deep [depth {}]: {}", entry.depth, entry.url);
                continue;
            }

            if level.is_some_and(|level| entry.depth != level) {
                self.frontier.push_front(entry);
                return None;
            }

            // Marked before the fetch starts, so no other slot can pick it up
            self.visited.insert(entry.url.clone());
            return Some(entry);
        }

        None
    }

    fn complete(&mut self, entry: FrontierEntry, outcome: Result<PageResult<P>>) {
        match outcome {
            Ok(page) if page.success => {
                info!("Crawled [depth {}]: {}", entry.depth, entry.url);

                if entry.depth < self.config.max_depth {
                    self.expand(&entry, &page.links.internal);
                }

                let inserted = self.report.record_page(entry.url, page);
                debug_assert!(inserted, "page recorded twice");
            }
            Ok(_) => {
                warn!("Failed to fetch {}: page not successful", entry.url);
                self.report
                    .record_failure(entry.url, entry.depth, "page not successful".to_string());
            }
            Err(e) => {
                warn!("Failed to fetch {}: {}", entry.url, e);
                self.report
                    .record_failure(entry.url, entry.depth, e.to_string());
            }
        }
    }

    // Queues the in-scope, not yet visited links of a fetched page
    fn expand(&mut self, parent: &FrontierEntry, hrefs: &[String]) {
        for href in hrefs {
            if !is_followable_href(href) {
                continue;
            }

            let url = match join(&parent.url, &self.scope, href) {
                Ok(url) => url,
                Err(e) => {
                    debug!("Dropping link on {}: {}", parent.url, e);
                    continue;
                }
            };

            if !is_in_scope(&url, &self.scope) {
                debug!("Out of scope: {}", url);
                continue;
            }

            if !self.visited.contains(&url) {
                self.frontier.push_back(FrontierEntry {
                    url,
                    depth: parent.depth + 1,
                });
            }
        }
    }
}

/// Drives crawl runs with one fetcher. Each call to `crawl` is an independent
/// run with its own frontier, visited set and report.
pub struct Traverser<F> {
    fetcher: Arc<F>,
    config: CrawlConfig,
}

impl<F> Traverser<F>
where
    F: Fetcher + 'static,
{
    pub fn new(fetcher: F, config: CrawlConfig) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            config,
        }
    }

    #[cfg(test)]
    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Crawls from `seed_url` until the frontier is exhausted.
    ///
    /// Only an unusable seed (unparsable, or without a host) is an error.
    pub async fn crawl(&self, seed_url: &str) -> Result<CrawlReport<F::Payload>> {
        self.crawl_with_cancellation(seed_url, CancellationToken::new())
            .await
    }

    /// Same as `crawl`, but stops when `cancel` fires. In-flight fetches are
    /// dropped and the partial report is returned with `cancelled` set.
    pub async fn crawl_with_cancellation(
        &self,
        seed_url: &str,
        cancel: CancellationToken,
    ) -> Result<CrawlReport<F::Payload>> {
        let seed = canonicalize(seed_url)?;
        let scope = SiteScope::from_seed(&seed)?;

        info!(
            "Starting crawl of {} (scope {}{}, max depth {}, {} worker(s))",
            seed,
            scope.host(),
            scope.base_path(),
            self.config.max_depth,
            self.config.workers
        );

        let mut run = CrawlRun::new(seed, scope, &self.config);
        let mut in_flight = FuturesUnordered::new();
        let mut level = None;

        loop {
            while in_flight.len() < self.config.workers {
                let Some(entry) = run.next_entry(level) else {
                    break;
                };
                level = Some(entry.depth);
                in_flight.push(self.start_fetch(entry));
            }

            // Nothing running and nothing left to start
            if in_flight.is_empty() {
                break;
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    warn!("Crawl cancelled with {} fetch(es) in flight", in_flight.len());
                    run.report.cancelled = true;
                    break;
                }
                Some((entry, outcome)) = in_flight.next() => {
                    run.complete(entry, outcome);
                    if in_flight.is_empty() {
                        level = None;
                    }
                }
            }
        }

        info!(
            "Crawl complete. Fetched {} page(s), {} failed",
            run.report.len(),
            run.report.failures.len()
        );

        Ok(run.report)
    }

    // One fetch with the configured timeout. A timeout is reported like any
    // other fetch failure.
    fn start_fetch(
        &self,
        entry: FrontierEntry,
    ) -> impl Future<Output = (FrontierEntry, Result<PageResult<F::Payload>>)> {
        let fetcher = Arc::clone(&self.fetcher);
        let timeout = self.config.fetch_timeout;

        async move {
            debug!("Fetching [depth {}]: {}", entry.depth, entry.url);

            let outcome = match tokio::time::timeout(timeout, fetcher.fetch(&entry.url)).await {
                Ok(outcome) => outcome,
                Err(_) => Err(CrawlError::Timeout(timeout)),
            };

            (entry, outcome)
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why mark a URL visited before fetching it?
//    - With several fetches in flight, a link to the same page can show up
//      on two pages at once
//    - Marking at pop time means the second copy is skipped when it is popped
//
// 2. What is FuturesUnordered?
//    - A set of futures that yields each result as soon as it is ready
//    - Like buffer_unordered(), but we can push new work in while it runs
//
// 3. What does `biased;` do in tokio::select!?
//    - Branches are checked top to bottom instead of in random order
//    - Cancellation is always noticed before the next fetch result
//
// 4. Why is the fetch future `async move`?
//    - It owns an Arc of the fetcher and the frontier entry
//    - So it does not borrow the Traverser while the loop mutates run state
// -----------------------------------------------------------------------------
