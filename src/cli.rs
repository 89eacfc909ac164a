// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API: the CLI is described by a struct and clap
// generates the parsing, --help and --version for us.
//
// Usage:
//   scope-crawler https://example.com/docs --max-depth 2 --workers 4 --json
// =============================================================================

use crate::crawl::CrawlConfig;
use crate::fetch::DEFAULT_MAX_BODY_BYTES;
use clap::Parser;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "scope-crawler",
    version,
    about = "Crawl one website breadth-first, staying under the seed URL's host and path",
    long_about = "scope-crawler starts at a seed URL, follows the links that stay on the same host \
                  and under the seed's path, and stops at a maximum depth. It prints how many \
                  pages were crawled and the internal/external link counts of each page."
)]
pub struct Cli {
    /// URL to start crawling from (e.g., https://example.com/docs)
    ///
    /// Its host and path define the crawl scope: only links on the same host
    /// whose path starts with this URL's path are followed.
    pub seed_url: String,

    /// Maximum crawl depth
    ///
    /// Depth 0 = just the seed page
    /// Depth 1 = seed page + the pages it links to
    /// etc.
    #[arg(short = 'd', long, default_value_t = 2)]
    pub max_depth: usize,

    /// How many pages may be fetched at the same time
    #[arg(short = 'w', long, default_value_t = 1)]
    pub workers: usize,

    /// Per-page fetch timeout in seconds; a timeout counts as a failed page
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,

    /// Read at most this many bytes of each page; links past the cut are missed
    #[arg(long, default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body_bytes: usize,

    /// Output the full crawl report as JSON instead of a summary
    #[arg(long)]
    pub json: bool,
}

impl Cli {
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig::default()
            .with_max_depth(self.max_depth)
            .with_workers(self.workers)
            .with_fetch_timeout(Duration::from_secs(self.timeout_secs))
    }
}
