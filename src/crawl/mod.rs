// src/crawl/mod.rs
// =============================================================================
// This module handles website crawling.
//
// Features:
// - Breadth-first crawling starting from a seed URL
// - Stays inside the seed's host and base path (see canon::SiteScope)
// - Configurable depth limit, worker count and per-fetch timeout
// - Can be cancelled; a cancelled run still returns what it has so far
//
// Submodules:
// - config: CrawlConfig
// - report: CrawlReport, the only output of a run
// - traverser: the frontier / visited-set loop
// =============================================================================

mod config;
mod report;
mod traverser;

pub use config::CrawlConfig;
pub use report::CrawlReport;
pub use traverser::Traverser;
