// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Set up logging (tracing, to stderr)
// 2. Parse command-line arguments using clap
// 3. Build the HTTP fetcher and run one crawl
// 4. Print a summary (or the JSON report)
// 5. Exit with proper code:
//      0 = the crawl ran to completion (failed pages included)
//      2 = the seed URL is unusable or the fetcher could not be built
// =============================================================================

mod canon; // src/canon/ - URL canonicalization and site scope
mod cli; // src/cli.rs - command-line parsing
mod crawl; // src/crawl/ - the breadth-first traverser
mod error; // src/error.rs - error types
mod fetch; // src/fetch/ - HTTP fetching and link extraction

use anyhow::{Context, Result};
use clap::Parser;
use cli::Cli;
use crawl::{CrawlReport, Traverser};
use fetch::{HtmlPage, HttpFetcher};
use tokio_util::sync::CancellationToken;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so that --json output on stdout stays machine-readable.
// RUST_LOG overrides the default level (e.g. RUST_LOG=scope_crawler=debug).
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("scope_crawler=info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let config = cli.crawl_config();
    let fetcher = HttpFetcher::new(config.fetch_timeout)
        .context("could not construct the page fetcher")?
        .with_max_body_bytes(cli.max_body_bytes);
    let traverser = Traverser::new(fetcher, config);

    // Ctrl-C stops the crawl; whatever was fetched so far is still reported
    let cancel = CancellationToken::new();
    let on_ctrl_c = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupted, stopping crawl");
            on_ctrl_c.cancel();
        }
    });

    let report = traverser
        .crawl_with_cancellation(&cli.seed_url, cancel)
        .await
        .with_context(|| format!("cannot crawl from '{}'", cli.seed_url))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_summary(&report, traverser.config().max_depth);
    }

    Ok(0)
}

// Prints one line per crawled page with its link counts
fn print_summary(report: &CrawlReport<HtmlPage>, max_depth: usize) {
    println!("Crawled {} pages:", report.len());

    for (url, page) in &report.pages {
        println!(
            "- {}: {} internal links, {} external links",
            url,
            page.links.internal.len(),
            page.links.external.len()
        );
    }

    if !report.failures.is_empty() {
        println!();
        println!("Failed {} page(s):", report.failures.len());
        for failed in &report.failures {
            println!("- {} [depth {}]: {}", failed.url, failed.depth, failed.reason);
        }
    }

    if report.cancelled {
        println!();
        println!("Crawl was interrupted; the results above are partial.");
    } else if report.is_empty() {
        println!("No pages could be fetched (max depth {}).", max_depth);
    }
}
