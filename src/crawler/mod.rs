//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with timeouts and a document size cap
//! - Routing fetched content to the right extractor
//! - The breadth-first frontier
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod router;

pub use coordinator::{run_crawl, Coordinator, CrawlSummary};
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use frontier::FrontierState;
pub use router::{route, ExtractorKind};

use crate::config::Config;
use crate::IngestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Open the database and record a new run
/// 2. Build the HTTP client
/// 3. Crawl the site breadth-first from the base URL
/// 4. Extract and persist sections and document text
/// 5. Close the run with its totals
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `config_hash` - Hash of the config file, stored with the run
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Crawl completed
/// * `Err(IngestError)` - Crawl could not start
pub async fn crawl(config: &Config, config_hash: &str) -> Result<CrawlSummary, IngestError> {
    run_crawl(config, config_hash).await
}
