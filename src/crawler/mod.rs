//! Crawler module for the authenticated extranet walk
//!
//! This module contains the core crawling logic, including:
//! - The HTTP session and login
//! - Link discovery on fetched pages
//! - The visit queue and its deduplication ledger
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod parser;
mod scheduler;
mod visited;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{build_http_client, is_html, FetchResult, HttpSession, LoginOutcome, Transport};
pub use parser::{classify, discover_links, AnchorMarkup, DiscoveredLink, DiscoveryRules, LinkKind};
pub use scheduler::{Scheduler, Visit, VisitKind, VisitQueue};
pub use visited::VisitedIndex;

use crate::config::Config;
use crate::output::CrawlSummary;
use crate::HarvestError;

/// Runs a complete crawl operation
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Validate the configuration
/// 2. Build the HTTP session and log in
/// 3. Walk menu entries, folders and resources from the start page
/// 4. Save every resource below the media base
///
/// # Arguments
///
/// * `config` - The resolved run configuration
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - The queue drained
/// * `Err(HarvestError)` - Configuration, login or deadline failure
pub async fn crawl(config: Config) -> Result<CrawlSummary, HarvestError> {
    run_crawl(config).await
}
