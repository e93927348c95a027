//! Output module: where fetched resources end up
//!
//! This module handles:
//! - Mapping resource URLs onto local relative paths
//! - Writing (or, in dry-run mode, reporting) resource bodies
//! - Recording crawl statistics

mod mapper;
mod sink;
pub mod stats;

pub use mapper::{map_to_path, DEFAULT_EXTENSION};
pub use sink::{DownloadSink, SaveOutcome, SinkError};
pub use stats::{print_summary, CrawlStats, CrawlSummary};
