//! Run statistics collected while crawling
//!
//! Counters are updated concurrently by all workers and summarised once the
//! visit queue drains.

use chrono::{DateTime, Utc};
use std::sync::atomic::{AtomicU64, Ordering};

/// Live counters shared by all workers of a run
#[derive(Debug)]
pub struct CrawlStats {
    started_at: DateTime<Utc>,
    pages_fetched: AtomicU64,
    resources_saved: AtomicU64,
    resources_reported: AtomicU64,
    resources_filtered: AtomicU64,
    fetch_failures: AtomicU64,
    save_errors: AtomicU64,
}

/// Snapshot of a finished (or aborted) run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlSummary {
    /// When the crawl started
    pub started_at: DateTime<Utc>,

    /// When the snapshot was taken
    pub finished_at: DateTime<Utc>,

    /// Responses received, pages and resources alike
    pub pages_fetched: u64,

    /// Resources written to disk
    pub resources_saved: u64,

    /// Resources only reported because of a dry run
    pub resources_reported: u64,

    /// Resources dropped by the folder filter
    pub resources_filtered: u64,

    /// Visits that produced no usable response
    pub fetch_failures: u64,

    /// Resources that could not be written
    pub save_errors: u64,
}

impl CrawlSummary {
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }
}

impl Default for CrawlStats {
    fn default() -> Self {
        Self::new()
    }
}

impl CrawlStats {
    pub fn new() -> Self {
        Self {
            started_at: Utc::now(),
            pages_fetched: AtomicU64::new(0),
            resources_saved: AtomicU64::new(0),
            resources_reported: AtomicU64::new(0),
            resources_filtered: AtomicU64::new(0),
            fetch_failures: AtomicU64::new(0),
            save_errors: AtomicU64::new(0),
        }
    }

    pub fn record_fetch(&self) {
        self.pages_fetched.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_saved(&self) {
        self.resources_saved.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_reported(&self) {
        self.resources_reported.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_filtered(&self) {
        self.resources_filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_save_error(&self) {
        self.save_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Takes a snapshot of the current counters
    pub fn summary(&self) -> CrawlSummary {
        CrawlSummary {
            started_at: self.started_at,
            finished_at: Utc::now(),
            pages_fetched: self.pages_fetched.load(Ordering::Relaxed),
            resources_saved: self.resources_saved.load(Ordering::Relaxed),
            resources_reported: self.resources_reported.load(Ordering::Relaxed),
            resources_filtered: self.resources_filtered.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
            save_errors: self.save_errors.load(Ordering::Relaxed),
        }
    }
}

/// Prints a run summary to stdout in a formatted manner
pub fn print_summary(summary: &CrawlSummary) {
    println!("=== Crawl Summary ===\n");
    println!("  Started: {}", summary.started_at.to_rfc3339());
    println!("  Duration: {}s", summary.duration_seconds());
    println!("  Responses fetched: {}", summary.pages_fetched);
    println!("  Resources saved: {}", summary.resources_saved);
    if summary.resources_reported > 0 {
        println!("  Resources seen (dry run): {}", summary.resources_reported);
    }
    println!("  Resources filtered out: {}", summary.resources_filtered);
    println!("  Fetch failures: {}", summary.fetch_failures);
    println!("  Save errors: {}", summary.save_errors);
}
