//! State module for tracking crawl progress
//!
//! - `CrawlState`: the run lifecycle (unauthenticated, authenticated, crawling, done)

mod crawl_state;

pub use crawl_state::CrawlState;
