//! Extranet Harvester: an authenticated folder crawler
//!
//! This crate logs into a members-only site, walks its nested folder
//! hierarchy and mirrors every linked document into a local directory tree.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Login request to {url} failed: {source}")]
    Auth { url: String, source: reqwest::Error },

    #[error("Login at {url} was rejected with HTTP {status}")]
    LoginRejected { url: String, status: u16 },

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("Crawl deadline of {limit:?} exceeded")]
    DeadlineExceeded { limit: std::time::Duration },

    #[error("Worker failed: {0}")]
    Worker(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("user and password cannot be empty")]
    MissingCredentials,
}

/// Result type alias for harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Config, CrawlConfig, Credentials, SiteConfig, StartTarget};
pub use crawler::{Coordinator, HttpSession, Transport};
pub use output::{map_to_path, CrawlSummary};
pub use state::CrawlState;
