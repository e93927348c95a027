//! Configuration module for the harvester
//!
//! The command line produces a fully resolved [`Config`]; the site description
//! can optionally be loaded from a TOML file.
//!
//! # Example
//!
//! ```no_run
//! use extranet_harvester::config::load_site_config;
//! use std::path::Path;
//!
//! let site = load_site_config(Path::new("site.toml")).unwrap();
//! println!("Crawler will log in at: {}", site.login_url);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlConfig, Credentials, SiteConfig, StartTarget};

// Re-export parser functions
pub use parser::{load_site_config, parse_site_config};
pub use validation::validate;

use crate::ConfigError;
use url::Url;

impl Config {
    /// Builds the URL of the first visit
    ///
    /// In top mode this is `<origin>/<language>/<top>`, in link mode the
    /// given URL. A URL that cannot be built aborts the run.
    pub fn start_url(&self) -> Result<Url, ConfigError> {
        crate::url::build_start_url(&self.site, &self.crawl.start)
    }

    /// Returns true when menu entries should be followed
    ///
    /// Only the home page carries the site-wide menu worth walking.
    pub fn menu_enabled(&self) -> bool {
        matches!(&self.crawl.start, StartTarget::Top(top) if *top == self.site.home)
    }
}
