use crate::config::types::{Config, CrawlConfig, SiteConfig, StartTarget};
use crate::ConfigError;
use scraper::Selector;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    if !config.credentials.is_complete() {
        return Err(ConfigError::MissingCredentials);
    }
    validate_site_config(&config.site)?;
    validate_crawl_config(&config.crawl)?;
    Ok(())
}

/// Validates the site description
pub fn validate_site_config(site: &SiteConfig) -> Result<(), ConfigError> {
    let origin = Url::parse(&site.origin)
        .map_err(|e| ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", site.origin, e)))?;

    if origin.scheme() != "http" && origin.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "Origin '{}' must use HTTP or HTTPS",
            site.origin
        )));
    }

    Url::parse(&site.login_url).map_err(|e| {
        ConfigError::InvalidUrl(format!("Invalid login-url '{}': {}", site.login_url, e))
    })?;

    for (name, value) in [
        ("media-base", &site.media_base),
        ("resource-prefix", &site.resource_prefix),
        ("media-marker", &site.media_marker),
        ("language", &site.language),
        ("home", &site.home),
    ] {
        if value.is_empty() {
            return Err(ConfigError::Validation(format!("{} cannot be empty", name)));
        }
    }

    validate_selector("menu-entry-selector", &site.menu_entry_selector)?;
    validate_selector("folder-icon-selector", &site.folder_icon_selector)?;

    Ok(())
}

/// Validates crawl behavior options
fn validate_crawl_config(crawl: &CrawlConfig) -> Result<(), ConfigError> {
    if crawl.workers < 1 || crawl.workers > 100 {
        return Err(ConfigError::Validation(format!(
            "workers must be between 1 and 100, got {}",
            crawl.workers
        )));
    }

    match &crawl.start {
        StartTarget::Top(top) if top.is_empty() => Err(ConfigError::Validation(
            "top folder cannot be empty".to_string(),
        )),
        StartTarget::Link(link) if link.is_empty() => Err(ConfigError::Validation(
            "start url cannot be empty".to_string(),
        )),
        StartTarget::Link(link) => Url::parse(link)
            .map(|_| ())
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start url '{}': {}", link, e))),
        StartTarget::Top(_) => Ok(()),
    }
}

fn validate_selector(name: &str, selector: &str) -> Result<(), ConfigError> {
    Selector::parse(selector)
        .map(|_| ())
        .map_err(|e| ConfigError::Validation(format!("{} '{}' is invalid: {:?}", name, selector, e)))
}
