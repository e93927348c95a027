use crate::config::types::SiteConfig;
use crate::config::validation::validate_site_config;
use crate::ConfigError;
use std::path::Path;

/// Loads and parses a site description from the given path
///
/// Keys missing from the file keep their default values, so a file only
/// needs to list what differs from the production extranet.
///
/// # Arguments
///
/// * `path` - Path to the TOML site file
///
/// # Returns
///
/// * `Ok(SiteConfig)` - Successfully loaded and validated site description
/// * `Err(ConfigError)` - Failed to load, parse, or validate the file
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use extranet_harvester::config::load_site_config;
///
/// let site = load_site_config(Path::new("site.toml")).unwrap();
/// println!("Origin: {}", site.origin);
/// ```
pub fn load_site_config(path: &Path) -> Result<SiteConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_site_config(&content)
}

/// Parses and validates a site description from TOML text
pub fn parse_site_config(content: &str) -> Result<SiteConfig, ConfigError> {
    let site: SiteConfig = toml::from_str(content)?;
    validate_site_config(&site)?;
    Ok(site)
}
