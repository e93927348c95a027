use crate::config::{SiteConfig, StartTarget};
use crate::ConfigError;
use url::Url;

/// Builds the URL of the first visit for the given start target
///
/// # Examples
///
/// ```
/// use extranet_harvester::config::{SiteConfig, StartTarget};
/// use extranet_harvester::url::build_start_url;
///
/// let site = SiteConfig {
///     origin: "https://site.example".to_string(),
///     ..SiteConfig::default()
/// };
/// let url = build_start_url(&site, &StartTarget::Top("budget".to_string())).unwrap();
/// assert_eq!(url.as_str(), "https://site.example/de/budget");
/// ```
pub fn build_start_url(site: &SiteConfig, start: &StartTarget) -> Result<Url, ConfigError> {
    match start {
        StartTarget::Top(top) => {
            let mut url = Url::parse(&site.origin).map_err(|e| {
                ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", site.origin, e))
            })?;
            url.path_segments_mut()
                .map_err(|_| {
                    ConfigError::InvalidUrl(format!("Origin '{}' cannot be a base", site.origin))
                })?
                .pop_if_empty()
                .push(&site.language)
                .push(top);
            Ok(url)
        }
        StartTarget::Link(link) => Url::parse(link)
            .map_err(|e| ConfigError::InvalidUrl(format!("Invalid start url '{}': {}", link, e))),
    }
}

/// Resolves a menu `href` against the site origin
pub fn resolve_against_origin(origin: &Url, href: &str) -> Option<Url> {
    origin.join(href.trim()).ok()
}

/// Resolves a folder `href` against the page it was found on
///
/// Folders are addressed by query parameters, so the folder's own query
/// replaces the query of the current page while the path stays the same.
///
/// # Examples
///
/// ```
/// use extranet_harvester::url::resolve_folder_link;
/// use url::Url;
///
/// let page = Url::parse("https://site/de/sitzungen?x=1").unwrap();
/// let next = resolve_folder_link(&page, "?waxmlc_dbFolder_2338099=2532705").unwrap();
/// assert_eq!(
///     next.as_str(),
///     "https://site/de/sitzungen?waxmlc_dbFolder_2338099=2532705"
/// );
/// ```
pub fn resolve_folder_link(page: &Url, href: &str) -> Option<Url> {
    let mut base = page.clone();
    base.set_query(None);
    base.set_fragment(None);
    Url::parse(&format!("{}{}", base, href.trim())).ok()
}

/// Resolves a resource `href` relative to the page it was found on
pub fn resolve_against_page(page: &Url, href: &str) -> Option<Url> {
    page.join(href.trim()).ok()
}
