//! Link discovery on fetched extranet pages
//!
//! Every anchor on a page is classified into one of a closed set of link
//! kinds:
//! - Menu entries (anchors inside a menu-entry container), resolved against
//!   the site origin
//! - Folders (anchors rendering a folder icon), whose query replaces the
//!   query of the current page
//! - Resources (anchors whose `href` starts with the resource prefix),
//!   resolved against the current page
//! - Everything else is unrelated and ignored

use crate::config::Config;
use crate::url::{resolve_against_origin, resolve_against_page, resolve_folder_link};
use crate::ConfigError;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// The kind of an anchor found on a page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Menu,
    Folder,
    Resource,
    Unrelated,
}

/// Markup facts about an anchor that drive its classification
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AnchorMarkup {
    /// The anchor sits inside a menu-entry container
    pub in_menu_entry: bool,

    /// The anchor renders a folder icon
    pub has_folder_icon: bool,
}

/// A classified link with its absolute visit target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    pub kind: LinkKind,

    /// The `href` exactly as it appeared on the page
    pub href: String,

    pub target: Url,
}

/// Compiled classification rules for one run
#[derive(Debug, Clone)]
pub struct DiscoveryRules {
    origin: Url,
    resource_prefix: String,
    anchor: Selector,
    menu_entry: Selector,
    folder_icon: Selector,
    menu_enabled: bool,
}

impl DiscoveryRules {
    /// Compiles the rules
    ///
    /// # Arguments
    ///
    /// * `origin` - Site origin menu links are resolved against
    /// * `resource_prefix` - `href` prefix of resource links
    /// * `menu_entry_selector` - CSS selector of a menu-entry container
    /// * `folder_icon_selector` - CSS selector of the folder icon
    /// * `menu_enabled` - Whether menu entries are followed at all
    pub fn new(
        origin: Url,
        resource_prefix: &str,
        menu_entry_selector: &str,
        folder_icon_selector: &str,
        menu_enabled: bool,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            origin,
            resource_prefix: resource_prefix.to_string(),
            anchor: compile("a[href]")?,
            menu_entry: compile(menu_entry_selector)?,
            folder_icon: compile(folder_icon_selector)?,
            menu_enabled,
        })
    }

    /// Builds the rules described by a run configuration
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let origin = Url::parse(&config.site.origin).map_err(|e| {
            ConfigError::InvalidUrl(format!("Invalid origin '{}': {}", config.site.origin, e))
        })?;
        Self::new(
            origin,
            &config.site.resource_prefix,
            &config.site.menu_entry_selector,
            &config.site.folder_icon_selector,
            config.menu_enabled(),
        )
    }
}

fn compile(selector: &str) -> Result<Selector, ConfigError> {
    Selector::parse(selector)
        .map_err(|e| ConfigError::Validation(format!("invalid selector '{}': {:?}", selector, e)))
}

/// Classifies a raw anchor
///
/// Menu entries win over folders, folders over resources. Menu entries are
/// only recognised when the rules enable them; empty `href`s are unrelated.
pub fn classify(href: &str, markup: AnchorMarkup, rules: &DiscoveryRules) -> LinkKind {
    let href = href.trim();
    if href.is_empty() {
        return LinkKind::Unrelated;
    }

    if rules.menu_enabled && markup.in_menu_entry {
        LinkKind::Menu
    } else if markup.has_folder_icon {
        LinkKind::Folder
    } else if href.starts_with(&rules.resource_prefix) {
        LinkKind::Resource
    } else {
        LinkKind::Unrelated
    }
}

/// Parses a page and returns every menu, folder and resource link on it
///
/// # Arguments
///
/// * `html` - The page content
/// * `page_url` - URL of the page, base for folder and resource links
/// * `rules` - The classification rules
///
/// # Example
///
/// ```
/// use extranet_harvester::crawler::{discover_links, DiscoveryRules, LinkKind};
/// use url::Url;
///
/// let rules = DiscoveryRules::new(
///     Url::parse("https://site").unwrap(),
///     "/media/web",
///     "li.jwa_menu_entry",
///     "i.fa-folder",
///     false,
/// )
/// .unwrap();
/// let html = r#"<a href="?folder=7"><i class="fa fa-folder"></i> <span>2023</span></a>"#;
/// let page = Url::parse("https://site/de/sitzungen?folder=1").unwrap();
///
/// let links = discover_links(html, &page, &rules);
/// assert_eq!(links[0].kind, LinkKind::Folder);
/// assert_eq!(links[0].target.as_str(), "https://site/de/sitzungen?folder=7");
/// ```
pub fn discover_links(html: &str, page_url: &Url, rules: &DiscoveryRules) -> Vec<DiscoveredLink> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    for anchor in document.select(&rules.anchor) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };

        let markup = AnchorMarkup {
            in_menu_entry: is_inside(&anchor, &rules.menu_entry),
            has_folder_icon: anchor.select(&rules.folder_icon).next().is_some(),
        };

        let kind = classify(href, markup, rules);
        let target = match kind {
            LinkKind::Menu => resolve_against_origin(&rules.origin, href),
            LinkKind::Folder => resolve_folder_link(page_url, href),
            LinkKind::Resource => resolve_against_page(page_url, href),
            LinkKind::Unrelated => continue,
        };

        match target {
            Some(target) => links.push(DiscoveredLink {
                kind,
                href: href.to_string(),
                target,
            }),
            None => tracing::debug!(href, page = %page_url, "skipping unresolvable link"),
        }
    }

    links
}

fn is_inside(element: &ElementRef, container: &Selector) -> bool {
    element
        .ancestors()
        .filter_map(ElementRef::wrap)
        .any(|ancestor| container.matches(&ancestor))
}
