use serde::Deserialize;
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved configuration for one crawl run
#[derive(Debug, Clone)]
pub struct Config {
    pub site: SiteConfig,
    pub credentials: Credentials,
    pub crawl: CrawlConfig,
}

/// Description of the remote site: where it lives and how its pages are marked up
#[derive(Debug, Clone, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SiteConfig {
    /// Site origin, e.g. `https://extranet.example.ch`
    pub origin: String,

    /// Endpoint receiving the `username`/`password` form POST
    pub login_url: String,

    /// Path prefix common to all resource URLs, stripped to obtain the local path
    pub media_base: String,

    /// `href` prefix identifying resource links on a page
    pub resource_prefix: String,

    /// Substring identifying a fetched URL as a downloadable resource
    pub media_marker: String,

    /// Language segment of top-level pages (`/<language>/<top>`)
    pub language: String,

    /// Name of the top-level page carrying the site menu
    pub home: String,

    /// CSS selector of the container wrapping each menu anchor
    pub menu_entry_selector: String,

    /// CSS selector of the icon marking an anchor as a folder
    pub folder_icon_selector: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            origin: "https://extranet.pastoralraum-aarau.ch".to_string(),
            login_url: "https://secure.itds.ch/itds-auth/login.jsp?redirectTo=https%3A%2F%2Fextranet.pastoralraum-aarau.ch%2F".to_string(),
            media_base: "/media/web/extranet.pastoralraum-aarau.ch/media/".to_string(),
            resource_prefix: "/media/web".to_string(),
            media_marker: "media".to_string(),
            language: "de".to_string(),
            home: "home".to_string(),
            menu_entry_selector: "li.jwa_menu_entry".to_string(),
            folder_icon_selector: "i.fa-folder".to_string(),
        }
    }
}

impl SiteConfig {
    /// Absolute URL prefix of every resource, origin followed by the media base
    pub fn media_base_url(&self) -> String {
        format!(
            "{}/{}",
            self.origin.trim_end_matches('/'),
            self.media_base.trim_start_matches('/')
        )
    }
}

/// Login credentials for the site
#[derive(Clone)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn is_complete(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Where the crawl begins
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartTarget {
    /// A top-level page such as `home`, `sitzungen` or `budget`
    Top(String),

    /// A direct link to a page, usually copied from the browser
    Link(String),
}

/// Crawl behavior configuration
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Starting point of the crawl
    pub start: StartTarget,

    /// Local root under which resources are written
    pub download_dir: PathBuf,

    /// Only resources whose decoded path contains this substring are kept
    pub folder_filter: String,

    /// Report matched resources without writing them
    pub dry_run: bool,

    /// Number of concurrent visit workers
    pub workers: usize,

    /// Also deduplicate folder and resource visits
    pub dedupe_folders: bool,

    /// Treat a non-success login status as fatal
    pub verify_login: bool,

    /// Abort the crawl once this much time has elapsed
    pub deadline: Option<Duration>,
}

impl CrawlConfig {
    pub const DEFAULT_WORKERS: usize = 4;

    /// Creates a crawl configuration with default options
    pub fn new(start: StartTarget, download_dir: impl Into<PathBuf>) -> Self {
        Self {
            start,
            download_dir: download_dir.into(),
            folder_filter: String::new(),
            dry_run: false,
            workers: Self::DEFAULT_WORKERS,
            dedupe_folders: false,
            verify_login: false,
            deadline: None,
        }
    }
}
