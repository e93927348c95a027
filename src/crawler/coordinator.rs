//! Crawler coordinator - main crawl orchestration logic
//!
//! This module drives a run from login to drained queue:
//! - Authenticating once and holding the session
//! - Seeding the visit queue with the start URL
//! - Running a fixed-size worker pool over the queue
//! - Dispatching fetched pages to link discovery and fetched resources to
//!   the path mapper and download sink

use crate::config::{validate, Config};
use crate::crawler::fetcher::{is_html, FetchResult, HttpSession, Transport};
use crate::crawler::parser::{discover_links, DiscoveredLink, DiscoveryRules, LinkKind};
use crate::crawler::scheduler::{Scheduler, Visit, VisitKind, VisitQueue};
use crate::crawler::visited::VisitedIndex;
use crate::output::{map_to_path, CrawlStats, CrawlSummary, DownloadSink, SaveOutcome, SinkError};
use crate::state::CrawlState;
use crate::{ConfigError, HarvestError};
use std::sync::Arc;
use tokio::task::JoinSet;
use url::Url;

/// Main crawler coordinator structure
pub struct Coordinator {
    config: Arc<Config>,
    transport: Arc<dyn Transport>,
    state: CrawlState,
    stats: Arc<CrawlStats>,
}

/// Everything a worker needs, shared read-only across the pool
struct WorkerContext {
    transport: Arc<dyn Transport>,
    scheduler: Scheduler,
    queue: VisitQueue,
    rules: DiscoveryRules,
    menu_index: VisitedIndex,
    traversal_index: Option<VisitedIndex>,
    sink: DownloadSink,
    media_base_url: String,
    media_marker: String,
    folder_filter: String,
    stats: Arc<CrawlStats>,
}

impl Coordinator {
    /// Creates a coordinator talking to the site over HTTP
    ///
    /// # Arguments
    ///
    /// * `config` - The resolved run configuration
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(HarvestError)` - Invalid configuration or HTTP client failure
    pub fn new(config: Config) -> Result<Self, HarvestError> {
        validate(&config)?;
        let transport = Arc::new(HttpSession::new()?);
        Ok(Self::with_transport(config, transport))
    }

    /// Creates a coordinator on top of an existing transport
    pub fn with_transport(config: Config, transport: Arc<dyn Transport>) -> Self {
        Self {
            config: Arc::new(config),
            transport,
            state: CrawlState::Unauthenticated,
            stats: Arc::new(CrawlStats::new()),
        }
    }

    /// Returns the current lifecycle state
    pub fn state(&self) -> CrawlState {
        self.state
    }

    /// Runs the crawl until the visit queue drains
    ///
    /// This is the core crawling logic that:
    /// 1. Validates the configuration, builds the start URL and the discovery rules
    /// 2. Logs in
    /// 3. Schedules the start visit
    /// 4. Runs the worker pool until no visit is outstanding
    ///
    /// Configuration and login transport failures abort the run; everything
    /// that goes wrong for a single page or resource is logged and skipped.
    pub async fn run(&mut self) -> Result<CrawlSummary, HarvestError> {
        validate(&self.config)?;
        let start_url = self.config.start_url()?;
        let rules = DiscoveryRules::from_config(&self.config)?;
        let login_url = Url::parse(&self.config.site.login_url).map_err(|e| {
            ConfigError::InvalidUrl(format!(
                "Invalid login-url '{}': {}",
                self.config.site.login_url, e
            ))
        })?;

        self.authenticate(&login_url).await?;

        tracing::info!(starturl = %start_url, "starting");
        self.state.transition(CrawlState::Crawling)?;

        let (scheduler, queue) = Scheduler::new();
        let crawl = &self.config.crawl;
        let context = Arc::new(WorkerContext {
            transport: Arc::clone(&self.transport),
            scheduler,
            queue,
            rules,
            menu_index: VisitedIndex::new(),
            traversal_index: crawl.dedupe_folders.then(VisitedIndex::new),
            sink: DownloadSink::new(&crawl.download_dir, crawl.dry_run),
            media_base_url: self.config.site.media_base_url(),
            media_marker: self.config.site.media_marker.clone(),
            folder_filter: crawl.folder_filter.clone(),
            stats: Arc::clone(&self.stats),
        });

        context
            .scheduler
            .schedule(Visit::new(start_url, VisitKind::Start));

        let mut workers = JoinSet::new();
        for worker_id in 0..crawl.workers {
            workers.spawn(worker_loop(Arc::clone(&context), worker_id));
        }

        let outcome = match crawl.deadline {
            Some(deadline) => tokio::time::timeout(deadline, join_workers(&mut workers))
                .await
                .ok(),
            None => Some(join_workers(&mut workers).await),
        };

        let result = match (outcome, crawl.deadline) {
            (Some(result), _) => result,
            (None, limit) => {
                let limit = limit.unwrap_or_default();
                tracing::error!(
                    ?limit,
                    outstanding = context.scheduler.outstanding(),
                    "deadline exceeded, cancelling outstanding visits"
                );
                Err(HarvestError::DeadlineExceeded { limit })
            }
        };

        if let Err(e) = result {
            context.scheduler.close();
            workers.abort_all();
            return Err(e);
        }

        self.state.transition(CrawlState::Done)?;

        let summary = self.stats.summary();
        tracing::info!(
            visits = context.scheduler.scheduled_total(),
            fetched = summary.pages_fetched,
            saved = summary.resources_saved,
            seen = summary.resources_reported,
            filtered = summary.resources_filtered,
            fetch_failures = summary.fetch_failures,
            save_errors = summary.save_errors,
            "done"
        );

        Ok(summary)
    }

    /// Logs in and moves to the authenticated state
    async fn authenticate(&mut self, login_url: &Url) -> Result<(), HarvestError> {
        let outcome = self
            .transport
            .authenticate(login_url, &self.config.credentials)
            .await?;

        if !outcome.is_success() {
            if self.config.crawl.verify_login {
                return Err(HarvestError::LoginRejected {
                    url: login_url.to_string(),
                    status: outcome.status_code,
                });
            }
            tracing::warn!(
                status = outcome.status_code,
                "login answered with a non-success status, continuing"
            );
        }

        self.state.transition(CrawlState::Authenticated)
    }
}

async fn join_workers(workers: &mut JoinSet<()>) -> Result<(), HarvestError> {
    while let Some(joined) = workers.join_next().await {
        joined.map_err(|e| HarvestError::Worker(e.to_string()))?;
    }
    Ok(())
}

async fn worker_loop(context: Arc<WorkerContext>, worker_id: usize) {
    while let Some(visit) = context.queue.next().await {
        context.process(&visit).await;
        context.scheduler.complete();
    }
    tracing::trace!(worker_id, "worker finished");
}

impl WorkerContext {
    /// Fetches one visit and dispatches the response
    async fn process(&self, visit: &Visit) {
        tracing::debug!(url = %visit.url, kind = visit.kind.as_str(), "visiting");

        let (final_url, content_type, body) = match self.transport.fetch(&visit.url).await {
            FetchResult::Success {
                final_url,
                content_type,
                body,
                ..
            } => (final_url, content_type, body),
            FetchResult::HttpError { status_code } => {
                tracing::warn!(url = %visit.url, status = status_code, "fetch failed");
                self.stats.record_fetch_failure();
                return;
            }
            FetchResult::NetworkError { error } => {
                tracing::warn!(url = %visit.url, %error, "fetch failed");
                self.stats.record_fetch_failure();
                return;
            }
        };
        self.stats.record_fetch();

        if is_html(&content_type) {
            let html = String::from_utf8_lossy(&body);
            for link in discover_links(&html, &final_url, &self.rules) {
                self.follow(link);
            }
        }

        let is_media = final_url.as_str().contains(&self.media_marker);
        tracing::debug!(url = %final_url, media = is_media, "received");
        if is_media {
            self.save_resource(&final_url, &body).await;
        }
    }

    /// Schedules a discovered link according to its kind
    fn follow(&self, link: DiscoveredLink) {
        let kind = match link.kind {
            LinkKind::Menu => {
                if !self.menu_index.try_claim(&link.href) {
                    return;
                }
                VisitKind::Menu
            }
            LinkKind::Folder => {
                tracing::debug!(href = %link.href, target = %link.target, "folder");
                if !self.claim_traversal(&link.target) {
                    return;
                }
                VisitKind::Folder
            }
            LinkKind::Resource => {
                if !self.claim_traversal(&link.target) {
                    return;
                }
                VisitKind::Resource
            }
            LinkKind::Unrelated => return,
        };
        self.scheduler.schedule(Visit::new(link.target, kind));
    }

    /// Folder and resource visits are only deduplicated when hardening is on
    fn claim_traversal(&self, target: &Url) -> bool {
        self.traversal_index
            .as_ref()
            .map_or(true, |index| index.try_claim(target.as_str()))
    }

    /// Maps a resource response onto the download tree and persists it
    async fn save_resource(&self, url: &Url, body: &[u8]) {
        let Some(relpath) = map_to_path(url.as_str(), &self.media_base_url, &self.folder_filter)
        else {
            tracing::trace!(url = %url, filter = %self.folder_filter, "outside folder filter");
            self.stats.record_filtered();
            return;
        };

        match self.sink.persist(&relpath, body).await {
            Ok(SaveOutcome::Saved(_)) => self.stats.record_saved(),
            Ok(SaveOutcome::Reported(_)) => self.stats.record_reported(),
            Err(SinkError::CreateDir { path, source }) => {
                tracing::error!(fulldir = %path.display(), err = %source, "mkdir error");
                self.stats.record_save_error();
            }
            Err(SinkError::Write { path, source }) => {
                tracing::error!(fullpath = %path.display(), err = %source, "save error");
                self.stats.record_save_error();
            }
        }
    }
}

/// Runs a complete crawl over HTTP
///
/// # Example
///
/// ```no_run
/// use extranet_harvester::config::{Config, CrawlConfig, Credentials, SiteConfig, StartTarget};
/// use extranet_harvester::crawler::run_crawl;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = Config {
///     site: SiteConfig::default(),
///     credentials: Credentials::new("user@example.com", "secret"),
///     crawl: CrawlConfig::new(StartTarget::Top("home".to_string()), "./downloads"),
/// };
/// let summary = run_crawl(config).await?;
/// println!("saved {} files", summary.resources_saved);
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl(config: Config) -> Result<CrawlSummary, HarvestError> {
    let mut coordinator = Coordinator::new(config)?;
    coordinator.run().await
}
