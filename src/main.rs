//! Extranet Harvester main entry point
//!
//! This is the command-line interface for the authenticated folder crawler.

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use extranet_harvester::config::{
    load_site_config, Config, CrawlConfig, Credentials, SiteConfig, StartTarget,
};
use extranet_harvester::crawler::crawl;
use extranet_harvester::output::print_summary;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Extranet Harvester: mirror the documents of a members-only extranet
///
/// Logs into the site, walks its menu and nested folders and saves every
/// linked document below the download directory, mirroring the folder
/// structure of the site.
#[derive(Parser, Debug)]
#[command(name = "extranet-harvester")]
#[command(version = "1.0.0")]
#[command(about = "Download the documents of an authenticated extranet", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    #[command(flatten)]
    common: CommonArgs,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl starting from a top-level page
    Top {
        /// Top-level page to start from (home, sitzungen, budget, ...)
        #[arg(long, default_value = "home")]
        top: String,

        /// Only keep resources whose path contains this folder name
        #[arg(long, default_value = "")]
        folder: String,
    },

    /// Crawl starting from a link copied from the browser
    Link {
        /// Page URL to start from
        #[arg(long)]
        url: String,
    },
}

#[derive(Args, Debug)]
struct CommonArgs {
    /// Directory the documents are saved into
    #[arg(long, global = true, default_value = "./downloads/")]
    download: PathBuf,

    /// Login user name
    #[arg(long, global = true, env = "user")]
    user: Option<String>,

    /// Login password
    #[arg(long, global = true, env = "password", hide_env_values = true)]
    password: Option<String>,

    /// Only report what would be saved
    #[arg(long, global = true)]
    silent: bool,

    /// Verbose logging
    #[arg(long, global = true)]
    debug: bool,

    /// TOML file describing the site (origin, login URL, markup selectors)
    #[arg(long, global = true, value_name = "TOML")]
    site_config: Option<PathBuf>,

    /// Number of concurrent visit workers
    #[arg(long, global = true, default_value_t = CrawlConfig::DEFAULT_WORKERS)]
    workers: usize,

    /// Visit each folder and resource link only once
    #[arg(long, global = true)]
    dedupe_folders: bool,

    /// Abort when the login answers with an error status
    #[arg(long, global = true)]
    verify_login: bool,

    /// Abort the crawl after this many seconds
    #[arg(long, global = true, value_name = "SECS")]
    deadline: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Credentials may live in a .env file next to the binary
    dotenvy::from_filename(".env").ok();

    let cli = Cli::parse();
    setup_logging(cli.common.debug);

    let config = build_config(cli)?;
    let summary = crawl(config).await.context("crawl failed")?;

    print_summary(&summary);
    Ok(())
}

/// Sets up the logging/tracing subscriber
fn setup_logging(debug: bool) {
    let filter = if debug {
        EnvFilter::new("extranet_harvester=debug,info")
    } else {
        EnvFilter::new("extranet_harvester=info,warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Turns the parsed command line into a run configuration
fn build_config(cli: Cli) -> anyhow::Result<Config> {
    let common = cli.common;

    let site = match &common.site_config {
        Some(path) => {
            tracing::info!("Loading site configuration from: {}", path.display());
            load_site_config(path)
                .with_context(|| format!("failed to load site config {}", path.display()))?
        }
        None => SiteConfig::default(),
    };

    let (start, folder_filter) = match cli.command {
        Command::Top { top, folder } => (StartTarget::Top(top), folder),
        Command::Link { url } => (StartTarget::Link(url), String::new()),
    };

    let mut crawl = CrawlConfig::new(start, common.download);
    crawl.folder_filter = folder_filter;
    crawl.dry_run = common.silent;
    crawl.workers = common.workers;
    crawl.dedupe_folders = common.dedupe_folders;
    crawl.verify_login = common.verify_login;
    crawl.deadline = common.deadline.map(Duration::from_secs);

    Ok(Config {
        site,
        credentials: Credentials::new(
            common.user.unwrap_or_default(),
            common.password.unwrap_or_default(),
        ),
        crawl,
    })
}
