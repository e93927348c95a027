//! Integration tests for the crawler
//!
//! These tests use wiremock to stand in for the extranet (login endpoint,
//! menu pages, folder pages and documents) and run the full crawl cycle
//! end-to-end against it.

use extranet_harvester::config::{Config, CrawlConfig, Credentials, SiteConfig, StartTarget};
use extranet_harvester::crawler::Coordinator;
use extranet_harvester::state::CrawlState;
use extranet_harvester::HarvestError;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_string_contains, method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const MEDIA_BASE: &str = "/media/web/site/media/";

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, start: StartTarget, download_dir: &Path) -> Config {
    Config {
        site: SiteConfig {
            origin: base_url.to_string(),
            login_url: format!("{}/login", base_url),
            media_base: MEDIA_BASE.to_string(),
            ..SiteConfig::default()
        },
        credentials: Credentials::new("alice", "secret"),
        crawl: CrawlConfig::new(start, download_dir),
    }
}

/// HTML response; `set_body_string` would force `text/plain`
fn html_page(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", body),
        "text/html; charset=utf-8",
    )
}

fn document(body: &[u8]) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .set_body_raw(body.to_vec(), "application/octet-stream")
}

const MENU: &str = r#"
    <ul class="jwa_menu">
        <li class="jwa_menu_entry"><a href="/de/sitzungen">Sitzungen</a></li>
        <li class="jwa_menu_entry"><a href="/de/budget">Budget</a></li>
    </ul>
"#;

/// Mounts a small extranet:
///
/// - `/de/home` with the menu
/// - `/de/sitzungen` with the menu and a folder link `?folder=2023`
/// - `/de/sitzungen?folder=2023` with a document without extension
/// - `/de/budget` with the menu and a `.docx` document
async fn mount_site(server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/login"))
        .and(body_string_contains("username=alice"))
        .and(body_string_contains("password=secret"))
        .respond_with(ResponseTemplate::new(200).insert_header("set-cookie", "session=s3cr3t; Path=/"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/de/home"))
        .respond_with(html_page(MENU))
        .mount(server)
        .await;

    // Folder pages share the path of their parent, so the query mock goes first
    Mock::given(method("GET"))
        .and(path("/de/sitzungen"))
        .and(query_param("folder", "2023"))
        .respond_with(html_page(
            r#"<table><tr><td>
                <a target="_blank" href="/media/web/site/media/Sitzungen/Report%202023">
                    <i class="fa fa-file-pdf-o"></i> <span>Report 2023</span>
                </a>
            </td></tr></table>"#,
        ))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/de/sitzungen"))
        .respond_with(html_page(&format!(
            r#"{}<table><tr><td>
                <a href="?folder=2023"><i class="fa fa-folder"></i> <span>2023</span></a>
            </td></tr></table>"#,
            MENU
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/de/budget"))
        .respond_with(html_page(&format!(
            r#"{}<a href="/media/web/site/media/Budget/Plan.docx">Plan</a>"#,
            MENU
        )))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/media/web/site/media/Sitzungen/Report"))
        .respond_with(document(b"%PDF-1.4 report"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/media/web/site/media/Budget/Plan.docx"))
        .respond_with(document(b"docx plan"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_crawl_from_home() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    let mut coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.run().await.unwrap();

    assert_eq!(coordinator.state(), CrawlState::Done);
    assert_eq!(summary.resources_saved, 2);
    assert_eq!(summary.fetch_failures, 0);

    let report = dir.path().join("Sitzungen").join("Report 2023.pdf");
    assert_eq!(std::fs::read(&report).unwrap(), b"%PDF-1.4 report");

    let plan = dir.path().join("Budget").join("Plan.docx");
    assert_eq!(std::fs::read(&plan).unwrap(), b"docx plan");
}

#[tokio::test]
async fn test_menu_pages_fetched_once() {
    // The menu appears on three pages but every entry is visited only once
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    config.crawl.workers = 8;
    let mut coordinator = Coordinator::new(config).unwrap();

    coordinator.run().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let hits = |method: &str, target: &str| {
        requests
            .iter()
            .filter(|request| request.method.to_string() == method)
            .filter(|request| request.url.path() == target && request.url.query().is_none())
            .count()
    };

    assert_eq!(hits("POST", "/login"), 1);
    assert_eq!(hits("GET", "/de/home"), 1);
    assert_eq!(hits("GET", "/de/sitzungen"), 1);
    assert_eq!(hits("GET", "/de/budget"), 1);
}

#[tokio::test]
async fn test_folder_query_replaces_page_query() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let config = create_test_config(
        &server.uri(),
        StartTarget::Link(format!("{}/de/sitzungen?stale=1", server.uri())),
        dir.path(),
    );
    let mut coordinator = Coordinator::new(config).unwrap();

    coordinator.run().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    let folder_request = requests
        .iter()
        .find(|request| request.url.query() == Some("folder=2023"))
        .expect("folder page was not requested");
    assert_eq!(folder_request.url.path(), "/de/sitzungen");
    assert!(dir.path().join("Sitzungen/Report 2023.pdf").exists());
}

#[tokio::test]
async fn test_folder_filter_limits_downloads() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    config.crawl.folder_filter = "Budget".to_string();
    let mut coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.resources_saved, 1);
    assert_eq!(summary.resources_filtered, 1);
    assert!(dir.path().join("Budget/Plan.docx").exists());
    assert!(!dir.path().join("Sitzungen").exists());
}

#[tokio::test]
async fn test_dry_run_writes_nothing() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();
    let root = dir.path().join("downloads");

    let mut config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        &root,
    );
    config.crawl.dry_run = true;
    let mut coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.resources_saved, 0);
    assert_eq!(summary.resources_reported, 2);
    assert!(!root.exists());
}

#[tokio::test]
async fn test_missing_page_is_skipped() {
    let server = MockServer::start().await;
    mount_site(&server).await;
    let dir = TempDir::new().unwrap();

    let config = create_test_config(
        &server.uri(),
        StartTarget::Link(format!("{}/de/archiv", server.uri())),
        dir.path(),
    );
    let mut coordinator = Coordinator::new(config).unwrap();

    let summary = coordinator.run().await.unwrap();

    assert_eq!(summary.fetch_failures, 1);
    assert_eq!(summary.resources_saved, 0);
    assert_eq!(coordinator.state(), CrawlState::Done);
}

#[tokio::test]
async fn test_unreachable_login_is_fatal() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(html_page(MENU))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    config.site.login_url = "http://127.0.0.1:1/login".to_string();
    let mut coordinator = Coordinator::new(config).unwrap();

    let result = coordinator.run().await;

    assert!(matches!(result, Err(HarvestError::Auth { .. })));
    assert_eq!(coordinator.state(), CrawlState::Unauthenticated);
}

#[tokio::test]
async fn test_rejected_login_with_verification() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/login"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(
        &server.uri(),
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    config.crawl.verify_login = true;
    let mut coordinator = Coordinator::new(config).unwrap();

    assert!(matches!(
        coordinator.run().await,
        Err(HarvestError::LoginRejected { status: 401, .. })
    ));
}

#[test]
fn test_missing_credentials_rejected() {
    let dir = TempDir::new().unwrap();
    let mut config = create_test_config(
        "https://site.example",
        StartTarget::Top("home".to_string()),
        dir.path(),
    );
    config.credentials = Credentials::new("", "");

    assert!(matches!(
        Coordinator::new(config),
        Err(HarvestError::Config(_))
    ));
}
