//! HTTP transport for the crawler
//!
//! This module handles all network traffic of a run:
//! - Building an HTTP client with a cookie store holding the session
//! - The login form POST
//! - GET requests for pages and resources
//! - Error classification

use crate::config::Credentials;
use crate::HarvestError;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// User agent sent with every request
pub const USER_AGENT: &str = concat!("extranet-harvester/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the URL
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Response body
        body: Vec<u8>,
    },

    /// The server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, truncated body, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

/// Outcome of the login POST
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoginOutcome {
    /// Status of the final response after redirects
    pub status_code: u16,
}

impl LoginOutcome {
    /// Returns true for 2xx and 3xx statuses
    pub fn is_success(&self) -> bool {
        (200..400).contains(&self.status_code)
    }
}

/// Capability interface the crawl engine uses to reach the site
///
/// Implementations hold the authenticated session; after
/// [`Transport::authenticate`] every [`Transport::fetch`] carries it.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Posts the credentials as a `username`/`password` form to `login_url`
    ///
    /// Only a failure to issue the request is an error; the response body
    /// is not inspected.
    async fn authenticate(
        &self,
        login_url: &Url,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, HarvestError>;

    /// Issues a GET request within the session
    async fn fetch(&self, url: &Url) -> FetchResult;
}

/// Returns true if a Content-Type denotes an HTML page
///
/// Any media type mentioning `html` counts, so XHTML pages are parsed too.
pub fn is_html(content_type: &str) -> bool {
    content_type.to_ascii_lowercase().contains("html")
}

/// Builds an HTTP client with a cookie store for the session
///
/// # Example
///
/// ```no_run
/// use extranet_harvester::crawler::build_http_client;
///
/// let client = build_http_client().unwrap();
/// ```
pub fn build_http_client() -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(USER_AGENT)
        .cookie_store(true)
        .timeout(Duration::from_secs(120))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Authenticated session backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpSession {
    client: Client,
}

impl HttpSession {
    pub fn new() -> Result<Self, HarvestError> {
        Ok(Self::with_client(build_http_client()?))
    }

    /// Wraps an existing client; it needs a cookie store to keep the session
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpSession {
    async fn authenticate(
        &self,
        login_url: &Url,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, HarvestError> {
        let response = self
            .client
            .post(login_url.clone())
            .form(&[
                ("username", credentials.username.as_str()),
                ("password", credentials.password.as_str()),
            ])
            .send()
            .await
            .map_err(|source| HarvestError::Auth {
                url: login_url.to_string(),
                source,
            })?;

        let status_code = response.status().as_u16();
        tracing::debug!(status = status_code, final_url = %response.url(), "login response");

        Ok(LoginOutcome { status_code })
    }

    async fn fetch(&self, url: &Url) -> FetchResult {
        let response = match self.client.get(url.clone()).send().await {
            Ok(response) => response,
            Err(e) => {
                let error = if e.is_timeout() {
                    "Request timeout".to_string()
                } else if e.is_connect() {
                    format!("Connection failed: {}", e)
                } else {
                    e.to_string()
                };
                return FetchResult::NetworkError { error };
            }
        };

        let status = response.status();
        if !status.is_success() {
            return FetchResult::HttpError {
                status_code: status.as_u16(),
            };
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        match response.bytes().await {
            Ok(body) => FetchResult::Success {
                final_url,
                status_code: status.as_u16(),
                content_type,
                body: body.to_vec(),
            },
            Err(e) => FetchResult::NetworkError {
                error: e.to_string(),
            },
        }
    }
}
