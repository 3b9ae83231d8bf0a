//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler, including:
//! - Building HTTP clients with the configured identity header and timeout
//! - GET requests to fetch page markup
//! - Error classification
//!
//! There is no retry logic: a failed fetch is reported once and the caller
//! decides how to degrade.

use crate::config::UserAgentConfig;
use chrono::{DateTime, Utc};
use reqwest::Client;
use std::future::Future;
use std::time::Duration;
use thiserror::Error;

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: String,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-success status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
        /// Whether the request hit the client timeout
        timed_out: bool,
    },
}

/// A fetch failure, ready to be logged by the caller
#[derive(Debug, Clone, Error)]
pub enum FetchError {
    #[error("HTTP {status_code} for {url}")]
    Http { url: String, status_code: u16 },

    #[error("Request timeout for {url}")]
    Timeout { url: String },

    #[error("Network error for {url}: {error}")]
    Network { url: String, error: String },
}

/// One page request and its outcome
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// The requested URL
    pub url: String,
    pub result: FetchResult,
    pub fetched_at: DateTime<Utc>,
}

impl FetchedPage {
    /// Wraps a fetch outcome, stamping it with the current time
    pub fn new(url: impl Into<String>, result: FetchResult) -> Self {
        Self {
            url: url.into(),
            result,
            fetched_at: Utc::now(),
        }
    }

    /// Returns true if the page body was retrieved
    pub fn is_success(&self) -> bool {
        matches!(self.result, FetchResult::Success { .. })
    }

    /// Consumes the page, returning its markup or the failure
    pub fn into_markup(self) -> Result<String, FetchError> {
        match self.result {
            FetchResult::Success { body, .. } => Ok(body),
            FetchResult::HttpError { status_code } => Err(FetchError::Http {
                url: self.url,
                status_code,
            }),
            FetchResult::NetworkError {
                timed_out: true, ..
            } => Err(FetchError::Timeout { url: self.url }),
            FetchResult::NetworkError { error, .. } => Err(FetchError::Network {
                url: self.url,
                error,
            }),
        }
    }
}

/// Anything that can turn a URL into a [`FetchedPage`]
///
/// The crawler is generic over this so discovery and crawling can run
/// against a live site or an in-memory one.
pub trait PageSource {
    fn fetch(&self, url: &str) -> impl Future<Output = FetchedPage> + Send;
}

/// Builds an HTTP client with the configured identity header
///
/// Redirects follow the reqwest defaults; cookies are not persisted.
///
/// # Example
///
/// ```no_run
/// use qa_harvest::config::UserAgentConfig;
/// use qa_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let client = build_http_client(&UserAgentConfig::default(), Duration::from_secs(10)).unwrap();
/// ```
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header.as_str())
        .timeout(timeout)
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | 2xx with readable body | Success |
/// | Any other status | HttpError |
/// | Timeout | NetworkError (timed_out) |
/// | Connection refused / DNS / TLS | NetworkError |
/// | Body read failure | NetworkError |
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    match client.get(url).send().await {
        Ok(response) => {
            let status = response.status();
            let final_url = response.url().to_string();

            if !status.is_success() {
                return FetchResult::HttpError {
                    status_code: status.as_u16(),
                };
            }

            match response.text().await {
                Ok(body) => FetchResult::Success {
                    final_url,
                    status_code: status.as_u16(),
                    body,
                },
                Err(e) => FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: e.is_timeout(),
                },
            }
        }
        Err(e) => {
            if e.is_timeout() {
                FetchResult::NetworkError {
                    error: "Request timeout".to_string(),
                    timed_out: true,
                }
            } else if e.is_connect() {
                FetchResult::NetworkError {
                    error: "Connection refused".to_string(),
                    timed_out: false,
                }
            } else {
                FetchResult::NetworkError {
                    error: e.to_string(),
                    timed_out: false,
                }
            }
        }
    }
}

/// [`PageSource`] backed by a shared reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the identity config and per-request timeout
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config, timeout)?,
        })
    }
}

impl PageSource for HttpFetcher {
    async fn fetch(&self, url: &str) -> FetchedPage {
        let result = fetch_url(&self.client, url).await;
        FetchedPage::new(url, result)
    }
}
