//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the monitor, including:
//! - Building HTTP clients with a browser-like header set
//! - GET requests to fetch page content
//! - Retry logic with linear backoff for transient failures
//! - Error classification into typed fetch failures

use crate::config::HttpConfig;
use async_trait::async_trait;
use reqwest::header::{
    HeaderMap, HeaderName, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CACHE_CONTROL, CONTENT_TYPE,
    UPGRADE_INSECURE_REQUESTS,
};
use reqwest::Client;
use std::time::Duration;
use thiserror::Error;

const BROWSER_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
                              image/avif,image/webp,image/apng,*/*;q=0.8";
const FALLBACK_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";

/// Why a fetch did not produce a page
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection, TLS, DNS or timeout failure
    #[error("network error: {0}")]
    Network(String),

    /// The server answered with a non-2xx status
    #[error("HTTP status {0}")]
    Status(u16),

    /// The response body could not be read
    #[error("failed to read response body: {0}")]
    Body(String),
}

/// Result of a fetch operation
#[derive(Debug, Clone)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// HTTP status code
        status_code: u16,
        /// Content-Type header value
        content_type: String,
        /// Page body content
        body: String,
        /// Attempts used, including the successful one
        attempts: u32,
    },

    /// Every attempt failed; carries the last error
    Failed {
        error: FetchError,
        /// Attempts made before giving up
        attempts: u32,
    },
}

impl FetchResult {
    /// Returns true if the page was fetched
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// Number of attempts that were made
    pub fn attempts(&self) -> u32 {
        match self {
            Self::Success { attempts, .. } | Self::Failed { attempts, .. } => *attempts,
        }
    }

    /// Number of retries, i.e. attempts after the first
    pub fn retries(&self) -> u32 {
        self.attempts().saturating_sub(1)
    }

    /// Converts into the page body or the final error
    pub fn into_body(self) -> Result<String, FetchError> {
        match self {
            Self::Success { body, .. } => Ok(body),
            Self::Failed { error, .. } => Err(error),
        }
    }
}

/// Anything that can fetch a page by URL
///
/// Implementations never fail hard: every outcome is a [`FetchResult`].
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> FetchResult;
}

/// Retry settings for [`HttpFetcher`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, including the first
    pub max_attempts: u32,

    /// Attempt `k` is followed by a wait of `k * base_delay`
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Delay to wait after the given failed attempt (1-based)
    pub fn delay_after(&self, attempt: u32) -> Duration {
        self.base_delay * attempt
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_secs(2),
        }
    }
}

impl From<&HttpConfig> for RetryPolicy {
    fn from(config: &HttpConfig) -> Self {
        Self {
            max_attempts: config.max_attempts.max(1),
            base_delay: Duration::from_millis(config.retry_delay_ms),
        }
    }
}

/// Builds an HTTP client that presents itself like a desktop browser
///
/// # Arguments
///
/// * `config` - The fetcher configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
///
/// # Example
///
/// ```no_run
/// use reg_watch::config::HttpConfig;
/// use reg_watch::monitor::build_http_client;
///
/// let client = build_http_client(&HttpConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &HttpConfig) -> Result<Client, reqwest::Error> {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(BROWSER_ACCEPT));
    headers.insert(
        ACCEPT_LANGUAGE,
        HeaderValue::from_str(&config.accept_language)
            .unwrap_or_else(|_| HeaderValue::from_static(FALLBACK_ACCEPT_LANGUAGE)),
    );
    headers.insert(CACHE_CONTROL, HeaderValue::from_static("max-age=0"));
    headers.insert(UPGRADE_INSECURE_REQUESTS, HeaderValue::from_static("1"));
    for (name, value) in [
        ("sec-fetch-dest", "document"),
        ("sec-fetch-mode", "navigate"),
        ("sec-fetch-site", "none"),
        ("sec-fetch-user", "?1"),
    ] {
        headers.insert(HeaderName::from_static(name), HeaderValue::from_static(value));
    }

    Client::builder()
        .user_agent(config.user_agent.as_str())
        .default_headers(headers)
        .timeout(Duration::from_secs(config.timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches pages over HTTP with retries
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    retry: RetryPolicy,
}

impl HttpFetcher {
    /// Creates a fetcher from the `[http]` configuration section
    pub fn new(config: &HttpConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: build_http_client(config)?,
            retry: RetryPolicy::from(config),
        })
    }

    /// Replaces the retry policy
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Performs a single GET attempt
    async fn attempt(&self, url: &str) -> Result<(u16, String, String), FetchError> {
        let response = self.client.get(url).send().await.map_err(classify_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        let body = response
            .text()
            .await
            .map_err(|e| FetchError::Body(e.to_string()))?;

        Ok((status.as_u16(), content_type, body))
    }
}

#[async_trait]
impl Fetch for HttpFetcher {
    /// Fetches a URL, retrying failures with linear backoff
    ///
    /// # Retry Logic
    ///
    /// | Condition | Action |
    /// |-----------|--------|
    /// | HTTP 2xx | Success |
    /// | HTTP non-2xx | Retry |
    /// | Timeout / connect / TLS error | Retry |
    /// | Body read error | Retry |
    /// | Last attempt fails | Failed with that error |
    async fn fetch(&self, url: &str) -> FetchResult {
        let max_attempts = self.retry.max_attempts.max(1);
        let mut attempt = 1;

        loop {
            match self.attempt(url).await {
                Ok((status_code, content_type, body)) => {
                    tracing::info!(
                        url,
                        status = status_code,
                        content_type = %content_type,
                        attempts = attempt,
                        "Fetched page"
                    );
                    return FetchResult::Success {
                        status_code,
                        content_type,
                        body,
                        attempts: attempt,
                    };
                }
                Err(error) if attempt < max_attempts => {
                    let delay = self.retry.delay_after(attempt);
                    tracing::warn!(
                        url,
                        attempt,
                        max_attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %error,
                        "Fetch failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(error) => {
                    tracing::error!(url, attempts = attempt, error = %error, "Fetch failed");
                    return FetchResult::Failed {
                        error,
                        attempts: attempt,
                    };
                }
            }
        }
    }
}

fn classify_error(e: reqwest::Error) -> FetchError {
    if e.is_timeout() {
        FetchError::Network("request timeout".to_string())
    } else if e.is_connect() {
        FetchError::Network(format!("connection failed: {}", e))
    } else {
        FetchError::Network(e.to_string())
    }
}
