//! Integration tests for reg-watch
//!
//! These tests use wiremock to stand in for the monitored sites.

mod check_tests;
mod fetch_tests;

use reg_watch::config::HttpConfig;
use reg_watch::monitor::{HttpFetcher, RetryPolicy};
use std::time::Duration;

/// Fetcher with the production attempt count but a very short backoff
pub fn fast_fetcher() -> HttpFetcher {
    HttpFetcher::new(&HttpConfig::default())
        .expect("Failed to build HTTP client")
        .with_retry(RetryPolicy {
            max_attempts: 3,
            base_delay: Duration::from_millis(10),
        })
}
