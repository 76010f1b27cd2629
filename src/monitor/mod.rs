//! Monitor module: the change-detection pipeline
//!
//! This module contains the core monitoring logic, including:
//! - HTTP fetching with retry logic
//! - Content extraction through a selector cascade
//! - Content fingerprinting
//! - Version discovery on listing pages
//! - Overall check run orchestration
//!
//! It also hosts two authoring aids for operators: selector analysis and
//! adding single-page sources.

mod analyze;
mod checker;
mod discovery;
mod extract;
mod fetcher;
mod fingerprint;
mod sources;

#[cfg(test)]
mod testing;

pub use analyze::{
    analyze_html, analyze_page, tally_attributes, AttributeTally, PageAnalysis,
    DEFAULT_SUGGESTIONS,
};
pub use checker::{check_updates, record_fingerprint, UpdateChecker, DEFAULT_CONTENT_HINT};
pub use discovery::{discover_versions, find_candidates};
pub use extract::{
    element_text, extract_content, extract_from_document, resolve_cascade, SelectorStrategy,
    LANDMARK_SELECTORS,
};
pub use fetcher::{build_http_client, Fetch, FetchError, FetchResult, HttpFetcher, RetryPolicy};
pub use fingerprint::fingerprint;
pub use sources::{add_page_source, PAGE_VERSION_LABEL};
