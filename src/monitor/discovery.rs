//! Version discovery on listing pages
//!
//! A listing source's base page is scanned for hyperlinks that match the
//! source's patterns and are not tracked yet. Each match becomes a proposed
//! [`Version`]; nothing is written back to the source here.

use crate::config::{Source, Version};
use crate::links::{extract_links, infer_year_month, PatternSet};
use crate::monitor::fetcher::Fetch;
use scraper::Html;
use std::collections::HashSet;
use url::Url;

/// Fetches a source's listing page and proposes untracked versions
///
/// Discovery never fails the caller: fetch or URL errors are logged and an
/// empty list is returned, so the per-version check that follows still runs.
pub async fn discover_versions<F: Fetch + ?Sized>(fetcher: &F, source: &Source) -> Vec<Version> {
    if !source.kind.supports_discovery() {
        return Vec::new();
    }

    let base_url = match Url::parse(&source.base_url) {
        Ok(url) => url,
        Err(e) => {
            tracing::error!(
                source = %source.name,
                base_url = %source.base_url,
                error = %e,
                "Invalid listing URL, skipping discovery"
            );
            return Vec::new();
        }
    };

    let body = match fetcher.fetch(base_url.as_str()).await.into_body() {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(
                source = %source.name,
                error = %e,
                "Failed to fetch listing page, skipping discovery"
            );
            return Vec::new();
        }
    };

    let found = find_candidates(&body, &base_url, source);
    if !found.is_empty() {
        tracing::info!(
            source = %source.name,
            count = found.len(),
            "Discovered new versions"
        );
    }
    found
}

/// Finds untracked, pattern-matching links in a listing page
///
/// Each URL is proposed at most once, in document order. Labels continue the
/// source's version count (`new_version_<n>`); dates come from a `/YYYY/MM/`
/// path segment when present.
pub fn find_candidates(html: &str, base_url: &Url, source: &Source) -> Vec<Version> {
    let patterns = PatternSet::compile(&source.patterns);
    if patterns.is_empty() {
        return Vec::new();
    }

    let document = Html::parse_document(html);
    let mut proposed: HashSet<String> = HashSet::new();
    let mut candidates = Vec::new();

    for link in extract_links(&document, base_url) {
        if proposed.contains(&link) || !patterns.matches(&link) || source.tracks_url(&link) {
            continue;
        }

        let label = format!(
            "new_version_{}",
            source.versions.len() + candidates.len() + 1
        );
        let date = infer_year_month(&link);
        proposed.insert(link.clone());
        candidates.push(Version::new(link, label, date));
    }

    candidates
}
