//! Update checker - top-level check run orchestration
//!
//! This module drives one complete check run:
//! - Discovering new versions on listing sources and persisting them
//! - Fetching, extracting and fingerprinting every tracked version
//! - Classifying each version against its stored fingerprint
//! - Persisting the updated fingerprints and returning the report

use crate::config::{StateStore, Version, WatchConfig};
use crate::monitor::discovery::discover_versions;
use crate::monitor::extract::extract_content;
use crate::monitor::fetcher::{Fetch, FetchResult};
use crate::monitor::fingerprint::fingerprint;
use crate::state::{CheckResult, CheckStatus};
use crate::WatchError;

/// Selector hint applied to every version during a check run
///
/// Custom selectors registered on page sources are not consulted here.
pub const DEFAULT_CONTENT_HINT: &str = "main";

/// Check run coordinator
pub struct UpdateChecker<'a, F: ?Sized, S: ?Sized> {
    fetcher: &'a F,
    store: &'a S,
}

impl<'a, F, S> UpdateChecker<'a, F, S>
where
    F: Fetch + ?Sized,
    S: StateStore + ?Sized,
{
    pub fn new(fetcher: &'a F, store: &'a S) -> Self {
        Self { fetcher, store }
    }

    /// Runs a full check over every source
    ///
    /// # Run Flow
    ///
    /// 1. For each source, discover new versions; if any were found, append
    ///    them and persist immediately
    /// 2. Check every version in listing order
    /// 3. Persist the whole configuration once more
    ///
    /// # Returns
    ///
    /// * `Ok(Vec<CheckResult>)` - One result per version, in source/version order
    /// * `Err(WatchError)` - Persisting the configuration failed
    pub async fn run(&self, config: &mut WatchConfig) -> Result<Vec<CheckResult>, WatchError> {
        tracing::info!(
            sources = config.sources.len(),
            versions = config.version_count(),
            "Starting update check"
        );

        let mut results = Vec::with_capacity(config.version_count());

        for source_idx in 0..config.sources.len() {
            let discovered = discover_versions(self.fetcher, &config.sources[source_idx]).await;
            if !discovered.is_empty() {
                config.sources[source_idx].versions.extend(discovered);
                self.store.save(config)?;
            }

            for version_idx in 0..config.sources[source_idx].versions.len() {
                let version = &mut config.sources[source_idx].versions[version_idx];
                tracing::info!(label = %version.label, url = %version.url, "Checking version");

                let status = self.check_version(version).await;

                let source = &config.sources[source_idx];
                results.push(CheckResult::new(
                    source,
                    &source.versions[version_idx],
                    status,
                ));
            }
        }

        self.store.save(config)?;

        let changed = results.iter().filter(|r| r.status.is_change()).count();
        let failed = results.iter().filter(|r| r.status.is_failure()).count();
        tracing::info!(
            checked = results.len(),
            changed,
            failed,
            "Update check complete"
        );

        Ok(results)
    }

    /// Fetches, extracts and fingerprints one version
    ///
    /// The stored fingerprint is only touched when content was extracted.
    async fn check_version(&self, version: &mut Version) -> CheckStatus {
        let body = match self.fetcher.fetch(&version.url).await {
            FetchResult::Success { body, .. } => body,
            FetchResult::Failed { .. } => return CheckStatus::FetchFailed,
        };

        let content = extract_content(&body, DEFAULT_CONTENT_HINT);
        if content.is_empty() {
            tracing::warn!(url = %version.url, "No content extracted, keeping previous fingerprint");
            return CheckStatus::FetchFailed;
        }

        record_fingerprint(version, fingerprint(&content))
    }
}

/// Classifies a new fingerprint and stores it as the version's baseline
pub fn record_fingerprint(version: &mut Version, fingerprint: String) -> CheckStatus {
    let status = CheckStatus::classify(&version.fingerprint, &fingerprint);
    version.fingerprint = fingerprint;
    status
}

/// Runs one check over every tracked version
///
/// This is the main entry point callers schedule. See [`UpdateChecker::run`].
pub async fn check_updates<F, S>(
    fetcher: &F,
    store: &S,
    config: &mut WatchConfig,
) -> Result<Vec<CheckResult>, WatchError>
where
    F: Fetch + ?Sized,
    S: StateStore + ?Sized,
{
    UpdateChecker::new(fetcher, store).run(config).await
}
