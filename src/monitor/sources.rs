//! Adding hand-picked page sources

use crate::config::{Source, SourceKind, Version, WatchConfig};
use crate::monitor::extract::extract_content;
use crate::monitor::fetcher::Fetch;
use crate::WatchError;
use url::Url;

/// Label given to the single version of a page source
pub const PAGE_VERSION_LABEL: &str = "current";

/// Adds a single-page source after a successful test extraction
///
/// The page is fetched and extracted with `selector` first so that an
/// operator learns about a bad selector immediately. The new source tracks
/// one unchecked version; the next check run records its baseline. The
/// caller is responsible for persisting `config`.
///
/// # Errors
///
/// * `WatchError::InvalidSource` - Missing field, bad URL, or duplicate name
/// * `WatchError::Fetch` - The page could not be fetched
/// * `WatchError::SelectorMiss` - The selector cascade found no content
pub async fn add_page_source<F: Fetch + ?Sized>(
    fetcher: &F,
    config: &mut WatchConfig,
    name: &str,
    url: &str,
    selector: &str,
) -> Result<(), WatchError> {
    let (name, url, selector) = (name.trim(), url.trim(), selector.trim());
    if name.is_empty() || url.is_empty() || selector.is_empty() {
        return Err(WatchError::InvalidSource(
            "name, URL and selector are all required".to_string(),
        ));
    }

    let parsed = Url::parse(url)
        .map_err(|e| WatchError::InvalidSource(format!("invalid URL '{}': {}", url, e)))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(WatchError::InvalidSource(format!(
            "URL '{}' must use http or https",
            url
        )));
    }

    if config.source(name).is_some() {
        return Err(WatchError::InvalidSource(format!(
            "a source named '{}' already exists",
            name
        )));
    }

    let body = fetcher
        .fetch(url)
        .await
        .into_body()
        .map_err(|source| WatchError::Fetch {
            url: url.to_string(),
            source,
        })?;

    if extract_content(&body, selector).is_empty() {
        return Err(WatchError::SelectorMiss {
            url: url.to_string(),
            selector: selector.to_string(),
        });
    }

    config.sources.push(Source {
        name: name.to_string(),
        kind: SourceKind::Page,
        base_url: url.to_string(),
        selector: Some(selector.to_string()),
        patterns: Vec::new(),
        versions: vec![Version::new(url, PAGE_VERSION_LABEL, None)],
    });

    tracing::info!(name, url, selector, "Added page source");
    Ok(())
}
