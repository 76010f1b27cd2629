//! Hyperlink collection for listing pages

use scraper::{Html, Selector};
use url::Url;

/// Collects every `<a href>` target in the document as an absolute URL
///
/// Links are returned in document order; repeated targets are kept so the
/// caller decides how to deduplicate.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let Ok(anchor) = Selector::parse("a[href]") else {
        return Vec::new();
    };

    document
        .select(&anchor)
        .filter_map(|element| element.value().attr("href"))
        .filter_map(|href| resolve_link(href, base_url))
        .collect()
}

/// Resolves a link href to an absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - fragment-only anchors
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if ["javascript:", "mailto:", "tel:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    match absolute.scheme() {
        "http" | "https" => Some(absolute.to_string()),
        _ => None,
    }
}

/// Serializes a URL the same way [`resolve_link`] does
///
/// Host case, percent-encoding, default ports and empty paths are
/// normalized. Strings that do not parse are returned unchanged.
pub fn canonical_url(raw: &str) -> String {
    Url::parse(raw.trim())
        .map(|url| url.to_string())
        .unwrap_or_else(|_| raw.to_string())
}
