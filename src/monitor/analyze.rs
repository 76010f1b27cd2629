//! Page structure analysis for choosing content selectors
//!
//! An authoring aid for operators adding a new source: it counts class names
//! and element IDs on a page and proposes the most frequent ones as
//! selectors, next to the generic landmark containers.

use crate::monitor::extract::LANDMARK_SELECTORS;
use crate::monitor::fetcher::{Fetch, FetchError};
use scraper::{Html, Selector};
use std::collections::HashMap;

/// Number of class and ID suggestions returned by [`analyze_page`]
pub const DEFAULT_SUGGESTIONS: usize = 5;

const GENERIC_SUGGESTIONS: [&str; 3] = ["main", "article", "div.content"];

/// Selector suggestions for one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageAnalysis {
    pub url: String,

    /// Generic selectors first, then frequent classes, then frequent IDs
    pub suggested_selectors: Vec<String>,

    /// Landmark selectors that match at least one element on the page
    pub landmarks_found: Vec<String>,
}

/// Class and ID frequencies, in order of first appearance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributeTally {
    pub classes: Vec<(String, usize)>,
    pub ids: Vec<(String, usize)>,
}

impl AttributeTally {
    /// The `n` most frequent classes; ties keep first-appearance order
    pub fn top_classes(&self, n: usize) -> Vec<&str> {
        top(&self.classes, n)
    }

    /// The `n` most frequent IDs; ties keep first-appearance order
    pub fn top_ids(&self, n: usize) -> Vec<&str> {
        top(&self.ids, n)
    }
}

fn top(counts: &[(String, usize)], n: usize) -> Vec<&str> {
    let mut sorted: Vec<_> = counts.iter().collect();
    sorted.sort_by(|a, b| b.1.cmp(&a.1));
    sorted
        .into_iter()
        .take(n)
        .map(|(name, _)| name.as_str())
        .collect()
}

#[derive(Default)]
struct Counter {
    counts: Vec<(String, usize)>,
    index: HashMap<String, usize>,
}

impl Counter {
    fn add(&mut self, name: &str) {
        match self.index.get(name) {
            Some(&i) => self.counts[i].1 += 1,
            None => {
                self.index.insert(name.to_string(), self.counts.len());
                self.counts.push((name.to_string(), 1));
            }
        }
    }
}

/// Counts every class name and element ID in the document
pub fn tally_attributes(document: &Html) -> AttributeTally {
    let mut classes = Counter::default();
    let mut ids = Counter::default();

    if let Ok(all) = Selector::parse("*") {
        for element in document.select(&all) {
            for class in element.value().classes() {
                classes.add(class);
            }
            if let Some(id) = element.value().id() {
                ids.add(id);
            }
        }
    }

    AttributeTally {
        classes: classes.counts,
        ids: ids.counts,
    }
}

/// Builds selector suggestions from raw HTML
pub fn analyze_html(url: &str, html: &str, top_n: usize) -> PageAnalysis {
    let document = Html::parse_document(html);
    let tally = tally_attributes(&document);

    let mut suggested_selectors: Vec<String> =
        GENERIC_SUGGESTIONS.iter().map(|s| s.to_string()).collect();
    suggested_selectors.extend(tally.top_classes(top_n).into_iter().map(|c| format!(".{}", c)));
    suggested_selectors.extend(tally.top_ids(top_n).into_iter().map(|id| format!("#{}", id)));

    let landmarks_found = LANDMARK_SELECTORS
        .iter()
        .filter(|landmark| {
            Selector::parse(landmark)
                .map(|s| document.select(&s).next().is_some())
                .unwrap_or(false)
        })
        .map(|landmark| landmark.to_string())
        .collect();

    PageAnalysis {
        url: url.to_string(),
        suggested_selectors,
        landmarks_found,
    }
}

/// Fetches a page and suggests selectors for it
pub async fn analyze_page<F: Fetch + ?Sized>(
    fetcher: &F,
    url: &str,
) -> Result<PageAnalysis, FetchError> {
    let body = fetcher.fetch(url).await.into_body()?;
    Ok(analyze_html(url, &body, DEFAULT_SUGGESTIONS))
}
