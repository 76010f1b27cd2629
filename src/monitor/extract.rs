//! Content extraction with a selector fallback cascade
//!
//! Pages are located by a hint selector. When the hint does not match as
//! written, it is retried as an element ID, as a class name, token by token,
//! and finally a fixed list of landmark containers is tried. The first stage
//! that matches any element wins.

use crate::monitor::analyze::tally_attributes;
use scraper::{ElementRef, Html, Selector};

/// Landmark containers tried when the hint itself finds nothing
pub const LANDMARK_SELECTORS: [&str; 4] = ["main", "article", "div.content", "div.main-content"];

const DIAGNOSTIC_SAMPLE: usize = 10;
const HTML_SAMPLE_CHARS: usize = 500;

/// One stage of the selector cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectorStrategy {
    /// The hint exactly as given
    AsGiven,
    /// The hint as an element ID (`#hint`)
    Id,
    /// The hint as a class name (`.hint`)
    Class,
    /// Each whitespace-separated token of the hint on its own
    Tokens,
    /// Generic landmark containers
    Landmarks,
}

impl SelectorStrategy {
    /// Stages in the order they are tried
    pub const CASCADE: [Self; 5] = [
        Self::AsGiven,
        Self::Id,
        Self::Class,
        Self::Tokens,
        Self::Landmarks,
    ];

    /// Selector strings this stage tries for the given hint, in order
    pub fn candidates(&self, hint: &str) -> Vec<String> {
        match self {
            Self::AsGiven => vec![hint.to_string()],
            Self::Id => vec![format!("#{}", hint)],
            Self::Class => vec![format!(".{}", hint)],
            Self::Tokens => hint.split_whitespace().map(str::to_string).collect(),
            Self::Landmarks => LANDMARK_SELECTORS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Returns the elements matched by the first candidate that matches
    ///
    /// Candidates that are not valid CSS are treated as misses.
    pub fn resolve<'a>(&self, document: &'a Html, hint: &str) -> Option<Vec<ElementRef<'a>>> {
        self.candidates(hint)
            .iter()
            .find_map(|candidate| select_all(document, candidate))
    }
}

/// Runs the cascade and reports which stage matched
pub fn resolve_cascade<'a>(
    document: &'a Html,
    hint: &str,
) -> Option<(SelectorStrategy, Vec<ElementRef<'a>>)> {
    SelectorStrategy::CASCADE
        .iter()
        .find_map(|strategy| strategy.resolve(document, hint).map(|found| (*strategy, found)))
}

/// Extracts normalized text for a hint selector from raw HTML
///
/// Returns an empty string when nothing matched.
///
/// # Example
///
/// ```
/// use reg_watch::monitor::extract_content;
///
/// let text = extract_content("<main>Hello <script>x</script>World</main>", "main");
/// assert_eq!(text, "Hello World");
/// ```
pub fn extract_content(html: &str, selector: &str) -> String {
    let document = Html::parse_document(html);
    extract_from_document(&document, selector)
}

/// Extracts normalized text for a hint selector from a parsed document
pub fn extract_from_document(document: &Html, selector: &str) -> String {
    let Some((strategy, elements)) = resolve_cascade(document, selector) else {
        log_extraction_miss(document, selector);
        return String::new();
    };

    tracing::debug!(
        selector,
        ?strategy,
        matched = elements.len(),
        "Selector cascade matched"
    );

    elements
        .into_iter()
        .map(element_text)
        .filter(|text| !text.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Visible text of an element with script and style content removed
///
/// Whitespace runs collapse to single spaces and the result is trimmed.
pub fn element_text(element: ElementRef<'_>) -> String {
    let mut raw = String::new();
    collect_text(element, &mut raw);
    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        if let Some(text) = child.value().as_text() {
            out.push_str(text);
            out.push(' ');
        } else if let Some(child_element) = ElementRef::wrap(child) {
            if !matches!(child_element.value().name(), "script" | "style") {
                collect_text(child_element, out);
            }
        }
    }
}

fn select_all<'a>(document: &'a Html, selector: &str) -> Option<Vec<ElementRef<'a>>> {
    let selector = Selector::parse(selector).ok()?;
    let found: Vec<_> = document.select(&selector).collect();
    (!found.is_empty()).then_some(found)
}

fn count_tag(document: &Html, tag: &str) -> usize {
    Selector::parse(tag)
        .map(|selector| document.select(&selector).count())
        .unwrap_or(0)
}

/// Logs enough page structure for an operator to pick a better selector
fn log_extraction_miss(document: &Html, selector: &str) {
    let tally = tally_attributes(document);
    let classes = tally
        .classes
        .iter()
        .take(DIAGNOSTIC_SAMPLE)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");
    let ids = tally
        .ids
        .iter()
        .take(DIAGNOSTIC_SAMPLE)
        .map(|(name, _)| name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    tracing::warn!(
        selector,
        available_classes = %classes,
        available_ids = %ids,
        main_tags = count_tag(document, "main"),
        article_tags = count_tag(document, "article"),
        "No content matched the selector cascade"
    );

    let sample: String = document.html().chars().take(HTML_SAMPLE_CHARS).collect();
    tracing::debug!(html_sample = %sample, "Unmatched page sample");
}
