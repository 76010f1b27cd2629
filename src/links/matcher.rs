//! Discovery match rules
//!
//! Patterns are regular expressions matched case-insensitively anywhere in a
//! candidate URL, so a plain substring such as `regulation-155` works too.

use regex::{Regex, RegexBuilder};

/// A compiled set of case-insensitive URL match rules
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    rules: Vec<Regex>,
}

impl PatternSet {
    /// Compiles the given patterns
    ///
    /// Patterns that fail to compile are skipped with a warning; a bad rule
    /// must not disable the rest of the set.
    pub fn compile<S: AsRef<str>>(patterns: &[S]) -> Self {
        let rules = patterns
            .iter()
            .filter_map(|pattern| {
                let pattern = pattern.as_ref();
                match RegexBuilder::new(pattern).case_insensitive(true).build() {
                    Ok(rule) => Some(rule),
                    Err(e) => {
                        tracing::warn!(pattern, error = %e, "Skipping invalid match pattern");
                        None
                    }
                }
            })
            .collect();

        Self { rules }
    }

    /// Returns true if any rule matches the URL
    pub fn matches(&self, url: &str) -> bool {
        self.rules.iter().any(|rule| rule.is_match(url))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
