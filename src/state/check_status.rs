//! Classification of one version in one check run
//!
//! This module defines the closed set of outcomes the update checker can
//! report. Human-readable labels belong to the output layer.

use std::fmt;

/// Outcome of checking a single version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CheckStatus {
    /// No baseline existed; this run recorded the first fingerprint
    FirstCheck,

    /// The fingerprint differs from the stored baseline
    Changed,

    /// The fingerprint equals the stored baseline
    Unchanged,

    /// The page could not be fetched or yielded no content
    FetchFailed,

    /// Not yet classified
    #[default]
    Unknown,
}

impl CheckStatus {
    /// Classifies a freshly computed fingerprint against the stored one
    ///
    /// An empty stored fingerprint always means [`CheckStatus::FirstCheck`].
    pub fn classify(stored: &str, current: &str) -> Self {
        if stored.is_empty() {
            Self::FirstCheck
        } else if stored != current {
            Self::Changed
        } else {
            Self::Unchanged
        }
    }

    /// Returns true if the remote content changed since the last run
    pub fn is_change(&self) -> bool {
        matches!(self, Self::Changed)
    }

    /// Returns true if a fingerprint was computed in this run
    pub fn is_success(&self) -> bool {
        matches!(self, Self::FirstCheck | Self::Changed | Self::Unchanged)
    }

    /// Returns true if the version could not be checked
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::FetchFailed)
    }

    /// Stable machine-readable name
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstCheck => "first_check",
            Self::Changed => "changed",
            Self::Unchanged => "unchanged",
            Self::FetchFailed => "fetch_failed",
            Self::Unknown => "unknown",
        }
    }

    /// Returns all statuses in report order
    pub fn all() -> [Self; 5] {
        [
            Self::Changed,
            Self::FirstCheck,
            Self::Unchanged,
            Self::FetchFailed,
            Self::Unknown,
        ]
    }
}

impl fmt::Display for CheckStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
