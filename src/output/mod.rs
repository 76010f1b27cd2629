//! Output module for presenting check runs
//!
//! This module handles:
//! - Human-readable labels for check statuses
//! - The results table printed after a run
//! - Per-status summary counts
//! - The tracked source listing

mod summary;
mod table;

pub use summary::{format_summary, RunSummary};
pub use table::{format_results_table, format_sources, UNKNOWN_DATE};

use crate::state::CheckStatus;

/// Display label for a check status
pub fn status_label(status: CheckStatus) -> &'static str {
    match status {
        CheckStatus::FirstCheck => "First check",
        CheckStatus::Changed => "Changed",
        CheckStatus::Unchanged => "Unchanged",
        CheckStatus::FetchFailed => "Fetch failed",
        CheckStatus::Unknown => "Unknown",
    }
}
