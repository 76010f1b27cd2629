//! Per-status counts for a check run

use crate::output::status_label;
use crate::state::{CheckResult, CheckStatus};
use std::collections::HashMap;

/// How many versions ended in each status during one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub by_status: HashMap<CheckStatus, usize>,
}

impl RunSummary {
    /// Tallies the statuses of a run's results
    pub fn from_results(results: &[CheckResult]) -> Self {
        let mut by_status = HashMap::new();
        for result in results {
            *by_status.entry(result.status).or_insert(0) += 1;
        }
        Self {
            total: results.len(),
            by_status,
        }
    }

    /// Number of results with the given status
    pub fn count(&self, status: CheckStatus) -> usize {
        self.by_status.get(&status).copied().unwrap_or(0)
    }

    /// Number of versions whose content changed
    pub fn changed(&self) -> usize {
        self.count(CheckStatus::Changed)
    }

    /// Number of versions that could not be checked
    pub fn failed(&self) -> usize {
        self.count(CheckStatus::FetchFailed)
    }

    /// Percentage of versions that produced a fingerprint this run
    pub fn success_rate(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        let succeeded: usize = CheckStatus::all()
            .iter()
            .filter(|s| s.is_success())
            .map(|s| self.count(*s))
            .sum();
        (succeeded as f64 / self.total as f64) * 100.0
    }
}

/// Formats the summary block printed after the results table
pub fn format_summary(summary: &RunSummary) -> String {
    let mut out = format!("Checked {} versions:\n", summary.total);

    for status in CheckStatus::all() {
        let count = summary.count(status);
        if count > 0 {
            out.push_str(&format!("  {}: {}\n", status_label(status), count));
        }
    }

    out.push_str(&format!("Success rate: {:.1}%\n", summary.success_rate()));
    out
}
