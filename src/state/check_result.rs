use crate::config::{Source, Version};
use crate::state::CheckStatus;
use chrono::{DateTime, Local};

/// One row of a check run report
///
/// Results are regenerated on every run and never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckResult {
    /// Display name, `"<source> (<label>)"`
    pub name: String,

    /// Name of the owning source
    pub source: String,

    pub url: String,

    /// Version label
    pub label: String,

    /// Year-month of the version, if known
    pub date: Option<String>,

    pub status: CheckStatus,

    /// When this version was checked
    pub checked_at: DateTime<Local>,
}

impl CheckResult {
    /// Creates a result for a version checked just now
    pub fn new(source: &Source, version: &Version, status: CheckStatus) -> Self {
        Self {
            name: format!("{} ({})", source.name, version.label),
            source: source.name.clone(),
            url: version.url.clone(),
            label: version.label.clone(),
            date: version.date.clone(),
            status,
            checked_at: Local::now(),
        }
    }

    /// Formats the check time as `YYYY-MM-DD HH:MM:SS`
    pub fn timestamp(&self) -> String {
        self.checked_at.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SourceKind;

    #[test]
    fn test_new_copies_identifying_fields() {
        let source = Source {
            name: "UN-R155".to_string(),
            kind: SourceKind::Listing,
            base_url: "https://unece.org/transport/documents".to_string(),
            selector: None,
            patterns: vec![],
            versions: vec![],
        };
        let version = Version::new(
            "https://unece.org/r155",
            "amendment1",
            Some("2022-11".to_string()),
        );

        let result = CheckResult::new(&source, &version, CheckStatus::Changed);

        assert_eq!(result.name, "UN-R155 (amendment1)");
        assert_eq!(result.source, "UN-R155");
        assert_eq!(result.url, "https://unece.org/r155");
        assert_eq!(result.label, "amendment1");
        assert_eq!(result.date.as_deref(), Some("2022-11"));
        assert_eq!(result.status, CheckStatus::Changed);
        assert_eq!(result.timestamp().len(), 19);
    }
}
