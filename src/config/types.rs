use crate::links::canonical_url;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Persisted state for reg-watch
///
/// Scalar settings come first so the TOML serializer can emit them before
/// any tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct WatchConfig {
    /// Hours between scheduled check runs
    #[serde(default = "default_check_interval_hours")]
    pub check_interval_hours: u64,

    /// File that log output is appended to
    #[serde(default = "default_log_file")]
    pub log_file: String,

    /// HTTP fetcher settings
    #[serde(default)]
    pub http: HttpConfig,

    /// Notification settings, consumed by the notifier only
    #[serde(default)]
    pub notification: NotificationConfig,

    /// Monitored sources
    #[serde(default)]
    pub sources: Vec<Source>,
}

impl WatchConfig {
    /// Looks up a source by name
    pub fn source(&self, name: &str) -> Option<&Source> {
        self.sources.iter().find(|s| s.name == name)
    }

    /// Total number of tracked versions across all sources
    pub fn version_count(&self) -> usize {
        self.sources.iter().map(|s| s.versions.len()).sum()
    }

    /// Time between scheduled runs, clamped to 1 hour..=1 year
    pub fn check_interval(&self) -> Duration {
        let hours = self
            .check_interval_hours
            .clamp(1, crate::config::MAX_CHECK_INTERVAL_HOURS);
        Duration::from_secs(hours.saturating_mul(3600))
    }
}

/// Fetcher behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct HttpConfig {
    /// Browser-like User-Agent sent with every request
    pub user_agent: String,

    /// Accept-Language header value
    pub accept_language: String,

    /// Per-attempt request timeout (seconds)
    pub timeout_secs: u64,

    /// Total attempts per fetch, including the first
    pub max_attempts: u32,

    /// Base retry delay (milliseconds); attempt k waits k times this
    pub retry_delay_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/122.0.0.0 Safari/537.36"
                .to_string(),
            accept_language: "en-US,en;q=0.9".to_string(),
            timeout_secs: 30,
            max_attempts: 3,
            retry_delay_ms: 2000,
        }
    }
}

/// Notification settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationConfig {
    #[serde(default)]
    pub email: EmailConfig,
}

/// Mail transport parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct EmailConfig {
    pub enabled: bool,
    pub smtp_server: String,
    pub smtp_port: u16,
    pub username: String,
    pub password: String,
    pub sender: String,
    pub recipients: Vec<String>,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            smtp_server: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: String::new(),
            password: String::new(),
            sender: String::new(),
            recipients: Vec::new(),
        }
    }
}

/// How a source is monitored
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A listing page that is crawled for new document versions
    #[serde(alias = "unece")]
    Listing,

    /// A single page added by hand with a custom selector
    Page,
}

impl SourceKind {
    /// Returns true if version discovery applies to this kind
    pub fn supports_discovery(&self) -> bool {
        matches!(self, Self::Listing)
    }
}

/// A monitored regulatory topic
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct Source {
    pub name: String,

    pub kind: SourceKind,

    /// Listing page URL (or the page itself for page sources)
    pub base_url: String,

    /// Selector registered when the source was added by hand
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,

    /// Case-insensitive regex rules for discovery
    #[serde(default)]
    pub patterns: Vec<String>,

    #[serde(default)]
    pub versions: Vec<Version>,
}

impl Source {
    /// Returns true if a version with this URL is already tracked
    ///
    /// URLs are compared in canonical form, so `https://UNECE.org/a` and
    /// `https://unece.org/a` refer to the same version.
    pub fn tracks_url(&self, url: &str) -> bool {
        let wanted = canonical_url(url);
        self.versions
            .iter()
            .any(|v| v.url == url || canonical_url(&v.url) == wanted)
    }
}

/// One tracked document instance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Version {
    pub url: String,

    pub label: String,

    /// Year-month (`YYYY-MM`), absent when unknown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,

    /// Last content fingerprint; empty means never checked
    #[serde(default)]
    pub fingerprint: String,
}

impl Version {
    /// Creates a version that has never been checked
    pub fn new(url: impl Into<String>, label: impl Into<String>, date: Option<String>) -> Self {
        Self {
            url: url.into(),
            label: label.into(),
            date,
            fingerprint: String::new(),
        }
    }

    /// Returns true if no baseline fingerprint has been recorded yet
    pub fn is_unchecked(&self) -> bool {
        self.fingerprint.is_empty()
    }
}

fn default_check_interval_hours() -> u64 {
    24
}

fn default_log_file() -> String {
    "reg_watch.log".to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracks_url_ignores_host_case_and_encoding() {
        let source = Source {
            name: "UN-R155".to_string(),
            kind: SourceKind::Listing,
            base_url: "https://unece.org/transport/documents".to_string(),
            selector: None,
            patterns: vec![],
            versions: vec![Version::new("https://unece.org/docs/規則", "original", None)],
        };

        assert!(source.tracks_url("https://unece.org/docs/規則"));
        assert!(source.tracks_url("https://UNECE.org/docs/%E8%A6%8F%E5%89%87"));
        assert!(!source.tracks_url("https://unece.org/docs/other"));
    }

    #[test]
    fn test_check_interval_is_bounded() {
        let mut config = crate::config::seed_config();
        assert_eq!(config.check_interval(), Duration::from_secs(24 * 3600));

        config.check_interval_hours = 0;
        assert_eq!(config.check_interval(), Duration::from_secs(3600));

        config.check_interval_hours = u64::MAX;
        assert_eq!(
            config.check_interval(),
            Duration::from_secs(crate::config::MAX_CHECK_INTERVAL_HOURS * 3600)
        );
    }
}
