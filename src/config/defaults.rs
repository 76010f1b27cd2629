//! Seed configuration written on first run

use crate::config::types::{
    HttpConfig, NotificationConfig, Source, SourceKind, Version, WatchConfig,
};

const UNECE_DOCUMENTS: &str = "https://unece.org/transport/documents";

/// Builds the configuration used when no config file exists yet
///
/// Tracks UN Regulation No. 155 (vehicle cyber security) on the UNECE
/// transport documents listing.
pub fn seed_config() -> WatchConfig {
    WatchConfig {
        check_interval_hours: 24,
        log_file: "reg_watch.log".to_string(),
        http: HttpConfig::default(),
        notification: NotificationConfig::default(),
        sources: vec![Source {
            name: "UN-R155".to_string(),
            kind: SourceKind::Listing,
            base_url: UNECE_DOCUMENTS.to_string(),
            selector: None,
            patterns: vec![
                "un-regulation-no-155".to_string(),
                "regulation-155".to_string(),
                "regulation.*155.*amendment".to_string(),
                "addendum.*154.*regulation.*155".to_string(),
            ],
            versions: vec![
                Version::new(
                    format!(
                        "{UNECE_DOCUMENTS}/2021/03/standards/\
                         un-regulation-no-155-cyber-security-and-cyber-security"
                    ),
                    "original",
                    Some("2021-03".to_string()),
                ),
                Version::new(
                    format!("{UNECE_DOCUMENTS}/2022/11/standards/un-regulation-no-155-amend1-0"),
                    "amendment1",
                    Some("2022-11".to_string()),
                ),
                Version::new(
                    format!(
                        "{UNECE_DOCUMENTS}/2024/03/standards/un-regulation-no-155-amendment-2"
                    ),
                    "amendment2",
                    Some("2024-03".to_string()),
                ),
            ],
        }],
    }
}
