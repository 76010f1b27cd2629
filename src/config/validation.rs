use crate::config::types::{HttpConfig, Source, WatchConfig};
use crate::ConfigError;
use regex::RegexBuilder;
use std::collections::HashSet;
use url::Url;

/// Longest allowed check interval: one year
pub const MAX_CHECK_INTERVAL_HOURS: u64 = 24 * 366;

/// Validates the entire configuration
///
/// Duplicate version URLs within a source are tolerated: they are reported
/// with a warning and left in place.
pub fn validate(config: &WatchConfig) -> Result<(), ConfigError> {
    if !(1..=MAX_CHECK_INTERVAL_HOURS).contains(&config.check_interval_hours) {
        return Err(ConfigError::Validation(format!(
            "check_interval_hours must be between 1 and {}, got {}",
            MAX_CHECK_INTERVAL_HOURS, config.check_interval_hours
        )));
    }

    validate_http_config(&config.http)?;

    let mut names = HashSet::new();
    for source in &config.sources {
        if !names.insert(source.name.as_str()) {
            return Err(ConfigError::Validation(format!(
                "Duplicate source name '{}'",
                source.name
            )));
        }
        validate_source(source)?;
    }

    Ok(())
}

/// Validates fetcher settings
fn validate_http_config(config: &HttpConfig) -> Result<(), ConfigError> {
    if config.max_attempts < 1 {
        return Err(ConfigError::Validation(format!(
            "max_attempts must be >= 1, got {}",
            config.max_attempts
        )));
    }

    if config.timeout_secs < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout_secs must be >= 1, got {}",
            config.timeout_secs
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates a single source and its versions
fn validate_source(source: &Source) -> Result<(), ConfigError> {
    if source.name.trim().is_empty() {
        return Err(ConfigError::Validation(
            "Source name cannot be empty".to_string(),
        ));
    }

    validate_http_url(&source.base_url)
        .map_err(|e| ConfigError::InvalidUrl(format!("Source '{}': {}", source.name, e)))?;

    for pattern in &source.patterns {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ConfigError::InvalidPattern(format!(
                    "Source '{}' pattern '{}': {}",
                    source.name, pattern, e
                ))
            })?;
    }

    let mut seen = HashSet::new();
    for version in &source.versions {
        validate_http_url(&version.url).map_err(|e| {
            ConfigError::InvalidUrl(format!("Source '{}' version: {}", source.name, e))
        })?;

        if !seen.insert(version.url.as_str()) {
            tracing::warn!(
                source = %source.name,
                url = %version.url,
                "Duplicate version URL in config; each entry is checked separately"
            );
        }
    }

    Ok(())
}

/// Checks that a string is an absolute http(s) URL
fn validate_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| format!("'{}': {}", raw, e))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        other => Err(format!("'{}' has unsupported scheme '{}'", raw, other)),
    }
}
