//! reg-watch: a change monitor for regulatory documents
//!
//! This crate fetches a tracked set of document pages, extracts their main
//! content, fingerprints it, and reports which pages changed since the last
//! run. Listing pages can be crawled to discover new document versions.

pub mod config;
pub mod links;
pub mod monitor;
pub mod notify;
pub mod output;
pub mod state;

use thiserror::Error;

/// Main error type for reg-watch operations
#[derive(Debug, Error)]
pub enum WatchError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        source: monitor::FetchError,
    },

    #[error("Selector '{selector}' matched no content at {url}")]
    SelectorMiss { url: String, selector: String },

    #[error("Invalid source: {0}")]
    InvalidSource(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to access config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Failed to serialize TOML: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid match pattern: {0}")]
    InvalidPattern(String),
}

/// Result type alias for reg-watch operations
pub type Result<T> = std::result::Result<T, WatchError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

// Re-export commonly used types
pub use config::{Source, SourceKind, StateStore, TomlStore, Version, WatchConfig};
pub use monitor::{check_updates, fingerprint, FetchResult, HttpFetcher};
pub use state::{CheckResult, CheckStatus};
