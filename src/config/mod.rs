//! Configuration module for reg-watch
//!
//! This module handles loading, validating, and persisting the TOML file that
//! holds both the monitor settings and the tracked document state.
//!
//! # Example
//!
//! ```no_run
//! use reg_watch::config::{StateStore, TomlStore};
//!
//! let store = TomlStore::new("config.toml");
//! let config = store.load().unwrap();
//! println!("Tracking {} versions", config.version_count());
//! ```

mod defaults;
mod parser;
mod store;
mod types;
mod validation;

// Re-export types
pub use types::{
    EmailConfig, HttpConfig, NotificationConfig, Source, SourceKind, Version, WatchConfig,
};

pub use defaults::seed_config;
pub use parser::{load_config, parse_config, save_config};
pub use store::{StateStore, TomlStore};
pub use validation::{validate, MAX_CHECK_INTERVAL_HOURS};
