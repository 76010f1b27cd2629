//! Persistence seam for the watch configuration

use crate::config::defaults::seed_config;
use crate::config::parser::{load_config, save_config};
use crate::config::types::WatchConfig;
use crate::ConfigError;
use std::path::{Path, PathBuf};

/// Loads and saves the process-wide watch state
///
/// The checker only needs a load and a persist call; the file format is the
/// implementation's business.
pub trait StateStore {
    /// Loads the current configuration
    fn load(&self) -> Result<WatchConfig, ConfigError>;

    /// Persists the configuration, replacing whatever was stored before
    fn save(&self, config: &WatchConfig) -> Result<(), ConfigError>;
}

/// TOML file-backed state store
#[derive(Debug, Clone)]
pub struct TomlStore {
    path: PathBuf,
}

impl TomlStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file, writing the seed configuration first if it is missing
    ///
    /// The flag is true when the seed was written, so callers that install
    /// logging afterwards can still report it.
    pub fn load_or_seed(&self) -> Result<(WatchConfig, bool), ConfigError> {
        if self.path.exists() {
            return Ok((load_config(&self.path)?, false));
        }

        let config = seed_config();
        save_config(&self.path, &config)?;
        Ok((config, true))
    }
}

impl StateStore for TomlStore {
    fn load(&self) -> Result<WatchConfig, ConfigError> {
        let (config, seeded) = self.load_or_seed()?;
        if seeded {
            tracing::info!(
                path = %self.path.display(),
                "Config file not found, wrote seed configuration"
            );
        }
        Ok(config)
    }

    fn save(&self, config: &WatchConfig) -> Result<(), ConfigError> {
        save_config(&self.path, config)?;
        tracing::debug!(path = %self.path.display(), "Config saved");
        Ok(())
    }
}
