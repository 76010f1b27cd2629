use crate::config::types::WatchConfig;
use crate::config::validation::validate;
use crate::ConfigError;
use std::ffi::OsString;
use std::path::{Path, PathBuf};

/// Loads and parses a configuration file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML configuration file
///
/// # Returns
///
/// * `Ok(WatchConfig)` - Successfully loaded and validated configuration
/// * `Err(ConfigError)` - Failed to load, parse, or validate the configuration
///
/// # Example
///
/// ```no_run
/// use std::path::Path;
/// use reg_watch::config::load_config;
///
/// let config = load_config(Path::new("config.toml")).unwrap();
/// println!("Sources: {}", config.sources.len());
/// ```
pub fn load_config(path: &Path) -> Result<WatchConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content)
}

/// Parses and validates configuration text
pub fn parse_config(content: &str) -> Result<WatchConfig, ConfigError> {
    let config: WatchConfig = toml::from_str(content)?;
    validate(&config)?;
    Ok(config)
}

/// Writes a configuration to disk
///
/// The content is written to a sibling temporary file first and then renamed
/// over the target, so a failed write never truncates the existing file.
pub fn save_config(path: &Path, config: &WatchConfig) -> Result<(), ConfigError> {
    let content = toml::to_string_pretty(config)?;
    let tmp_path = temp_path_for(path);

    std::fs::write(&tmp_path, content)?;
    if let Err(e) = std::fs::rename(&tmp_path, path) {
        let _ = std::fs::remove_file(&tmp_path);
        return Err(e.into());
    }

    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = OsString::from(".");
    name.push(path.file_name().unwrap_or_default());
    name.push(".tmp");
    path.with_file_name(name)
}
