//! Configuration loading and discovery for `assetbuild.toml`
//!
//! Provides functions to find, load, and merge configuration.

use super::schema::WorkerConfig;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// File name the loader searches for.
pub const CONFIG_FILE_NAME: &str = "assetbuild.toml";

/// Configuration loading error
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error
    #[error("Failed to parse assetbuild.toml: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error
    #[error("Config validation failed:\n{}", .0.iter().map(|e| format!("  - {}", e)).collect::<Vec<_>>().join("\n"))]
    Validation(Vec<String>),
}

/// CLI arguments that can override config values
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    /// Override cache root directory
    pub cache: Option<PathBuf>,
    /// Override the enabled platform list
    pub platforms: Option<Vec<String>>,
}

/// Find assetbuild.toml by walking up from the current working directory.
///
/// Search order:
/// 1. Walk up from current directory looking for assetbuild.toml
/// 2. Check XDG_CONFIG_HOME/assetbuild/assetbuild.toml (or
///    ~/.config/assetbuild/assetbuild.toml)
///
/// # Returns
/// - `Some(path)` if a config file is found
/// - `None` if no config file is found
pub fn find_config() -> Option<PathBuf> {
    // First try walking up from current directory
    if let Ok(cwd) = env::current_dir() {
        if let Some(path) = find_config_from(cwd) {
            return Some(path);
        }
    }

    // Fall back to XDG config
    find_xdg_config()
}

/// Find assetbuild.toml in the XDG config directory.
///
/// Checks XDG_CONFIG_HOME/assetbuild/assetbuild.toml or
/// ~/.config/assetbuild/assetbuild.toml
pub fn find_xdg_config() -> Option<PathBuf> {
    let xdg_config = env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .or_else(|_| env::var("HOME").map(|h| PathBuf::from(h).join(".config")))
        .ok()?;

    let config_path = xdg_config.join("assetbuild").join(CONFIG_FILE_NAME);
    if config_path.exists() {
        Some(config_path)
    } else {
        None
    }
}

/// Find assetbuild.toml by walking up from a specific directory.
///
/// This is the internal implementation that allows specifying the start
/// directory, useful for testing.
pub fn find_config_from(start: PathBuf) -> Option<PathBuf> {
    let mut current = start;

    loop {
        let config_path = current.join(CONFIG_FILE_NAME);
        if config_path.exists() {
            return Some(config_path);
        }

        // Move to parent directory
        if !current.pop() {
            // Reached root, no config found
            return None;
        }
    }
}

/// Load configuration from an assetbuild.toml file.
///
/// If a path is provided, loads from that file. Otherwise, uses
/// `find_config()` to locate the config file. If no config file is found,
/// returns the default configuration.
///
/// # Arguments
/// - `path` - Optional path to an assetbuild.toml file
///
/// # Returns
/// - `Ok(WorkerConfig)` on success
/// - `Err(ConfigError)` if the file cannot be read, parsed, or validated
pub fn load_config(path: Option<&Path>) -> Result<WorkerConfig, ConfigError> {
    let config_path = match path {
        Some(p) => Some(p.to_path_buf()),
        None => find_config(),
    };

    match config_path {
        Some(p) => load_config_file(&p),
        None => Ok(WorkerConfig::default()),
    }
}

/// Load configuration from a specific file path.
fn load_config_file(path: &Path) -> Result<WorkerConfig, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let config: WorkerConfig = toml::from_str(&contents)?;

    // Validate the config
    let errors = config.validate();
    if !errors.is_empty() {
        return Err(ConfigError::Validation(errors));
    }

    Ok(config)
}

/// Merge CLI overrides into a configuration.
///
/// CLI arguments take precedence over config file values.
pub fn merge_cli_overrides(config: &mut WorkerConfig, overrides: &CliOverrides) {
    // Override cache root
    if let Some(ref cache) = overrides.cache {
        config.cache.root = cache.clone();
    }

    // Override the enabled platforms (order is build order)
    if let Some(ref platforms) = overrides.platforms {
        config.worker.platforms = platforms.clone();
    }
}

/// Resolve a path relative to the directory holding the config file.
///
/// If the path is absolute, returns it unchanged. If relative, joins it
/// with the config file's parent directory.
pub fn resolve_path(config_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        config_dir.join(path)
    }
}
