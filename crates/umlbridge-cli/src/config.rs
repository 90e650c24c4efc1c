//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use umlbridge::{BridgeError, config::AppConfig};

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Validation error: {0}")]
    Validation(String),
}

impl From<ConfigError> for BridgeError {
    fn from(err: ConfigError) -> Self {
        BridgeError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (umlbridge/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed or names an invalid color
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, BridgeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("umlbridge/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "umlbridge", "umlbridge") {
        let system_config = proj_dirs.config_dir().join("config.toml");

        if system_config.exists() {
            info!(path = system_config.display().to_string(); "Loading configuration from system path");
            return load_config_file(system_config);
        }

        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(AppConfig::default())
}

/// Load and validate configuration from a TOML file
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, BridgeError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    validate(&config)?;
    Ok(config)
}

/// Colors are kept as text until rendering; reject bad ones at load time.
fn validate(config: &AppConfig) -> Result<(), ConfigError> {
    let style = config.style();
    style.background_color().map_err(ConfigError::Validation)?;
    style.line_color().map_err(ConfigError::Validation)?;
    style.package_color().map_err(ConfigError::Validation)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[layout.grid]\ncolumns = 3\n\n[style]\nline_color = \"navy\"\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.layout().grid().columns, 3);
        assert_eq!(config.layout().grid().column_spacing, 800);
        assert!(config.style().line_color().unwrap().is_some());
    }

    #[test]
    fn test_missing_explicit_file() {
        let err = load_config(Some("/definitely/not/here.toml")).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.contains("Missing")));
    }

    #[test]
    fn test_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[layout.grid\ncolumns = ").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.starts_with("Failed to parse")));
    }

    #[test]
    fn test_invalid_color_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[style]\nbackground_color = \"not-a-color\"\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();
        assert!(matches!(err, BridgeError::Config(ref msg) if msg.starts_with("Validation")));
    }
}
