//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory)
//! and applying the per-run overrides given on the command line.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use skyplan::{
    SkyplanError,
    config::AppConfig,
    diagram::{LayoutDirection, ViewMode},
};

use crate::Args;

/// Configuration-related errors for CLI
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),

    #[error("Invalid value for --{option}: {message}")]
    Override { option: &'static str, message: String },
}

impl From<ConfigError> for SkyplanError {
    fn from(err: ConfigError) -> Self {
        SkyplanError::Config(err.to_string())
    }
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (skyplan/config.toml)
/// 3. Platform-specific config directory
/// 4. Default config if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, SkyplanError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new("skyplan/config.toml");
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(proj_dirs) = ProjectDirs::from("com", "skyplan", "skyplan") {
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

/// Applies `--view-mode`, `--direction` and `--region` on top of `config`.
pub fn apply_overrides(mut config: AppConfig, args: &Args) -> Result<AppConfig, SkyplanError> {
    if let Some(value) = &args.view_mode {
        let view_mode: ViewMode = value.parse().map_err(|message| ConfigError::Override {
            option: "view-mode",
            message,
        })?;
        debug!(view_mode:%; "View mode overridden");
        config = config.with_view_mode(view_mode);
    }

    if let Some(value) = &args.direction {
        let direction: LayoutDirection =
            value.parse().map_err(|message| ConfigError::Override {
                option: "direction",
                message,
            })?;
        debug!(direction:?; "Direction overridden");
        config = config.with_direction(direction);
    }

    if let Some(region) = &args.region {
        debug!(region; "Region overridden");
        config = config.with_region(region.as_str());
    }

    Ok(config)
}

/// Load configuration from a TOML file
///
/// # Errors
///
/// Returns error if the file is missing, unreadable or not valid TOML.
fn load_config_file(path: impl AsRef<Path>) -> Result<AppConfig, SkyplanError> {
    let path = path.as_ref();

    if !path.exists() {
        return Err(ConfigError::MissingFile(path.to_path_buf()).into());
    }

    let content = fs::read_to_string(path)?;
    let config: AppConfig =
        toml::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

    Ok(config)
}
