// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Configuration discovery and loading.

use crate::error::{ConfigError, PatchCheckError, Result};
use std::path::{Path, PathBuf};

use super::schema::PatchCheckConfig;

/// Configuration file names to search for, in order of priority.
const CONFIG_FILES: &[&str] = &["patchcheck.toml", ".patchcheck.toml", ".config/patchcheck.toml"];

/// Find the configuration file in the current directory or parent directories.
pub fn find_config_file() -> Option<PathBuf> {
    let current_dir = std::env::current_dir().ok()?;
    find_config_file_from(&current_dir)
}

/// Find the configuration file starting from a specific directory.
pub fn find_config_file_from(start_dir: &Path) -> Option<PathBuf> {
    let mut current = start_dir.to_path_buf();

    loop {
        for config_name in CONFIG_FILES {
            let config_path = current.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }

        if !current.pop() {
            break;
        }
    }

    if let Some(home) = dirs::home_dir() {
        for config_name in CONFIG_FILES {
            let config_path = home.join(config_name);
            if config_path.exists() {
                return Some(config_path);
            }
        }
    }

    // XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join("patchcheck").join("config.toml");
        if config_path.exists() {
            return Some(config_path);
        }
    }

    None
}

/// Load configuration from the default locations.
pub fn load_config() -> Result<PatchCheckConfig> {
    match find_config_file() {
        Some(path) => load_config_from(&path),
        None => {
            tracing::debug!("No configuration file found, using defaults");
            Ok(PatchCheckConfig::default())
        }
    }
}

/// Load configuration from a specific path.
pub fn load_config_from(path: &Path) -> Result<PatchCheckConfig> {
    tracing::debug!("Loading configuration from: {:?}", path);

    if !path.exists() {
        return Err(PatchCheckError::Config(ConfigError::NotFound {
            path: path.to_path_buf(),
        }));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        PatchCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to read config file: {}", e),
        })
    })?;

    parse_config(&content)
}

/// Parse configuration from a TOML string.
pub fn parse_config(content: &str) -> Result<PatchCheckConfig> {
    let config: PatchCheckConfig = toml::from_str(content).map_err(|e| {
        PatchCheckError::Config(ConfigError::ParseError {
            message: format!("Failed to parse TOML: {}", e),
        })
    })?;
    validate(&config)?;
    Ok(config)
}

fn validate(config: &PatchCheckConfig) -> Result<()> {
    let limits = [
        ("message.max_subject_length", config.message.max_subject_length),
        (
            "message.max_cve_subject_length",
            config.message.max_cve_subject_length,
        ),
        (
            "message.max_body_line_length",
            config.message.max_body_line_length,
        ),
    ];

    for (key, value) in limits {
        if value == 0 {
            return Err(PatchCheckError::Config(ConfigError::InvalidValue {
                key: key.to_string(),
                message: "must be greater than zero".to_string(),
            }));
        }
    }

    Ok(())
}
