// src/config.rs

use anyhow::{Context, Result};
use directories::ProjectDirs;
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "config.json";

/// Audio device preferences. Every field is optional; `None` means "use the device default".
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub output_device: Option<String>,
    pub sample_rate: Option<u32>,
    pub buffer_size: Option<u32>,
}

/// Returns the configuration directory, creating it if needed.
pub fn get_config_dir() -> Option<PathBuf> {
    let Some(dirs) = ProjectDirs::from("", "", "murmur") else {
        error!("Could not determine a configuration directory for this platform.");
        return None;
    };
    let dir = dirs.config_dir().to_path_buf();
    if !dir.exists() {
        if let Err(e) = fs::create_dir_all(&dir) {
            error!("Failed to create directory at {}: {}", dir.display(), e);
            return None;
        }
    }
    Some(dir)
}

/// Loads `config.json`, writing a default one on first run so there is something to edit.
pub fn load_config() -> AppConfig {
    let Some(dir) = get_config_dir() else {
        return AppConfig::default();
    };
    let path = dir.join(CONFIG_FILE_NAME);
    if !path.exists() {
        let config = AppConfig::default();
        match save_config_to(&path, &config) {
            Ok(()) => info!("Wrote default config to {}", path.display()),
            Err(e) => warn!("Failed to write default config: {:#}", e),
        }
        return config;
    }
    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> AppConfig {
    if !path.exists() {
        return AppConfig::default();
    }
    match fs::read_to_string(path) {
        Ok(json_string) => match serde_json::from_str(&json_string) {
            Ok(config) => config,
            Err(e) => {
                warn!("Failed to parse config file, using defaults. Error: {}", e);
                AppConfig::default()
            }
        },
        Err(e) => {
            warn!("Failed to read config file, using defaults. Error: {}", e);
            AppConfig::default()
        }
    }
}

pub fn save_config_to(path: &Path, config: &AppConfig) -> Result<()> {
    let json_string = serde_json::to_string_pretty(config)?;
    fs::write(path, json_string).with_context(|| format!("writing {}", path.display()))
}
