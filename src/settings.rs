// src/settings.rs

//! The persisted settings record and the store that loads and saves it.
//!
//! Settings are read once at startup and written once at teardown. Loading never
//! fails: anything missing or unreadable falls back to [`DEFAULT_SETTINGS`] one
//! field at a time.

use crate::config;
use crate::mapping::{MAX_FREQUENCY, MIN_FREQUENCY};
use anyhow::{anyhow, Context, Result};
use log::{debug, error, info, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const SETTINGS_FILE_NAME: &str = "settings.json";

/// Spectral color of the noise source.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum NoiseType {
    White,
    Pink,
    Brown,
}

impl NoiseType {
    pub const ALL: [NoiseType; 3] = [NoiseType::White, NoiseType::Pink, NoiseType::Brown];

    pub fn name(self) -> &'static str {
        match self {
            NoiseType::White => "white",
            NoiseType::Pink => "pink",
            NoiseType::Brown => "brown",
        }
    }
}

impl fmt::Display for NoiseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NoiseType {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        NoiseType::ALL
            .into_iter()
            .find(|t| t.name() == s)
            .ok_or_else(|| anyhow!("unknown noise type `{}`", s))
    }
}

/// The full settings record. Always written with exactly these three fields.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    /// Low-pass cutoff in Hz.
    #[serde(rename = "filter")]
    pub filter_frequency_hz: f64,
    /// Linear output amplitude, 0.0 to 1.0.
    pub volume: f64,
    #[serde(rename = "type")]
    pub noise_type: NoiseType,
}

pub const DEFAULT_SETTINGS: Settings = Settings {
    filter_frequency_hz: 4186.0,
    volume: 0.5,
    noise_type: NoiseType::Pink,
};

impl Default for Settings {
    fn default() -> Self {
        DEFAULT_SETTINGS
    }
}

impl Settings {
    /// Clamps the numeric fields into their valid ranges, logging anything that moved.
    pub fn sanitized(self) -> Self {
        let filter_frequency_hz = self.filter_frequency_hz.clamp(MIN_FREQUENCY, MAX_FREQUENCY);
        if filter_frequency_hz != self.filter_frequency_hz {
            warn!(
                "Persisted filter frequency {} Hz out of range, clamped to {} Hz",
                self.filter_frequency_hz, filter_frequency_hz
            );
        }
        let volume = self.volume.clamp(0.0, 1.0);
        if volume != self.volume {
            warn!("Persisted volume {} out of range, clamped to {}", self.volume, volume);
        }
        Self {
            filter_frequency_hz,
            volume,
            noise_type: self.noise_type,
        }
    }
}

/// Whatever could be recovered from the persisted text. Absent or invalid fields are `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PartialSettings {
    pub filter_frequency_hz: Option<f64>,
    pub volume: Option<f64>,
    pub noise_type: Option<NoiseType>,
}

impl PartialSettings {
    /// Parses raw persisted text. A parse failure is logged and yields an empty record.
    pub fn parse(raw: Option<&str>) -> Self {
        let Some(raw) = raw else {
            return Self::default();
        };

        let value: Value = match serde_json::from_str(raw) {
            Ok(value) => value,
            Err(e) => {
                error!("Error retrieving persisted settings, using defaults: {}", e);
                return Self::default();
            }
        };

        match value {
            Value::Object(fields) => Self {
                filter_frequency_hz: field(&fields, "filter"),
                volume: field(&fields, "volume"),
                noise_type: field(&fields, "type"),
            },
            Value::Null => Self::default(),
            other => {
                warn!("Persisted settings are not an object ({}), ignoring", other);
                Self::default()
            }
        }
    }
}

fn field<T: DeserializeOwned>(fields: &Map<String, Value>, name: &str) -> Option<T> {
    let value = fields.get(name)?;
    match serde_json::from_value(value.clone()) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("Ignoring invalid persisted `{}` ({}): {}", name, value, e);
            None
        }
    }
}

/// Field-level override: every field present in `persisted` replaces the default.
pub fn merge(defaults: &Settings, persisted: &PartialSettings) -> Settings {
    Settings {
        filter_frequency_hz: persisted
            .filter_frequency_hz
            .unwrap_or(defaults.filter_frequency_hz),
        volume: persisted.volume.unwrap_or(defaults.volume),
        noise_type: persisted.noise_type.unwrap_or(defaults.noise_type),
    }
}

/// Reads and writes the settings file.
#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
}

impl SettingsStore {
    /// Opens the store in the application's configuration directory.
    pub fn open_default() -> Self {
        let path = config::get_config_dir().map(|dir| dir.join(SETTINGS_FILE_NAME));
        if path.is_none() {
            warn!("No configuration directory available, settings will not persist");
        }
        Self { path }
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn load(&self) -> Settings {
        let raw = self.read_raw();
        let persisted = PartialSettings::parse(raw.as_deref());
        let settings = merge(&DEFAULT_SETTINGS, &persisted).sanitized();
        debug!("Loaded settings: {:?}", settings);
        settings
    }

    /// Overwrites the stored record. Failures are logged, never propagated.
    pub fn save(&self, settings: &Settings) {
        match self.write(settings) {
            Ok(path) => info!("Saved settings to {}", path.display()),
            Err(e) => error!("Failed to save settings: {:#}", e),
        }
    }

    fn read_raw(&self) -> Option<String> {
        let path = self.path.as_ref()?;
        if !path.exists() {
            return None;
        }
        match fs::read_to_string(path) {
            Ok(raw) => Some(raw),
            Err(e) => {
                error!("Failed to read settings file {}: {}", path.display(), e);
                None
            }
        }
    }

    fn write(&self, settings: &Settings) -> Result<&Path> {
        let path = self
            .path
            .as_deref()
            .ok_or_else(|| anyhow!("no settings location available"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let json_string = serde_json::to_string_pretty(settings)?;
        fs::write(path, json_string).with_context(|| format!("writing {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store_in(dir: &TempDir) -> SettingsStore {
        SettingsStore::at_path(dir.path().join(SETTINGS_FILE_NAME))
    }

    fn store_with_contents(dir: &TempDir, contents: &str) -> SettingsStore {
        let store = store_in(dir);
        fs::write(store.path().unwrap(), contents).unwrap();
        store
    }

    #[test]
    fn merge_overrides_field_by_field() {
        let persisted = PartialSettings {
            volume: Some(0.8),
            ..Default::default()
        };
        let merged = merge(&DEFAULT_SETTINGS, &persisted);
        assert_eq!(
            merged,
            Settings {
                filter_frequency_hz: 4186.0,
                volume: 0.8,
                noise_type: NoiseType::Pink,
            }
        );
    }

    #[test]
    fn merge_does_not_validate() {
        let persisted = PartialSettings {
            filter_frequency_hz: Some(50_000.0),
            ..Default::default()
        };
        assert_eq!(merge(&DEFAULT_SETTINGS, &persisted).filter_frequency_hz, 50_000.0);
    }

    #[test]
    fn missing_file_loads_defaults() {
        let dir = TempDir::new().unwrap();
        assert_eq!(store_in(&dir).load(), DEFAULT_SETTINGS);
    }

    #[test]
    fn corrupt_text_loads_defaults() {
        let dir = TempDir::new().unwrap();
        let store = store_with_contents(&dir, "{\"filter\": 12");
        assert_eq!(store.load(), DEFAULT_SETTINGS);
    }

    #[test]
    fn non_object_json_loads_defaults() {
        for raw in ["null", "42", "[1, 2, 3]", "\"pink\""] {
            assert_eq!(PartialSettings::parse(Some(raw)), PartialSettings::default());
        }
    }

    #[test]
    fn invalid_fields_fall_back_individually() {
        let parsed = PartialSettings::parse(Some(
            r#"{"filter": "loud", "volume": 0.25, "type": "purple"}"#,
        ));
        assert_eq!(
            parsed,
            PartialSettings {
                filter_frequency_hz: None,
                volume: Some(0.25),
                noise_type: None,
            }
        );
        assert_eq!(
            merge(&DEFAULT_SETTINGS, &parsed),
            Settings {
                volume: 0.25,
                ..DEFAULT_SETTINGS
            }
        );
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let parsed = PartialSettings::parse(Some(r#"{"type": "brown", "theme": "dark"}"#));
        assert_eq!(parsed.noise_type, Some(NoiseType::Brown));
        assert_eq!(parsed.volume, None);
    }

    #[test]
    fn load_clamps_out_of_range_values() {
        let dir = TempDir::new().unwrap();
        let store = store_with_contents(&dir, r#"{"filter": 5, "volume": 3.5}"#);
        let loaded = store.load();
        assert_eq!(loaded.filter_frequency_hz, MIN_FREQUENCY);
        assert_eq!(loaded.volume, 1.0);
    }

    #[test]
    fn save_writes_exactly_three_fields() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.save(&Settings {
            filter_frequency_hz: 880.0,
            volume: 0.3,
            noise_type: NoiseType::White,
        });

        let raw = fs::read_to_string(store.path().unwrap()).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        let fields = value.as_object().unwrap();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields["filter"], 880.0);
        assert_eq!(fields["volume"], 0.3);
        assert_eq!(fields["type"], "white");
    }

    #[test]
    fn save_overwrites_previous_record() {
        let dir = TempDir::new().unwrap();
        let store = store_with_contents(&dir, r#"{"volume": 0.1, "extra": true}"#);
        let current = Settings {
            noise_type: NoiseType::Brown,
            ..DEFAULT_SETTINGS
        };
        store.save(&current);
        assert_eq!(store.load(), current);
    }

    #[test]
    fn save_creates_missing_directories() {
        let dir = TempDir::new().unwrap();
        let store = SettingsStore::at_path(dir.path().join("nested").join(SETTINGS_FILE_NAME));
        store.save(&DEFAULT_SETTINGS);
        assert!(store.path().unwrap().exists());
    }

    #[test]
    fn save_into_unwritable_location_is_logged_not_fatal() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "not a directory").unwrap();
        let store = SettingsStore::at_path(blocker.join(SETTINGS_FILE_NAME));

        store.save(&DEFAULT_SETTINGS);

        assert!(!store.path().unwrap().exists());
        assert!(blocker.is_file());
        assert_eq!(store.load(), DEFAULT_SETTINGS);
    }

    #[test]
    fn store_without_location_saves_nothing() {
        let store = SettingsStore { path: None };
        store.save(&DEFAULT_SETTINGS);
        assert!(store.path().is_none());
        assert!(store.write(&DEFAULT_SETTINGS).is_err());
        assert_eq!(store.load(), DEFAULT_SETTINGS);
    }

    #[test]
    fn noise_type_names_parse_back() {
        for noise_type in NoiseType::ALL {
            assert_eq!(noise_type.name().parse::<NoiseType>().unwrap(), noise_type);
        }
        assert!("violet".parse::<NoiseType>().is_err());
    }
}
