//! Game settings
//!
//! JSON, every field optional. Natively read from the file named by
//! `NO_BRAKE_SETTINGS` (default `no_brake.json` in the working directory); in
//! the browser from LocalStorage. A missing or broken file means defaults.

#[cfg(not(target_arch = "wasm32"))]
use std::path::Path;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audio::Mixer;
use crate::consts::ARROW_COUNT;

/// Environment variable naming the settings file
pub const SETTINGS_ENV: &str = "NO_BRAKE_SETTINGS";
/// Settings file used when the variable is unset
pub const DEFAULT_SETTINGS_FILE: &str = "no_brake.json";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid settings: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Fixed RNG seed; taken from the clock when absent
    pub seed: Option<u64>,
    /// Lane arrows per wave
    pub arrow_count: usize,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0), applied on top of the track's own level
    pub music_volume: f32,
    pub muted: bool,

    // === Native runner ===
    /// Root of the asset tree; builtin footprints when absent
    pub assets_dir: Option<PathBuf>,
    /// Sleep to hold 80 frames per second
    pub paced: bool,
    /// Stop after this many frames
    pub max_frames: Option<u64>,
    /// Sessions the demo driver restarts after the first crash
    pub demo_restarts: u32,
    /// Car the demo driver picks in the menu
    pub demo_car: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            arrow_count: ARROW_COUNT,

            master_volume: 1.0,
            sfx_volume: 1.0,
            music_volume: 1.0,
            muted: false,

            assets_dir: None,
            paced: true,
            max_frames: None,
            demo_restarts: 2,
            demo_car: 0,
        }
    }
}

impl Settings {
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Volume settings for the audio sinks
    pub fn mixer(&self) -> Mixer {
        Mixer {
            master_volume: self.master_volume.clamp(0.0, 1.0),
            sfx_volume: self.sfx_volume.clamp(0.0, 1.0),
            music_volume: self.music_volume.clamp(0.0, 1.0),
            muted: self.muted,
        }
    }

    /// Settings file location for this process
    #[cfg(not(target_arch = "wasm32"))]
    pub fn path() -> PathBuf {
        std::env::var_os(SETTINGS_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE))
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Load settings, falling back to defaults
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        let path = Self::path();
        if !path.exists() {
            log::info!("No settings at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(err) => {
                log::warn!("Ignoring {}: {err}", path.display());
                Self::default()
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// LocalStorage key
    #[cfg(target_arch = "wasm32")]
    const STORAGE_KEY: &'static str = "no_brake_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(settings) => {
                        log::info!("Loaded settings from LocalStorage");
                        return settings;
                    }
                    Err(err) => log::warn!("Ignoring stored settings: {err}"),
                }
            }
        }

        log::info!("Using default settings");
        Self::default()
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings = Settings::from_json(r#"{ "seed": 42, "muted": true }"#).unwrap();
        assert_eq!(settings.seed, Some(42));
        assert!(settings.muted);
        assert_eq!(settings.arrow_count, ARROW_COUNT);
        assert!(settings.paced);
    }

    #[test]
    fn test_bad_json_is_parse_error() {
        let err = Settings::from_json("{ seed: ").unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load_from(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io(_)));
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.json");
        let settings = Settings {
            seed: Some(7),
            arrow_count: 4,
            max_frames: Some(500),
            assets_dir: Some(PathBuf::from("assets")),
            ..Settings::default()
        };
        settings.save_to(&path).unwrap();
        assert_eq!(Settings::load_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_mixer_clamps_volumes() {
        let settings = Settings {
            master_volume: 2.0,
            sfx_volume: -1.0,
            ..Settings::default()
        };
        let mixer = settings.mixer();
        assert_eq!(mixer.master_volume, 1.0);
        assert_eq!(mixer.sfx_volume, 0.0);
    }
}
