use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::audio::{AudioConfig, DEFAULT_AMPLITUDE};

/// Valid range of the pitch and duration percentages
pub const PERCENT_RANGE: (f64, f64) = (0.0, 100.0);

/// Tone frequency reachable through the pitch percentage
pub const PITCH_LIMITS_HZ: (f64, f64) = (200.0, 800.0);

/// Dot length reachable through the duration percentage
pub const DURATION_LIMITS_MS: (f64, f64) = (50.0, 250.0);

/// Linearly map `value` from the `src` range onto the `dst` range
pub fn map_to_range(src: (f64, f64), dst: (f64, f64), value: f64) -> f64 {
    let slope = (dst.1 - dst.0) / (src.1 - src.0);
    dst.0 + slope * (value - src.0)
}

/// Tone frequency for a pitch percentage
pub fn pitch_hz(percent: u8) -> f64 {
    map_to_range(PERCENT_RANGE, PITCH_LIMITS_HZ, f64::from(percent))
}

/// Dot duration for a duration percentage, truncated to whole milliseconds
pub fn dot_duration_ms(percent: u8) -> i64 {
    map_to_range(PERCENT_RANGE, DURATION_LIMITS_MS, f64::from(percent)) as i64
}

/// Returns the path to the settings file: `~/.config/morse/settings.json`
pub fn settings_path() -> PathBuf {
    let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
    path.push("morse");
    path.push("settings.json");
    path
}

/// Persisted user defaults.
///
/// Serialized as JSON to the platform config directory.
/// Fields use `#[serde(default)]` so that adding new settings
/// won't break existing config files.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub pitch_percent: u8,
    pub duration_percent: u8,
    pub amplitude: i16,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pitch_percent: 50,
            duration_percent: 25,
            amplitude: DEFAULT_AMPLITUDE,
        }
    }
}

impl Settings {
    /// Load settings from the default location
    pub fn load() -> Self {
        Self::load_from(&settings_path())
    }

    /// Load settings from `path`, falling back to defaults on any error.
    ///
    /// Out-of-range percentages are clamped to 100.
    pub fn load_from(path: &Path) -> Self {
        let settings: Self = match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(settings) => {
                    log::info!("Loaded settings from {}", path.display());
                    settings
                }
                Err(e) => {
                    log::warn!("Failed to parse settings ({}), using defaults", e);
                    Self::default()
                }
            },
            Err(e) => {
                log::info!("No settings file found ({}), using defaults", e);
                Self::default()
            }
        };

        Self {
            pitch_percent: settings.pitch_percent.min(100),
            duration_percent: settings.duration_percent.min(100),
            ..settings
        }
    }

    /// Save settings to the default location
    pub fn save(&self) {
        self.save_to(&settings_path());
    }

    /// Save settings to `path` as pretty JSON.
    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create config directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = std::fs::write(path, json) {
                    log::warn!("Failed to write settings: {}", e);
                } else {
                    log::info!("Saved settings to {}", path.display());
                }
            }
            Err(e) => {
                log::warn!("Failed to serialize settings: {}", e);
            }
        }
    }

    pub fn frequency_hz(&self) -> f64 {
        pitch_hz(self.pitch_percent)
    }

    pub fn dot_duration_ms(&self) -> i64 {
        dot_duration_ms(self.duration_percent)
    }

    /// Audio engine configuration with this amplitude
    pub fn audio_config(&self) -> AudioConfig {
        AudioConfig {
            amplitude: self.amplitude,
            ..AudioConfig::default()
        }
    }
}
