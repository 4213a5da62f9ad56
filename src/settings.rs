//! Game settings and preferences
//!
//! Read by the core as plain key/value lookups; persisted as JSON.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::camera::CameraMode;

/// Errors from loading, saving or editing settings
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("settings I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed settings JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unknown config option: {0}")]
    UnknownOption(String),
}

/// Configuration keys readable by the core
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ConfigOption {
    /// Camera mode (2 = manual yaw, anything else = chase)
    Camera,
    /// Ball-ball collision response (0 = off)
    PuttCollisions,
    /// Input sensitivity divisor for rotation and power adjustments
    MouseSense,
}

impl ConfigOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigOption::Camera => "camera",
            ConfigOption::PuttCollisions => "putt_collisions",
            ConfigOption::MouseSense => "mouse_sense",
        }
    }

    pub fn from_key(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "camera" => Some(ConfigOption::Camera),
            "putt_collisions" | "collisions" => Some(ConfigOption::PuttCollisions),
            "mouse_sense" | "sensitivity" => Some(ConfigOption::MouseSense),
            _ => None,
        }
    }
}

/// Camera retarget tuning.
///
/// The fractions are multiples of a ball's radius.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// A retarget commits once the view center is this close to the new target
    pub arrive_fraction: f32,
    /// Beyond this distance from the previous target the accelerating easing is used
    pub near_fraction: f32,
    /// Linear approach rate (per second)
    pub speed: f32,
    /// Growth of the accelerating blend factor, relative to `speed`
    pub acceleration: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            arrive_fraction: 0.1,
            near_fraction: 15.0,
            speed: 4.0,
            acceleration: 0.0005,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Camera behaviour
    pub camera: CameraMode,
    /// Whether resting balls collide with each other
    pub putt_collisions: bool,
    /// Input sensitivity (larger = slower)
    pub mouse_sense: i32,
    /// Camera retarget easing
    pub camera_tuning: CameraTuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            camera: CameraMode::Chase,
            putt_collisions: true,
            mouse_sense: 300,
            camera_tuning: CameraTuning::default(),
        }
    }
}

impl Settings {
    /// Look up an option as a plain integer value
    pub fn get(&self, option: ConfigOption) -> i32 {
        match option {
            ConfigOption::Camera => self.camera.as_config(),
            ConfigOption::PuttCollisions => i32::from(self.putt_collisions),
            ConfigOption::MouseSense => self.mouse_sense,
        }
    }

    /// Store an option from a plain integer value
    pub fn set(&mut self, option: ConfigOption, value: i32) {
        match option {
            ConfigOption::Camera => self.camera = CameraMode::from_config(value),
            ConfigOption::PuttCollisions => self.putt_collisions = value != 0,
            ConfigOption::MouseSense => self.mouse_sense = value.max(1),
        }
    }

    /// Store an option addressed by its string key
    pub fn set_key(&mut self, key: &str, value: i32) -> Result<(), SettingsError> {
        let option =
            ConfigOption::from_key(key).ok_or_else(|| SettingsError::UnknownOption(key.to_string()))?;
        self.set(option, value);
        Ok(())
    }

    /// Sensitivity divisor, never below 1
    pub fn sensitivity(&self) -> f32 {
        self.mouse_sense.max(1) as f32
    }

    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.mouse_sense = settings.mouse_sense.max(1);
        Ok(settings)
    }

    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Load settings, falling back to defaults on any failure
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        match Self::load(path) {
            Ok(settings) => settings,
            Err(err) => {
                log::warn!("Using default settings: {err}");
                Self::default()
            }
        }
    }

    /// Save settings to a JSON file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), SettingsError> {
        let path = path.as_ref();
        std::fs::write(path, self.to_json()?)?;
        log::info!("Settings saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_value_lookup() {
        let mut settings = Settings::default();
        assert_eq!(settings.get(ConfigOption::PuttCollisions), 1);
        assert_eq!(settings.get(ConfigOption::Camera), 0);

        settings.set(ConfigOption::Camera, 2);
        assert_eq!(settings.camera, CameraMode::Manual);
        assert_eq!(settings.get(ConfigOption::Camera), 2);

        settings.set_key("collisions", 0).unwrap();
        assert!(!settings.putt_collisions);
    }

    #[test]
    fn test_unknown_key_is_error() {
        let mut settings = Settings::default();
        let err = settings.set_key("textures", 1).unwrap_err();
        assert!(matches!(err, SettingsError::UnknownOption(ref k) if k == "textures"));
    }

    #[test]
    fn test_sensitivity_never_zero() {
        let mut settings = Settings::default();
        settings.set(ConfigOption::MouseSense, 0);
        assert_eq!(settings.mouse_sense, 1);

        let settings = Settings::from_json(r#"{ "mouse_sense": -5 }"#).unwrap();
        assert_eq!(settings.sensitivity(), 1.0);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings = Settings::from_json(r#"{ "camera": "Manual" }"#).unwrap();
        assert_eq!(settings.camera, CameraMode::Manual);
        assert!(settings.putt_collisions);
        assert_eq!(settings.camera_tuning, CameraTuning::default());
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            Settings::from_json("{ camera: "),
            Err(SettingsError::Json(_))
        ));
    }

    #[test]
    fn test_save_and_load_file() {
        let path = std::env::temp_dir().join(format!("putt_core_settings_{}.json", std::process::id()));
        let mut settings = Settings::default();
        settings.mouse_sense = 150;
        settings.camera_tuning.speed = 6.0;
        settings.save(&path).unwrap();

        let loaded = Settings::load(&path).unwrap();
        assert_eq!(loaded, settings);
        let _ = std::fs::remove_file(&path);
    }
}
