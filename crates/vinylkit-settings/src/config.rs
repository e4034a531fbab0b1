//! Configuration model and persistence

use crate::error::{Result, SettingsError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectionSettings {
    /// Last used port, or "Auto" to pick the first available
    pub port: String,
    /// Baud rate for the serial link
    pub baud_rate: u32,
    /// Pause between streamed instructions, in milliseconds
    pub pacing_ms: u64,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            port: "Auto".to_string(),
            baud_rate: 115_200,
            pacing_ms: 10,
        }
    }
}

/// Cutting defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CuttingSettings {
    /// Feed rate in mm/min
    pub feed_rate: f64,
    /// Blade pressure in grams
    pub tool_power: u32,
    /// Z height with the blade raised, in mm
    pub tool_up_height: f64,
    /// Z height with the blade engaged, in mm
    pub tool_down_height: f64,
    /// Line samples per flattened curve
    pub curve_segments: usize,
    /// Line samples per extracted circle
    pub circle_segments: usize,
    /// Mirror artwork along X (heat transfer material)
    pub mirror: bool,
}

impl Default for CuttingSettings {
    fn default() -> Self {
        Self {
            feed_rate: 3000.0,
            tool_power: 300,
            tool_up_height: 5.0,
            tool_down_height: 0.0,
            curve_segments: 20,
            circle_segments: 36,
            mirror: false,
        }
    }
}

/// Top-level application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Connection settings section
    pub connection: ConnectionSettings,
    /// Cutting defaults section
    pub cutting: CuttingSettings,
}

impl Config {
    /// The default configuration path under the platform config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("vinylkit").join("config.json"))
    }

    /// Load configuration from a JSON or TOML file (decided by extension)
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = match extension(path) {
            "json" => serde_json::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => {
                return Err(SettingsError::UnsupportedFormat {
                    extension: other.to_string(),
                })
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Load configuration, falling back to defaults when the file is absent
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON or TOML file (decided by extension)
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = match extension(path) {
            "json" => serde_json::to_string_pretty(self)?,
            "toml" => toml::to_string_pretty(self)?,
            other => {
                return Err(SettingsError::UnsupportedFormat {
                    extension: other.to_string(),
                })
            }
        };
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Reject values no machine setup can mean
    pub fn validate(&self) -> Result<()> {
        if self.connection.baud_rate == 0 {
            return Err(SettingsError::Invalid("baud_rate must be positive".into()));
        }
        if self.cutting.feed_rate <= 0.0 {
            return Err(SettingsError::Invalid("feed_rate must be positive".into()));
        }
        if self.cutting.curve_segments == 0 {
            return Err(SettingsError::Invalid(
                "curve_segments must be at least 1".into(),
            ));
        }
        if self.cutting.circle_segments < 3 {
            return Err(SettingsError::Invalid(
                "circle_segments must be at least 3".into(),
            ));
        }
        if self.cutting.tool_up_height <= self.cutting.tool_down_height {
            return Err(SettingsError::Invalid(
                "tool_up_height must be above tool_down_height".into(),
            ));
        }
        Ok(())
    }
}

fn extension(path: &Path) -> &str {
    path.extension().and_then(|e| e.to_str()).unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn test_validation_rejects_inverted_heights() {
        let mut config = Config::default();
        config.cutting.tool_up_height = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_json_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let mut config = Config::default();
        config.connection.port = "/dev/ttyUSB0".to_string();
        config.cutting.mirror = true;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_toml_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");

        let mut config = Config::default();
        config.cutting.feed_rate = 1800.0;
        config.save_to_file(&path).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        assert!(matches!(
            Config::default().save_to_file(&path),
            Err(SettingsError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.json");
        assert_eq!(Config::load_or_default(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_partial_file_fills_in_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("partial.json");
        std::fs::write(&path, r#"{"connection": {"baud_rate": 9600}}"#).unwrap();

        let loaded = Config::load_from_file(&path).unwrap();
        assert_eq!(loaded.connection.baud_rate, 9600);
        assert_eq!(loaded.connection.port, "Auto");
        assert_eq!(loaded.cutting, CuttingSettings::default());
    }
}
