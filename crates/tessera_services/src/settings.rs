//! Settings management
//!
//! Settings are read from a JSON file. Every section and field is optional;
//! anything missing falls back to its default.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse settings file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Engine settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub simulation: SimulationSettings,
    pub logging: LoggingSettings,
    pub demo: DemoSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationSettings {
    pub tick_rate_hz: u32,
    /// Cap on fixed steps run in a single frame.
    pub max_steps_per_frame: u32,
    /// Frames to run before shutting down.
    pub frames: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// One of `trace`, `debug`, `info`, `warn`, `error`.
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoSettings {
    pub entity_count: u32,
    pub spin_speed_deg: f32,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            tick_rate_hz: 60,
            max_steps_per_frame: 5,
            frames: 120,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl Default for DemoSettings {
    fn default() -> Self {
        Self {
            entity_count: 16,
            spin_speed_deg: 45.0,
        }
    }
}

impl Settings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = serde_json::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    /// Load from `path` if one is given, otherwise use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, SettingsError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_temp(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn defaults() {
        let settings = Settings::default();
        assert_eq!(settings.simulation.tick_rate_hz, 60);
        assert_eq!(settings.simulation.max_steps_per_frame, 5);
        assert_eq!(settings.simulation.frames, 120);
        assert_eq!(settings.logging.level, "info");
        assert_eq!(settings.demo.entity_count, 16);
    }

    #[test]
    fn partial_file_falls_back_to_defaults() {
        let file = write_temp(r#"{ "simulation": { "frames": 10 }, "logging": { "level": "debug" } }"#);
        let settings = Settings::load(file.path()).unwrap();

        assert_eq!(settings.simulation.frames, 10);
        assert_eq!(settings.simulation.tick_rate_hz, 60);
        assert_eq!(settings.logging.level, "debug");
        assert_eq!(settings.demo, DemoSettings::default());
    }

    #[test]
    fn pretty_json_loads_back() {
        let mut settings = Settings::default();
        settings.demo.entity_count = 3;
        let file = write_temp(&settings.to_json_pretty().unwrap());
        assert_eq!(Settings::load(file.path()).unwrap(), settings);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = Settings::load(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, SettingsError::Io { .. }));
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let file = write_temp("{ not json");
        let err = Settings::load(file.path()).unwrap_err();
        assert!(matches!(err, SettingsError::Parse { .. }));
    }

    #[test]
    fn no_path_means_defaults() {
        assert_eq!(Settings::load_or_default(None).unwrap(), Settings::default());
    }
}
