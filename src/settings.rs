// src/settings.rs

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

pub const DEFAULT_SETTINGS_FILE: &str = "checkin_settings.json";
pub const DEFAULT_FIRST_CHECKIN_TIME: &str = "07:30";
pub const DEFAULT_LAST_CHECKIN_TIME: &str = "17:00";

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("failed to read settings file {path}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to write settings file {path}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("settings file {path} is not valid JSON")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("settings could not be encoded as JSON")]
    Encode(#[source] serde_json::Error),
}

// Persisted check-in cutoffs. The JSON keys match the vnFace console's
// localStorage keys so a hand-edited file reads naturally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSettings {
    pub first_checkin_time: String,
    pub last_checkin_time: String,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            first_checkin_time: DEFAULT_FIRST_CHECKIN_TIME.to_string(),
            last_checkin_time: DEFAULT_LAST_CHECKIN_TIME.to_string(),
        }
    }
}

impl ReportSettings {
    /// Load persisted cutoffs, falling back to the defaults when no
    /// settings file exists yet.
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            info!("No settings file at {:?}, using default cutoffs", path);
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path).map_err(|source| SettingsError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&json).map_err(|source| SettingsError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        let json = serde_json::to_string_pretty(self).map_err(SettingsError::Encode)?;
        fs::write(path, json).map_err(|source| SettingsError::Write {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "checkin_settings_test_{}_{}.json",
            tag,
            std::process::id()
        ))
    }

    #[test]
    fn test_missing_file_falls_back_to_defaults() {
        let path = temp_settings_path("missing");
        let _ = fs::remove_file(&path);

        let settings = ReportSettings::load(&path).expect("defaults on missing file");
        assert_eq!(settings.first_checkin_time, "07:30");
        assert_eq!(settings.last_checkin_time, "17:00");
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let path = temp_settings_path("roundtrip");
        let settings = ReportSettings {
            first_checkin_time: "08:00".to_string(),
            last_checkin_time: "16:30".to_string(),
        };

        settings.save(&path).expect("save settings");
        let loaded = ReportSettings::load(&path).expect("load settings");
        assert_eq!(loaded, settings);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_saved_file_uses_camel_case_key_names() {
        let path = temp_settings_path("keys");
        ReportSettings::default().save(&path).expect("save settings");

        let json = fs::read_to_string(&path).expect("read settings file");
        assert!(json.contains("firstCheckinTime"));
        assert!(json.contains("lastCheckinTime"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_garbage_file_is_a_parse_error() {
        let path = temp_settings_path("garbage");
        fs::write(&path, "not json at all").expect("write garbage");

        let err = ReportSettings::load(&path).expect_err("garbage should not parse");
        assert!(matches!(err, SettingsError::Parse { .. }));

        let _ = fs::remove_file(&path);
    }
}
