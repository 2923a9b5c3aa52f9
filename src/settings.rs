use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::home::DEFAULT_SNAPSHOT_BUFFER;

const SETTINGS_FILE: &str = "settings.json";
const APP_DIR: &str = "veil-companion";
pub const DEFAULT_API_BASE_URL: &str = "https://52.4.10.252:8443/";

/// How per-match role lookups are issued
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EnrichmentMode {
    /// One lookup at a time, in history order
    #[default]
    Sequential,
    /// All lookups at once, reassembled in history order
    Concurrent,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppSettings {
    pub api_base_url: String,
    pub enrichment_mode: EnrichmentMode,
    pub snapshot_buffer: usize,
    /// The backend is addressed by IP, so its certificate never matches
    pub accept_invalid_certs: bool,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            enrichment_mode: EnrichmentMode::Sequential,
            snapshot_buffer: DEFAULT_SNAPSHOT_BUFFER,
            accept_invalid_certs: false,
        }
    }
}

pub fn get_settings_path() -> Result<PathBuf, String> {
    let config_dir = dirs::config_dir()
        .ok_or("Failed to get config directory")?
        .join(APP_DIR);

    fs::create_dir_all(&config_dir)
        .map_err(|e| format!("Failed to create config directory: {}", e))?;

    Ok(config_dir.join(SETTINGS_FILE))
}

pub fn load_settings() -> Result<AppSettings, String> {
    let path = get_settings_path()?;
    load_settings_from(&path)
}

/// Load settings from `path`, writing the defaults there first if it is missing
pub fn load_settings_from(path: &Path) -> Result<AppSettings, String> {
    tracing::debug!("Loading settings from {}", path.display());

    if !path.exists() {
        tracing::info!("No settings file, writing defaults to {}", path.display());
        let settings = AppSettings::default();
        save_settings_to(path, &settings)?;
        return Ok(settings);
    }

    let contents =
        fs::read_to_string(path).map_err(|e| format!("Failed to read settings file: {}", e))?;

    serde_json::from_str(&contents).map_err(|e| format!("Failed to parse settings: {}", e))
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<(), String> {
    tracing::debug!("Saving settings to {}", path.display());

    let contents = serde_json::to_string_pretty(settings)
        .map_err(|e| format!("Failed to serialize settings: {}", e))?;

    fs::write(path, contents).map_err(|e| format!("Failed to write settings file: {}", e))
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    fn settings_path(dir: &TempDir) -> PathBuf {
        dir.path().join(SETTINGS_FILE)
    }

    #[test]
    fn test_missing_file_is_created_with_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(&dir);

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings, AppSettings::default());
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.enrichment_mode, EnrichmentMode::Sequential);

        assert!(path.exists());
        assert_eq!(load_settings_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(&dir);
        fs::write(&path, r#"{ "enrichment_mode": "concurrent" }"#).unwrap();

        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.enrichment_mode, EnrichmentMode::Concurrent);
        assert_eq!(settings.api_base_url, DEFAULT_API_BASE_URL);
        assert_eq!(settings.snapshot_buffer, DEFAULT_SNAPSHOT_BUFFER);
    }

    #[test]
    fn test_saved_settings_load_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(&dir);
        let settings = AppSettings {
            api_base_url: "http://localhost:8080/".to_string(),
            snapshot_buffer: 8,
            ..AppSettings::default()
        };

        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), settings);
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = settings_path(&dir);
        fs::write(&path, "not json").unwrap();

        let err = load_settings_from(&path).unwrap_err();
        assert!(err.starts_with("Failed to parse settings"));
    }
}
