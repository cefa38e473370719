// SPDX-License-Identifier: MIT
// Copyright (c) 2026 StarTuz

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAPBOX_TOKEN_ENV: &str = "MAPBOX_ACCESS_TOKEN";
pub const GEMINI_KEY_ENV: &str = "GEMINI_API_KEY";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Runtime settings, persisted as `config.json` in the config root.
/// Missing fields take their defaults so old files keep loading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AppConfig {
    pub mapbox_token: Option<String>,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub remote_classifier_enabled: bool,
    pub classifier_timeout_ms: u64,
    pub geocoder_timeout_ms: u64,
    pub directions_timeout_ms: u64,
    pub geocode_cache_capacity: usize,
    /// Degrees each hull vertex is pushed away from the centroid.
    pub hull_buffer_degrees: f64,
    pub history_limit: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            mapbox_token: None,
            gemini_api_key: None,
            gemini_model: DEFAULT_GEMINI_MODEL.to_string(),
            remote_classifier_enabled: true,
            classifier_timeout_ms: 5_000,
            geocoder_timeout_ms: 4_000,
            directions_timeout_ms: 8_000,
            geocode_cache_capacity: 512,
            hull_buffer_degrees: 0.5,
            history_limit: 50,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        crate::get_config_root().join("config.json")
    }

    /// Loads from the default path, then applies environment overrides.
    pub fn load() -> Result<Self> {
        let mut config = Self::load_from(&Self::default_path())?;
        config.apply_env();
        Ok(config)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            log::debug!("[Config] No config at {:?}, using defaults", path);
            return Ok(Self::default());
        }
        let content = fs::read_to_string(path).context("Failed to read config.json")?;
        serde_json::from_str(&content).context("Failed to parse config.json")
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent).context("Failed to create config directory")?;
            }
        }
        let content =
            serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(path, content).context("Failed to write config.json")
    }

    pub fn apply_env(&mut self) {
        self.apply_env_from(|key| std::env::var(key).ok());
    }

    /// Non-empty values from `lookup` replace the stored credentials.
    pub fn apply_env_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(token) = non_empty(MAPBOX_TOKEN_ENV) {
            self.mapbox_token = Some(token);
        }
        if let Some(key) = non_empty(GEMINI_KEY_ENV) {
            self.gemini_api_key = Some(key);
        }
    }

    pub fn classifier_timeout(&self) -> Duration {
        Duration::from_millis(self.classifier_timeout_ms)
    }

    pub fn geocoder_timeout(&self) -> Duration {
        Duration::from_millis(self.geocoder_timeout_ms)
    }

    pub fn directions_timeout(&self) -> Duration {
        Duration::from_millis(self.directions_timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"geocode_cache_capacity": 8}"#).unwrap();
        let config = AppConfig::load_from(&path).unwrap();
        assert_eq!(config.geocode_cache_capacity, 8);
        assert_eq!(config.classifier_timeout(), Duration::from_secs(5));
        assert_eq!(config.gemini_model, DEFAULT_GEMINI_MODEL);
    }

    #[test]
    fn test_env_overrides_skip_blank_values() {
        let mut config = AppConfig {
            mapbox_token: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env_from(|key| match key {
            MAPBOX_TOKEN_ENV => Some("  ".into()),
            GEMINI_KEY_ENV => Some("g-key".into()),
            _ => None,
        });
        assert_eq!(config.mapbox_token.as_deref(), Some("from-file"));
        assert_eq!(config.gemini_api_key.as_deref(), Some("g-key"));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let config = AppConfig {
            remote_classifier_enabled: false,
            ..AppConfig::default()
        };
        config.save_to(&path).unwrap();
        assert_eq!(AppConfig::load_from(&path).unwrap(), config);
    }
}
