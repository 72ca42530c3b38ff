// Copyright (c) 2025, MemeStudio Developers
// SPDX-License-Identifier: BSD-3-Clause

//! Persisted user settings.

use std::path::PathBuf;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// File name of the image loaded at startup when present in the
    /// working directory.
    pub default_image: String,
    /// Directory the last export was written to; export dialogs start here.
    pub last_export_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            default_image: "midwit.jpg".to_string(),
            last_export_dir: None,
        }
    }
}

impl Settings {
    fn file_path() -> Option<PathBuf> {
        let dirs = ProjectDirs::from("com", "memestudio", "memestudio")?;
        let config_dir = dirs.config_dir();
        std::fs::create_dir_all(config_dir).ok()?;
        Some(config_dir.join("settings.json"))
    }

    pub fn load() -> Result<Self> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Stored settings when available, defaults otherwise, with the
    /// `MEMESTUDIO_DEFAULT_IMAGE` override applied on top.
    pub fn load_or_default() -> Self {
        let mut settings = Self::load().unwrap_or_default();
        if let Ok(default_image) = std::env::var("MEMESTUDIO_DEFAULT_IMAGE") {
            settings.default_image = default_image;
        }
        settings
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::file_path().context("cannot resolve settings path")?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::Settings;

    #[test]
    fn defaults_point_at_the_bundled_template() {
        let settings = Settings::default();
        assert_eq!(settings.default_image, "midwit.jpg");
        assert_eq!(settings.last_export_dir, None);
    }

    #[test]
    fn settings_round_trip_through_json() {
        let settings = Settings::default();
        let raw = serde_json::to_string(&settings).unwrap();
        let parsed: Settings = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed.default_image, settings.default_image);
    }

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: Settings = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.default_image, "midwit.jpg");
    }
}
