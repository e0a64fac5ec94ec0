/// Persistent user settings
///
/// Stored as JSON in the user's data directory:
/// - Linux: ~/.local/share/anim-catalog/settings.json
/// - macOS: ~/Library/Application Support/anim-catalog/settings.json
/// - Windows: %APPDATA%\anim-catalog\settings.json

use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::SettingsError;
use crate::export::ExportFormat;

const APP_DIR: &str = "anim-catalog";
const SETTINGS_FILE: &str = "settings.json";

/// Default catalog file name
pub const CATALOG_FILE: &str = "Animationlist.xml";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Settings {
    /// Animation list XML
    pub catalog_path: PathBuf,
    /// Root of the folder-backed archive
    pub archive_dir: PathBuf,
    /// Where exported images go
    pub output_dir: PathBuf,
    pub export_format: ExportFormat,
    /// Start with the catalog sorted by name instead of id
    pub sort_by_name: bool,
    /// Initial facing (0..=7)
    pub facing: u8,
}

impl Default for Settings {
    fn default() -> Self {
        let app_dir = app_data_dir().unwrap_or_else(|| PathBuf::from("."));
        let output_dir = dirs::picture_dir()
            .or_else(dirs::home_dir)
            .map(|dir| dir.join(APP_DIR))
            .unwrap_or_else(|| PathBuf::from("export"));

        Self {
            catalog_path: app_dir.join(CATALOG_FILE),
            archive_dir: app_dir.join("archive"),
            output_dir,
            export_format: ExportFormat::default(),
            sort_by_name: false,
            facing: 1,
        }
    }
}

/// Per-user application directory
pub fn app_data_dir() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .map(|dir| dir.join(APP_DIR))
}

impl Settings {
    /// Where the settings file lives by default
    pub fn default_path() -> Result<PathBuf, SettingsError> {
        app_data_dir()
            .map(|dir| dir.join(SETTINGS_FILE))
            .ok_or(SettingsError::NoDataDir)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Load settings from `path`, falling back to defaults if the file
    /// does not exist yet
    pub fn load(path: &Path) -> Result<Self, SettingsError> {
        if !path.exists() {
            info!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        Ok(Self::from_json(&fs::read_to_string(path)?)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
