//! User preferences, stored as JSON in the platform config directory.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Settings {
    /// Used to greet the user at the top of the app.
    pub display_name: String,
    /// Whether error messages surface as visible alerts.
    pub show_alerts: bool,
    /// Whether companion widgets refresh automatically after data changes.
    pub sync_widgets: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            display_name: String::new(),
            show_alerts: true,
            sync_widgets: true,
        }
    }
}

impl Settings {
    /// Loads settings from `path`, falling back to defaults when the file does
    /// not exist yet.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings: {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Failed to parse settings: {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create config directory: {}", parent.display()))?;
        }
        let json = serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, json)
            .with_context(|| format!("Failed to write settings: {}", path.display()))?;
        Ok(())
    }
}

pub(crate) fn settings_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "moneta", "Moneta")
        .ok_or_else(|| anyhow::anyhow!("Could not determine config directory"))?;
    Ok(proj_dirs.config_dir().join("settings.json"))
}
