//! Display and audio preferences
//!
//! Persisted separately from the best score as a small JSON file.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::highscores::PersistError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Drawing ===
    /// Filled triangles on top of outlines
    pub solid: bool,
    /// Skin the cow
    pub textured: bool,

    // === Camera ===
    /// Four quadrants instead of one viewport
    pub multi_view: bool,
    /// Perspective projection for the fixed views
    pub perspective: bool,
    /// Oblique (else axonometric) fourth view
    pub oblique: bool,

    // === HUD ===
    /// Show the key help panel
    pub show_panel: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    pub muted: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            solid: true,
            textured: false,

            multi_view: false,
            perspective: false,
            oblique: true,

            show_panel: true,

            master_volume: 0.8,
            muted: false,
        }
    }
}

impl Settings {
    /// Load settings from a JSON file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        match Self::try_load(path) {
            Ok(Some(settings)) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(err) => {
                log::warn!("Ignoring unreadable settings {}: {}", path.display(), err);
                Self::default()
            }
        }
    }

    fn try_load(path: &Path) -> Result<Option<Self>, PersistError> {
        let json = match fs::read_to_string(path) {
            Ok(json) => json,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        let mut settings: Self = serde_json::from_str(&json)?;
        settings.master_volume = settings.master_volume.clamp(0.0, 1.0);
        Ok(Some(settings))
    }

    /// Save settings to a JSON file
    pub fn save_to(&self, path: &Path) -> Result<(), PersistError> {
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Settings saved");
        Ok(())
    }
}
