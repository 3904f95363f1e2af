//! Game settings and preferences
//!
//! Persisted as a JSON file next to the high scores.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consts::{MAX_FRAME_DT, TARGET_FPS};
use crate::error::EngineError;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Simulation ===
    /// RNG seed; `None` seeds from the clock
    pub seed: Option<u64>,
    /// Frame pacing for the headless loop
    pub target_fps: u32,
    /// Longest timestep fed to the simulation after a stall (seconds)
    pub max_frame_dt: f32,
    /// Stop after this many frames
    pub frame_limit: Option<u64>,
    /// Post a new-game command on launch
    pub autostart: bool,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    pub muted: bool,

    // === Paths ===
    pub highscore_path: String,
    /// Directory holding animation descriptors
    pub asset_dir: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            seed: None,
            target_fps: TARGET_FPS,
            max_frame_dt: MAX_FRAME_DT,
            frame_limit: None,
            autostart: true,

            // Audio
            master_volume: 0.8,
            sfx_volume: 1.0,
            muted: false,

            highscore_path: "highscore.json".to_string(),
            asset_dir: "video".to_string(),
        }
    }
}

impl Settings {
    /// Seconds per frame at the target rate
    pub fn frame_budget(&self) -> f32 {
        1.0 / self.target_fps.max(1) as f32
    }

    /// Load settings from a JSON file, falling back to defaults
    pub fn load(path: &Path) -> Self {
        let json = match std::fs::read_to_string(path) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("No settings at {} ({e}), using defaults", path.display());
                return Self::default();
            }
        };
        match serde_json::from_str(&json) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path.display());
                settings
            }
            Err(e) => {
                log::warn!("Unparsable settings in {} ({e}), using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), EngineError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| EngineError::PersistenceWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        std::fs::write(path, json).map_err(|e| EngineError::PersistenceWrite {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        log::info!("Settings saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"seed": 7, "muted": true}"#).unwrap();
        assert_eq!(settings.seed, Some(7));
        assert!(settings.muted);
        assert_eq!(settings.target_fps, TARGET_FPS);
        assert_eq!(settings.master_volume, Settings::default().master_volume);
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let settings = Settings::load(Path::new("/definitely/not/here.json"));
        assert_eq!(settings, Settings::default());
    }

    #[test]
    fn test_save_then_load() {
        let path = std::env::temp_dir().join(format!("arcade-settings-{}.json", std::process::id()));
        let settings = Settings {
            frame_limit: Some(120),
            sfx_volume: 0.5,
            ..Settings::default()
        };
        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
        let _ = std::fs::remove_file(&path);
    }
}
