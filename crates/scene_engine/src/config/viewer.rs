//! # Viewer Configuration
//!
//! Settings the scene driver and the viewer binary read at startup: where
//! scene documents live, how often the host ticks, and which player's camera
//! the board starts on.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::Config;

/// Largest number of lights the rendering context exposes
pub const MAX_SUPPORTED_LIGHTS: usize = crate::scene::MAX_LIGHTS;

/// Scene loading and frame loop configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory scene documents are resolved against
    pub scenes_dir: String,
    /// Scene document file name inside `scenes_dir`
    pub scene_file: String,
    /// Host update period in milliseconds
    pub update_period_ms: u32,
    /// Maximum number of document lights honoured
    pub max_lights: usize,
    /// Player whose camera is active first (1 or 2)
    pub starting_player: u8,
    /// Whether picking toggles the "selected" material variant
    pub selection_enabled: bool,
    /// Log level for `env_logger`
    pub log_level: String,
    /// Number of frames the headless viewer runs
    pub frames: u32,
}

impl ViewerConfig {
    /// Create a configuration for a scene file with defaults elsewhere
    pub fn new(scene_file: impl Into<String>) -> Self {
        Self {
            scene_file: scene_file.into(),
            ..Self::default()
        }
    }

    /// Set the scenes directory
    pub fn with_scenes_dir(mut self, dir: impl Into<String>) -> Self {
        self.scenes_dir = dir.into();
        self
    }

    /// Set the starting player
    pub fn with_starting_player(mut self, player: u8) -> Self {
        self.starting_player = player;
        self
    }

    /// Enable or disable selection on pick
    pub fn with_selection(mut self, enabled: bool) -> Self {
        self.selection_enabled = enabled;
        self
    }

    /// Full path of the scene document
    pub fn scene_path(&self) -> PathBuf {
        PathBuf::from(&self.scenes_dir).join(&self.scene_file)
    }
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            scenes_dir: "scenes".to_string(),
            scene_file: "board.xml".to_string(),
            update_period_ms: 20,
            max_lights: MAX_SUPPORTED_LIGHTS,
            starting_player: 1,
            selection_enabled: false,
            log_level: "info".to_string(),
            frames: 120,
        }
    }
}

impl Config for ViewerConfig {
    fn validate(&self) -> Result<(), String> {
        if self.scene_file.is_empty() {
            return Err("Scene file cannot be empty".to_string());
        }

        if self.update_period_ms == 0 {
            return Err("Update period must be at least 1 ms".to_string());
        }

        if self.max_lights == 0 || self.max_lights > MAX_SUPPORTED_LIGHTS {
            return Err(format!(
                "Max lights must be between 1 and {MAX_SUPPORTED_LIGHTS}"
            ));
        }

        if !matches!(self.starting_player, 1 | 2) {
            return Err(format!("No such player {}", self.starting_player));
        }

        Ok(())
    }
}
