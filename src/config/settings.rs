use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::game::STEP_COUNT;

/// User settings for the game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSettings {
    /// Gap between steps during sequence playback, in milliseconds
    pub sound_interval_ms: u64,
    /// Delay before replaying the grown sequence after a completed round
    pub pre_sequence_delay_ms: u64,
    /// Number of distinct step cues (buttons)
    pub step_count: usize,
}

impl Default for GameSettings {
    fn default() -> Self {
        Self {
            sound_interval_ms: 500,
            pre_sequence_delay_ms: 500,
            step_count: STEP_COUNT,
        }
    }
}

impl GameSettings {
    /// Load settings from disk
    pub fn load() -> Self {
        Self::load_from_file().unwrap_or_default()
    }

    fn load_from_file() -> Result<Self> {
        let path = Self::settings_path()?;
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            Ok(serde_json::from_str(&content)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self) -> Result<()> {
        let path = Self::settings_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn settings_path() -> Result<PathBuf> {
        if let Some(proj_dirs) = ProjectDirs::from("com", "recall", "recall") {
            Ok(proj_dirs.config_dir().join("settings.json"))
        } else {
            Ok(PathBuf::from(".recall-settings.json"))
        }
    }

    /// Playback gap in the scheduler's clock unit.
    pub fn interval_us(&self) -> i64 {
        self.sound_interval_ms as i64 * 1_000
    }

    /// Post-round replay delay in the scheduler's clock unit.
    pub fn pre_sequence_delay_us(&self) -> i64 {
        self.pre_sequence_delay_ms as i64 * 1_000
    }
}
