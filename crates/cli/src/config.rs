//! Application configuration — persisted as JSON.

use std::path::{Path, PathBuf};

use gif_delay::AbortCount;
use serde::{Deserialize, Serialize};

/// Global configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Frame count reported when a walk stops early.
    #[serde(default)]
    pub abort_count: AbortCount,
    /// Copy a GIF to `<file>.bak` before modifying it.
    #[serde(default)]
    pub backup: bool,
    /// `report` prints frame ranges by default.
    #[serde(default)]
    pub user_friendly_report: bool,
}

impl AppConfig {
    /// Platform config directory: `~/.config/gif-durations/`
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gif-durations")
    }

    fn config_file() -> PathBuf {
        Self::config_dir().join("config.json")
    }

    /// Load from disk, or return defaults if the file doesn't exist.
    pub fn load_or_default() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_file())
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let data = std::fs::read_to_string(path)?;
            Ok(serde_json::from_str(&data)?)
        } else {
            Ok(Self::default())
        }
    }

    /// Persist to disk.
    pub fn save(&self) -> anyhow::Result<()> {
        self.save_to(&Self::config_file())
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        std::fs::write(path, data)?;
        Ok(())
    }
}
