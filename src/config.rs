//! User configuration and preferences.

use crate::error::{BroomError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Serialize, Deserialize)]
pub struct UserConfig {
    /// Ask before each delete during an interactive review.
    #[serde(default = "default_confirm_delete")]
    pub confirm_delete: bool,

    /// Session store file to use instead of the built-in default location.
    #[serde(default)]
    pub store_path: Option<PathBuf>,
}

fn default_confirm_delete() -> bool {
    true
}

impl Default for UserConfig {
    fn default() -> Self {
        UserConfig {
            confirm_delete: true,
            store_path: None,
        }
    }
}

impl UserConfig {
    /// Get the config file path (~/.config/broom/config.json)
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("broom").join("config.json"))
    }

    /// Load config from file, or create default if doesn't exist
    pub fn load() -> Result<Self> {
        let path = Self::config_path().ok_or_else(|| {
            BroomError::Config("Could not determine config directory".to_string())
        })?;

        if !path.exists() {
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(&path)
            .map_err(|e| BroomError::Config(format!("Failed to read config file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| BroomError::Config(format!("Failed to parse config file: {}", e)))
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path().ok_or_else(|| {
            BroomError::Config("Could not determine config directory".to_string())
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                BroomError::Config(format!("Failed to create config directory: {}", e))
            })?;
        }

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| BroomError::Config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&path, contents)
            .map_err(|e| BroomError::Config(format!("Failed to write config file: {}", e)))?;

        Ok(())
    }
}
