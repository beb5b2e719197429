//! TOML-backed defaults for the user-model region.
//!
//! These are the values `SetState` seeds a fresh `UserModelState` with.
//! Runtime settings changes arrive as `ChangeSetting` events and are
//! persisted by the external settings store, not here.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Core configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CoreConfig {
    /// Locale the user model starts in.
    #[serde(default = "default_locale")]
    pub locale: String,
    /// Default ad placement; `None` lets the ad engine decide.
    #[serde(default)]
    pub ad_place: Option<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            locale: default_locale(),
            ad_place: None,
        }
    }
}

fn default_locale() -> String {
    "en-US".to_string()
}

impl CoreConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|e| ConfigError::LoadFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        toml::from_str(&raw).map_err(|e| ConfigError::ParseFailed(e.to_string()))
    }

    /// Missing file means defaults; a present-but-broken file is an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let raw = toml::to_string_pretty(self).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        std::fs::write(path, raw).map_err(|e| ConfigError::SaveFailed {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }
}
