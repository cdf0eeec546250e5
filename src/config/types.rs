//! Configuration data model.
//!
//! This module holds the persisted document shape plus default values.
//! Loading, migration, and saving live in `loader` and `persist`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::theme::{Theme, ThemeRegistry, DEFAULT_THEME_NAME};

use super::defaults::{
    default_download_dir, CURRENT_SCHEMA_VERSION, DEFAULT_AUDIO_PARAMS, DEFAULT_TOOL_PATH,
    DEFAULT_VIDEO_PARAMS,
};

/// Flat key-value application configuration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub schema_version: u32,
    /// Active theme name (built-in or custom).
    pub theme_name: String,
    /// Imported themes keyed by display name.
    pub theme_custom: BTreeMap<String, Theme>,
    /// Netscape cookie file handed to the tool when cookies are enabled.
    pub cookie_file: String,
    pub video_params: String,
    pub audio_params: String,
    pub download_dir: String,
    /// External media tool executable.
    pub tool_path: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema_version: CURRENT_SCHEMA_VERSION,
            theme_name: DEFAULT_THEME_NAME.to_string(),
            theme_custom: BTreeMap::new(),
            cookie_file: String::new(),
            video_params: DEFAULT_VIDEO_PARAMS.to_string(),
            audio_params: DEFAULT_AUDIO_PARAMS.to_string(),
            download_dir: default_download_dir(),
            tool_path: DEFAULT_TOOL_PATH.to_string(),
        }
    }
}

impl Config {
    /// Theme registry seeded from the persisted customs and active name.
    pub fn theme_registry(&self) -> ThemeRegistry {
        ThemeRegistry::new(self.theme_custom.clone(), &self.theme_name)
    }

    /// Write registry state back into the persisted fields.
    pub fn store_theme_registry(&mut self, registry: &ThemeRegistry) {
        self.theme_name = registry.active_name().to_string();
        self.theme_custom = registry.custom_themes().clone();
    }

    /// Cookie file path when one is configured.
    pub fn cookie_path(&self) -> Option<&str> {
        let trimmed = self.cookie_file.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }
}

/// Snapshot handed to a download job so later config edits never leak in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobConfig {
    pub tool_path: String,
    pub download_dir: String,
    pub video_params: String,
    pub audio_params: String,
    pub cookie_file: Option<String>,
}

impl From<&Config> for JobConfig {
    fn from(config: &Config) -> Self {
        Self {
            tool_path: config.tool_path.clone(),
            download_dir: config.download_dir.clone(),
            video_params: config.video_params.clone(),
            audio_params: config.audio_params.clone(),
            cookie_file: config.cookie_path().map(str::to_string),
        }
    }
}
