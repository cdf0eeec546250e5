//! Config-path helpers.

use std::path::PathBuf;

use super::defaults::CONFIG_FILE_NAME;

/// Return the default per-user config path (`~/.ytdrop_config.json`).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
}

/// Resolve the effective config path from an optional `--config` override.
pub fn resolve_config_path(path_override: Option<&str>) -> Option<PathBuf> {
    match path_override.map(str::trim) {
        Some(path) if !path.is_empty() => Some(PathBuf::from(path)),
        _ => default_config_path(),
    }
}
