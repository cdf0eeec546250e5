//! Config persistence.

use std::path::Path;

use crate::error::ConfigError;

use super::Config;

/// Write `config` as pretty-printed JSON, creating parent directories.
///
/// Callers treat failure as a non-fatal warning.
pub fn save_config(path: &Path, config: &Config) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut text = serde_json::to_string_pretty(config)?;
    text.push('\n');
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), "config saved");
    Ok(())
}
