//! Top-level config loading pipeline.
//!
//! Loading never fails: a missing, unreadable, or malformed document falls
//! back to defaults with a warning. Versioned upgrades run on the raw JSON
//! object before it is deserialized.

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ConfigError;
use crate::theme::{Theme, DEFAULT_THEME_NAME};

use super::defaults::{CURRENT_SCHEMA_VERSION, LEGACY_THEME_MAP};
use super::Config;

/// Config plus whether an upgrade rewrote the stored document.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedConfig {
    pub config: Config,
    /// True when the on-disk document should be re-saved in the new shape.
    pub migrated: bool,
}

/// Load configuration from `path`, falling back to defaults.
pub fn load_config(path: &Path) -> LoadedConfig {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!(path = %path.display(), "no config file; using defaults");
            return LoadedConfig::defaults();
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not read config; using defaults");
            return LoadedConfig::defaults();
        }
    };
    match parse_config(&text) {
        Ok(loaded) => {
            tracing::debug!(path = %path.display(), "config loaded");
            loaded
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), error = %err, "could not parse config; using defaults");
            LoadedConfig::defaults()
        }
    }
}

impl LoadedConfig {
    fn defaults() -> Self {
        Self {
            config: Config::default(),
            migrated: false,
        }
    }
}

/// Parse, upgrade, and validate one config document.
pub fn parse_config(text: &str) -> Result<LoadedConfig, ConfigError> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Object(mut doc) = value else {
        return Err(ConfigError::Invalid(
            "config document is not a JSON object".to_string(),
        ));
    };
    let migrated = migrate_document(&mut doc);
    drop_invalid_custom_themes(&mut doc);
    drop_mistyped_keys(&mut doc);
    let config = serde_json::from_value(Value::Object(doc))?;
    Ok(LoadedConfig { config, migrated })
}

/// Upgrade a pre-version-2 document in place. Returns whether it changed.
///
/// The legacy light/dark `theme` key is removed in every case and only
/// mapped onto `theme_name` when that key is absent.
pub fn migrate_document(doc: &mut Map<String, Value>) -> bool {
    let version = doc
        .get("schema_version")
        .and_then(Value::as_u64)
        .unwrap_or(1);
    if version >= u64::from(CURRENT_SCHEMA_VERSION) {
        return false;
    }

    let legacy = doc.remove("theme");
    if !doc.contains_key("theme_name") {
        let mapped = legacy
            .as_ref()
            .and_then(Value::as_str)
            .and_then(|old| {
                LEGACY_THEME_MAP
                    .iter()
                    .find(|(key, _)| *key == old)
                    .map(|(_, name)| *name)
            })
            .unwrap_or(DEFAULT_THEME_NAME);
        doc.insert("theme_name".to_string(), Value::from(mapped));
    }
    doc.insert(
        "schema_version".to_string(),
        Value::from(CURRENT_SCHEMA_VERSION),
    );
    tracing::info!(from = version, to = CURRENT_SCHEMA_VERSION, "upgraded config document");
    true
}

fn drop_invalid_custom_themes(doc: &mut Map<String, Value>) {
    let Some(Value::Object(custom)) = doc.get_mut("theme_custom") else {
        return;
    };
    custom.retain(|name, value| {
        match serde_json::from_value::<Theme>(value.clone()) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(theme = %name, error = %err, "dropping invalid custom theme");
                false
            }
        }
    });
}

/// Remove keys whose value does not fit the field, so one bad entry only
/// resets that entry to its default.
fn drop_mistyped_keys(doc: &mut Map<String, Value>) {
    doc.retain(|key, value| {
        let single = Map::from_iter([(key.clone(), value.clone())]);
        match serde_json::from_value::<Config>(Value::Object(single)) {
            Ok(_) => true,
            Err(err) => {
                tracing::warn!(key = %key, error = %err, "ignoring config value of the wrong type");
                false
            }
        }
    });
}
