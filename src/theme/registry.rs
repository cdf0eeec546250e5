//! Theme registry: immutable built-ins merged with user-imported customs.

use std::collections::BTreeMap;
use std::path::Path;

use crate::error::ThemeError;

use super::import::import_theme;
use super::palette::{builtin, builtin_themes, default_theme, is_builtin, Theme, DEFAULT_THEME_NAME};

/// Built-ins plus custom themes, with one active selection.
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    custom: BTreeMap<String, Theme>,
    active: String,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::new(BTreeMap::new(), DEFAULT_THEME_NAME)
    }
}

impl ThemeRegistry {
    /// Build from persisted customs and the persisted active name.
    ///
    /// Customs that shadow a built-in name are ignored; built-ins win.
    pub fn new(custom: BTreeMap<String, Theme>, active: &str) -> Self {
        let custom = custom
            .into_iter()
            .filter(|(name, _)| {
                let keep = !is_builtin(name);
                if !keep {
                    tracing::warn!(name = %name, "ignoring custom theme that shadows a built-in");
                }
                keep
            })
            .collect();
        Self {
            custom,
            active: active.to_string(),
        }
    }

    /// Built-in names in declared order, then custom names sorted.
    pub fn names(&self) -> Vec<String> {
        builtin_themes()
            .iter()
            .map(|(name, _)| name.to_string())
            .chain(self.custom.keys().cloned())
            .collect()
    }

    pub fn get(&self, name: &str) -> Option<&Theme> {
        builtin(name).or_else(|| self.custom.get(name))
    }

    pub fn is_custom(&self, name: &str) -> bool {
        self.custom.contains_key(name)
    }

    pub fn custom_themes(&self) -> &BTreeMap<String, Theme> {
        &self.custom
    }

    /// Stored active name, which may not resolve.
    pub fn active_name(&self) -> &str {
        &self.active
    }

    /// Active theme, falling back to the default built-in.
    pub fn active(&self) -> &Theme {
        self.get(&self.active).unwrap_or(default_theme())
    }

    pub fn set_active(&mut self, name: &str) -> Result<(), ThemeError> {
        if self.get(name).is_none() {
            return Err(ThemeError::UnknownTheme(name.to_string()));
        }
        self.active = name.to_string();
        Ok(())
    }

    /// First name for an import that does not collide with a built-in.
    ///
    /// Names that are free of built-ins are returned unchanged (an existing
    /// custom with that name gets replaced). Otherwise `"<name> (n)"` is tried
    /// from n = 2 until it matches neither a built-in nor an existing custom.
    pub fn unique_name(&self, name: &str) -> String {
        if !is_builtin(name) {
            return name.to_string();
        }
        (2usize..)
            .map(|n| format!("{name} ({n})"))
            .find(|candidate| self.get(candidate).is_none())
            .unwrap_or_else(|| name.to_string())
    }

    /// Store a custom theme under a unique name and return that name.
    pub fn insert_custom(&mut self, name: &str, theme: Theme) -> String {
        let name = self.unique_name(name);
        self.custom.insert(name.clone(), theme);
        name
    }

    /// Import a theme file, store it, and make it active.
    pub fn import_file(&mut self, path: &Path) -> Result<String, ThemeError> {
        let (name, theme) = import_theme(path)?;
        let stored = self.insert_custom(&name, theme);
        if stored != name {
            tracing::info!(requested = %name, stored = %stored, "renamed imported theme");
        }
        self.active = stored.clone();
        Ok(stored)
    }

    /// Delete one custom theme.
    ///
    /// Deleting the active theme reverts the selection to the default built-in.
    pub fn delete_custom(&mut self, name: &str) -> Result<(), ThemeError> {
        if is_builtin(name) {
            return Err(ThemeError::BuiltinReadOnly(name.to_string()));
        }
        if self.custom.remove(name).is_none() {
            return Err(ThemeError::UnknownTheme(name.to_string()));
        }
        if self.active == name {
            self.active = DEFAULT_THEME_NAME.to_string();
        }
        Ok(())
    }
}
