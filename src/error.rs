//! Unified error types for theme handling and configuration.

use std::fmt;

// ---------------------------------------------------------------------------
// ThemeError
// ---------------------------------------------------------------------------

/// Errors from theme import and registry mutation.
#[derive(Debug)]
pub enum ThemeError {
    /// The theme file could not be read.
    Io(std::io::Error),
    /// The document is not valid JSON once comments/trailing commas are gone.
    Parse(serde_json::Error),
    /// The document parsed but its top level is not an object.
    NotAnObject,
    /// The document has no `colors` mapping.
    MissingColors,
    /// No built-in or custom theme carries this name.
    UnknownTheme(String),
    /// Built-in palettes cannot be deleted or replaced.
    BuiltinReadOnly(String),
}

impl fmt::Display for ThemeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "could not read theme file: {e}"),
            Self::Parse(e) => write!(f, "could not parse theme file: {e}"),
            Self::NotAnObject => write!(f, "theme file is not a JSON object"),
            Self::MissingColors => write!(f, "theme file has no 'colors' section"),
            Self::UnknownTheme(name) => write!(f, "unknown theme `{name}`"),
            Self::BuiltinReadOnly(name) => write!(f, "`{name}` is a built-in theme"),
        }
    }
}

impl std::error::Error for ThemeError {}

impl From<std::io::Error> for ThemeError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ThemeError {
    fn from(e: serde_json::Error) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// ConfigError
// ---------------------------------------------------------------------------

/// Errors when loading or saving configuration.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Json(serde_json::Error),
    Invalid(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "io: {e}"),
            Self::Json(e) => write!(f, "json: {e}"),
            Self::Invalid(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<std::io::Error> for ConfigError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e)
    }
}
