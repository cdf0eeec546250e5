//! Persisted application configuration.
//!
//! A flat JSON document at `~/.ytdrop_config.json` (or `--config <path>`)
//! holding the active theme, imported themes, cookie file, parameter
//! templates, download directory, and tool path. Missing keys take defaults;
//! documents older than the current schema are upgraded on load.

pub mod defaults;
mod init;
mod loader;
mod persist;
mod types;

pub use init::{default_config_path, resolve_config_path};
pub use loader::{load_config, migrate_document, parse_config, LoadedConfig};
pub use persist::save_config;
pub use types::{Config, JobConfig};
