//! Subcommand helper modules used by the CLI.

/// `fetch` / `formats` command helpers.
pub(crate) mod download;
/// `theme` command helpers.
pub(crate) mod theme;
