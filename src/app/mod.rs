//! Binary-local application orchestration helpers.
//!
//! The main binary keeps wiring logic in `main.rs`, while this module hosts
//! the per-subcommand handlers.

pub(crate) mod commands;
