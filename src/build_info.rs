//! Compile-time build metadata exposed to CLI surfaces.

/// Semver package version from `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// VCS commit hash captured at build time.
pub const GIT_COMMIT: &str = env!("YTDROP_BUILD_GIT_HASH");

/// Build timestamp captured at compile time.
pub const BUILD_TIMESTAMP: &str = env!("YTDROP_BUILD_TIMESTAMP");

/// Help trailer block that surfaces build metadata in `ytdrop --help`.
pub const HELP_BUILD_METADATA: &str = concat!(
    "Build metadata:\n  commit: ",
    env!("YTDROP_BUILD_GIT_HASH"),
    "\n  built: ",
    env!("YTDROP_BUILD_TIMESTAMP")
);

/// Build line written into every per-unit download log.
pub fn log_banner() -> String {
    format!("ytdrop {VERSION} ({GIT_COMMIT})")
}
