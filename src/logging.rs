//! Logging setup using tracing.
//!
//! Diagnostics go to stderr so they never interleave with console output on
//! stdout. `RUST_LOG` directives are honored on top of the verbosity level.

use tracing::Level;
use tracing_subscriber::{fmt, EnvFilter};

/// Level for a repeated `-v` count (0=warn, 1=info, 2=debug, 3+=trace).
pub fn level_for(verbosity: u8) -> Level {
    match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    }
}

/// Install the global tracing subscriber. Later calls are no-ops.
pub fn init(verbosity: u8) {
    let filter = EnvFilter::from_default_env().add_directive(level_for(verbosity).into());

    let installed = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .try_init();
    if installed.is_err() {
        tracing::debug!("tracing subscriber already installed");
    }
}
