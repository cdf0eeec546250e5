//! CLI entry point for ytdrop.

mod app;
mod cli;

use clap::Parser;
use std::io::IsTerminal;

use app::commands::{download, theme};
use cli::Command;
use ytdrop::build_info::log_banner;
use ytdrop::config::{load_config, resolve_config_path, save_config};
use ytdrop::render::Console;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    ytdrop::logging::init(args.verbose);
    tracing::debug!(build = %log_banner(), "starting");

    let Some(config_path) = resolve_config_path(args.config.as_deref()) else {
        eprintln!("error: could not determine the home directory; pass --config <path>");
        std::process::exit(1);
    };
    let loaded = load_config(&config_path);
    let mut config = loaded.config;
    if loaded.migrated {
        // Persist the upgrade so it runs once.
        if let Err(err) = save_config(&config_path, &config) {
            tracing::warn!(path = %config_path.display(), error = %err, "could not save upgraded config");
        }
    }

    let color = !args.no_color && std::io::stdout().is_terminal();
    let console = Console::new(*config.theme_registry().active(), color);

    let code = match args.command {
        Command::Fetch(fetch) => download::run_fetch(&console, &config, fetch).await,
        Command::Formats(formats) => download::run_formats(&console, &config, formats).await,
        Command::Theme { action } => {
            theme::handle_theme_command(&console, &mut config, &config_path, action)
        }
    };
    std::process::exit(code);
}
