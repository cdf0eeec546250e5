//! CLI argument parsing via clap.

use clap::{ArgAction, Args as ClapArgs, Parser, Subcommand};
use ytdrop::build_info::HELP_BUILD_METADATA;
use ytdrop::downloader::{DEFAULT_RES_INDEX, RESOLUTIONS};

/// Download videos and audio with yt-dlp, styled by editor themes.
#[derive(Debug, Parser)]
#[command(name = "ytdrop", version, after_long_help = HELP_BUILD_METADATA)]
pub struct Args {
    /// Path to config file (default: ~/.ytdrop_config.json).
    #[arg(short = 'c', long = "config", global = true)]
    pub config: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Disable color output.
    #[arg(long = "no-color", global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download one or more URLs.
    Fetch(FetchArgs),
    /// List the formats available for one or more URLs.
    Formats(FormatsArgs),
    /// Inspect, select, import, or delete themes.
    Theme {
        #[command(subcommand)]
        action: ThemeAction,
    },
}

#[derive(Debug, ClapArgs)]
pub struct FetchArgs {
    /// URLs to download, processed in order.
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Download video (default when neither --video nor --audio is given).
    #[arg(long)]
    pub video: bool,

    /// Extract audio.
    #[arg(long)]
    pub audio: bool,

    /// Resolution index: 0=2160p, 1=1440p, 2=1080p, 3=720p, 4=480p.
    #[arg(long, default_value_t = DEFAULT_RES_INDEX as u8,
          value_parser = clap::value_parser!(u8).range(0..RESOLUTIONS.len() as i64))]
    pub res: u8,

    /// Pass the configured cookie file to yt-dlp.
    #[arg(long)]
    pub cookies: bool,

    /// Output directory for this run (overrides the configured one).
    #[arg(short = 'o', long = "output")]
    pub output: Option<String>,
}

impl FetchArgs {
    /// Selected modes as (video, audio); video alone when nothing is chosen.
    pub fn modes(&self) -> (bool, bool) {
        if !self.video && !self.audio {
            (true, false)
        } else {
            (self.video, self.audio)
        }
    }
}

#[derive(Debug, ClapArgs)]
pub struct FormatsArgs {
    #[arg(required = true)]
    pub urls: Vec<String>,

    /// Pass the configured cookie file to yt-dlp.
    #[arg(long)]
    pub cookies: bool,
}

#[derive(Debug, Subcommand)]
pub enum ThemeAction {
    /// List built-in and custom themes.
    List,
    /// Show a theme's palette and the styled window layout.
    Show {
        /// Theme name (default: the active theme).
        name: Option<String>,
    },
    /// Make a theme active.
    Use { name: String },
    /// Import a VS Code color theme file (JSON with comments).
    Import { file: String },
    /// Delete an imported theme.
    Delete { name: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_defaults_to_video_at_1080p() {
        let args = Args::parse_from(["ytdrop", "fetch", "https://a"]);
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert_eq!(fetch.modes(), (true, false));
        assert_eq!(usize::from(fetch.res), DEFAULT_RES_INDEX);
        assert!(!fetch.cookies);
    }

    #[test]
    fn fetch_accepts_both_modes_and_globals_after_subcommand() {
        let args = Args::parse_from([
            "ytdrop", "fetch", "u1", "u2", "--audio", "--video", "--res", "4", "-vv",
            "--no-color",
        ]);
        assert_eq!(args.verbose, 2);
        assert!(args.no_color);
        let Command::Fetch(fetch) = args.command else {
            panic!("expected fetch");
        };
        assert_eq!(fetch.urls, vec!["u1", "u2"]);
        assert_eq!(fetch.modes(), (true, true));
        assert_eq!(fetch.res, 4);
    }

    #[test]
    fn out_of_range_resolution_is_rejected() {
        assert!(Args::try_parse_from(["ytdrop", "fetch", "u", "--res", "5"]).is_err());
    }

    #[test]
    fn theme_subcommands_parse() {
        let args = Args::parse_from(["ytdrop", "theme", "use", "Nord"]);
        assert!(matches!(
            args.command,
            Command::Theme {
                action: ThemeAction::Use { ref name }
            } if name == "Nord"
        ));
        let args = Args::parse_from(["ytdrop", "-c", "/tmp/c.json", "theme", "show"]);
        assert_eq!(args.config.as_deref(), Some("/tmp/c.json"));
    }
}
