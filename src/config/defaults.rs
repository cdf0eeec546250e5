//! Built-in configuration defaults.

use std::path::PathBuf;

/// Current persisted document version. Version 1 documents predate the
/// theme registry and may carry the legacy light/dark `theme` key.
pub const CURRENT_SCHEMA_VERSION: u32 = 2;

/// File name of the per-user config document inside the home directory.
pub const CONFIG_FILE_NAME: &str = ".ytdrop_config.json";

/// Executable of the external media tool.
pub const DEFAULT_TOOL_PATH: &str = "yt-dlp";

/// `{res}` is replaced with the selected resolution before tokenizing.
pub const DEFAULT_VIDEO_PARAMS: &str = concat!(
    "-f 'bestvideo[ext=mp4][height<={res}]+bestaudio[ext=m4a]",
    "/best[ext=mp4][height<={res}]/best'",
    " -o \"%(title)s.%(ext)s\""
);

pub const DEFAULT_AUDIO_PARAMS: &str = concat!(
    "--extract-audio --audio-format mp3 --audio-quality 0",
    " -o \"%(title)s.%(ext)s\""
);

/// Legacy two-valued `theme` key mapped onto built-in palette names.
pub const LEGACY_THEME_MAP: [(&str, &str); 2] =
    [("dark", "Catppuccin Mocha"), ("light", "Catppuccin Latte")];

/// `$HOME/Downloads`, or a relative `Downloads` when no home is known.
pub fn default_download_dir() -> String {
    dirs::home_dir()
        .map(|home| home.join("Downloads"))
        .unwrap_or_else(|| PathBuf::from("Downloads"))
        .display()
        .to_string()
}
