//! Argument-vector construction for the external media tool.

use regex::{Captures, Regex};
use std::fmt;
use std::sync::OnceLock;

use crate::config::JobConfig;

/// Selectable heights, highest first.
pub const RESOLUTIONS: [u32; 5] = [2160, 1440, 1080, 720, 480];
pub const DEFAULT_RES_INDEX: usize = 2;
/// Placeholder replaced with the chosen height in the video template.
pub const RES_PLACEHOLDER: &str = "{res}";

/// `-o "<arg>"` or `-o '<arg>'`.
const QUOTED_OUTPUT_FLAG: &str = r#"-o\s+["']([^"']+)["']"#;
/// `-o <arg>` with a single bare token.
const BARE_OUTPUT_FLAG: &str = r"-o\s+(\S+)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DownloadMode {
    Video,
    Audio,
}

impl DownloadMode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Video => "video",
            Self::Audio => "audio",
        }
    }
}

impl fmt::Display for DownloadMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested modes in execution order: video before audio.
pub fn modes_for(video: bool, audio: bool) -> Vec<DownloadMode> {
    let mut modes = Vec::with_capacity(2);
    if video {
        modes.push(DownloadMode::Video);
    }
    if audio {
        modes.push(DownloadMode::Audio);
    }
    modes
}

/// Height at `index`, clamped to the lowest entry when out of range.
pub fn resolution(index: usize) -> u32 {
    RESOLUTIONS[index.min(RESOLUTIONS.len() - 1)]
}

/// Full download invocation for one URL and mode.
pub fn build_command(
    url: &str,
    mode: DownloadMode,
    config: &JobConfig,
    use_cookie: bool,
    res_index: usize,
) -> Vec<String> {
    let mut argv = vec![config.tool_path.clone()];
    push_cookie_args(&mut argv, config, use_cookie);

    let params = match mode {
        DownloadMode::Audio => config.audio_params.clone(),
        DownloadMode::Video => config
            .video_params
            .replace(RES_PLACEHOLDER, &resolution(res_index).to_string()),
    };
    let params = rewrite_output_path(&params, &config.download_dir);
    argv.extend(split_params(&params));
    argv.push(url.to_string());
    argv
}

/// `--list-formats` invocation for one URL.
pub fn list_formats_command(url: &str, config: &JobConfig, use_cookie: bool) -> Vec<String> {
    let mut argv = vec![config.tool_path.clone(), "--list-formats".to_string()];
    push_cookie_args(&mut argv, config, use_cookie);
    argv.push(url.to_string());
    argv
}

/// Title-only probe used to name log files.
pub fn title_command(url: &str, config: &JobConfig, use_cookie: bool) -> Vec<String> {
    let mut argv = vec![
        config.tool_path.clone(),
        "--print".to_string(),
        "title".to_string(),
        "--no-playlist".to_string(),
    ];
    push_cookie_args(&mut argv, config, use_cookie);
    argv.push(url.to_string());
    argv
}

fn push_cookie_args(argv: &mut Vec<String>, config: &JobConfig, use_cookie: bool) {
    if !use_cookie {
        return;
    }
    if let Some(cookie_file) = config.cookie_file.as_deref() {
        argv.push("--cookies".to_string());
        argv.push(cookie_file.to_string());
    }
}

fn output_flag_patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [QUOTED_OUTPUT_FLAG, BARE_OUTPUT_FLAG]
            .iter()
            .filter_map(|pattern| Regex::new(pattern).ok())
            .collect()
    })
}

/// Anchor the `-o` template under `out_dir`.
///
/// The quoted form is tried first, then the bare-token form. The directory is
/// inserted through a closure replacer so `$1`-like text in either the path or
/// the template is never expanded.
pub fn rewrite_output_path(params: &str, out_dir: &str) -> String {
    for pattern in output_flag_patterns() {
        let rewritten = pattern.replace_all(params, |caps: &Captures<'_>| {
            format!("-o \"{out_dir}/{}\"", &caps[1])
        });
        if rewritten != params {
            return rewritten.into_owned();
        }
    }
    params.to_string()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitError {
    UnclosedQuote(char),
    TrailingEscape,
}

impl fmt::Display for SplitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnclosedQuote(q) => write!(f, "no closing quotation ({q})"),
            Self::TrailingEscape => write!(f, "no escaped character"),
        }
    }
}

impl std::error::Error for SplitError {}

/// POSIX-style word splitting: single quotes are literal, double quotes honor
/// only `\\` and `\"`, and a bare backslash escapes the next character.
pub fn shell_split(input: &str) -> Result<Vec<String>, SplitError> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut in_word = false;
    let mut chars = input.chars();

    while let Some(ch) = chars.next() {
        match ch {
            c if c.is_whitespace() => {
                if in_word {
                    words.push(std::mem::take(&mut current));
                    in_word = false;
                }
            }
            '\'' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('\'') => break,
                        Some(c) => current.push(c),
                        None => return Err(SplitError::UnclosedQuote('\'')),
                    }
                }
            }
            '"' => {
                in_word = true;
                loop {
                    match chars.next() {
                        Some('"') => break,
                        Some('\\') => match chars.next() {
                            Some(c @ ('\\' | '"')) => current.push(c),
                            Some(c) => {
                                current.push('\\');
                                current.push(c);
                            }
                            None => return Err(SplitError::UnclosedQuote('"')),
                        },
                        Some(c) => current.push(c),
                        None => return Err(SplitError::UnclosedQuote('"')),
                    }
                }
            }
            '\\' => {
                in_word = true;
                match chars.next() {
                    Some(c) => current.push(c),
                    None => return Err(SplitError::TrailingEscape),
                }
            }
            c => {
                in_word = true;
                current.push(c);
            }
        }
    }
    if in_word {
        words.push(current);
    }
    Ok(words)
}

/// Tokenize a parameter template, degrading to whitespace splitting.
pub fn split_params(params: &str) -> Vec<String> {
    shell_split(params).unwrap_or_else(|err| {
        tracing::warn!(error = %err, "parameter template did not tokenize; splitting on whitespace");
        params.split_whitespace().map(str::to_string).collect()
    })
}
