//! Per-unit log files written next to the downloads.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::build_info::log_banner;
use crate::textutil::{prefix_chars, suffix_chars};

const TITLE_STEM_MAX_CHARS: usize = 180;
const URL_STEM_MAX_CHARS: usize = 120;

/// Replace characters that are unsafe in file names and cap the length.
pub fn sanitize_title(title: &str) -> String {
    let replaced = replace_chars(title, |c| {
        matches!(c, '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|')
    });
    prefix_chars(&replaced, TITLE_STEM_MAX_CHARS).to_string()
}

/// Log stem derived from a URL when no title is available.
///
/// Query separators are replaced too, and the tail is kept because it
/// carries the video id.
pub fn sanitize_url(url: &str) -> String {
    let replaced = replace_chars(url, |c| {
        matches!(
            c,
            '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '&' | '='
        )
    });
    suffix_chars(&replaced, URL_STEM_MAX_CHARS).to_string()
}

/// Log stem for a list-formats run over `url`.
pub fn list_formats_stem(url: &str) -> String {
    prefix_chars(&sanitize_title(url), URL_STEM_MAX_CHARS).to_string()
}

fn replace_chars(text: &str, unsafe_char: impl Fn(char) -> bool) -> String {
    text.chars()
        .map(|c| if unsafe_char(c) { '_' } else { c })
        .collect()
}

/// `<stem>.<kind>.log`, with the stem sanitized.
pub fn log_file_name(stem: &str, kind: &str) -> String {
    format!("{}.{kind}.log", sanitize_title(stem))
}

/// Open log for one unit of work. Write failures are logged and otherwise
/// ignored so a full disk never aborts a download.
#[derive(Debug)]
pub struct UnitLog {
    path: PathBuf,
    out: BufWriter<File>,
}

impl UnitLog {
    /// Create `dir` if needed and start a fresh log with a dated header.
    pub fn open(dir: &Path, stem: &str, kind: &str) -> io::Result<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(log_file_name(stem, kind));
        let mut out = BufWriter::new(File::create(&path)?);
        writeln!(
            out,
            "# ytdrop log - {}\n# {}\n",
            httpdate::fmt_http_date(SystemTime::now()),
            log_banner()
        )?;
        out.flush()?;
        Ok(Self { path, out })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_command(&mut self, argv: &[String]) {
        let result = writeln!(self.out, "$ {}\n", argv.join(" ")).and_then(|()| self.out.flush());
        self.report(result);
    }

    pub fn write_line(&mut self, line: &str) {
        let result = writeln!(self.out, "{line}");
        self.report(result);
    }

    /// Flush and close.
    pub fn close(mut self) {
        let result = self.out.flush();
        self.report(result);
    }

    fn report(&self, result: io::Result<()>) {
        if let Err(err) = result {
            tracing::debug!(path = %self.path.display(), error = %err, "log write failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testsupport::TestTempDir;

    #[test]
    fn title_sanitization_replaces_reserved_characters() {
        assert_eq!(sanitize_title(r#"a/b\c:d*e?f"g<h>i|j"#), "a_b_c_d_e_f_g_h_i_j");
        assert_eq!(sanitize_title("Q&A = fun"), "Q&A = fun");
    }

    #[test]
    fn title_sanitization_keeps_first_180_chars() {
        let long = "é".repeat(200);
        assert_eq!(sanitize_title(&long).chars().count(), 180);
    }

    #[test]
    fn url_fallback_keeps_the_tail() {
        let stem = sanitize_url("https://www.youtube.com/watch?v=abc&t=10");
        assert_eq!(stem, "https___www.youtube.com_watch_v_abc_t_10");

        let long = format!("https://example.com/{}END", "x".repeat(300));
        let stem = sanitize_url(&long);
        assert_eq!(stem.chars().count(), 120);
        assert!(stem.ends_with("xEND"));
    }

    #[test]
    fn list_formats_stem_keeps_the_head() {
        let long = format!("https://example.com/{}", "y".repeat(300));
        let stem = list_formats_stem(&long);
        assert_eq!(stem.chars().count(), 120);
        assert!(stem.starts_with("https___example.com_"));
    }

    #[test]
    fn log_names_carry_the_kind() {
        assert_eq!(log_file_name("My: Clip", "audio"), "My_ Clip.audio.log");
    }

    #[test]
    fn unit_log_writes_header_command_and_lines() {
        let dir = TestTempDir::new("unit-log");
        let out_dir = dir.child("nested/out");
        let mut log = UnitLog::open(&out_dir, "clip", "video").expect("open");
        let path = log.path().to_path_buf();
        log.write_command(&["yt-dlp".to_string(), "u".to_string()]);
        log.write_line("[download] 100%");
        log.close();

        assert_eq!(path, out_dir.join("clip.video.log"));
        let text = std::fs::read_to_string(path).expect("read log");
        let mut lines = text.lines();
        assert!(lines.next().expect("header").starts_with("# ytdrop log - "));
        assert!(lines.next().expect("banner").starts_with("# ytdrop "));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("$ yt-dlp u"));
        assert_eq!(lines.next(), Some(""));
        assert_eq!(lines.next(), Some("[download] 100%"));
    }

    #[test]
    fn open_fails_when_directory_is_a_file() {
        let dir = TestTempDir::new("unit-log-fail");
        let blocker = dir.write_text("blocker", "x");
        assert!(UnitLog::open(&blocker, "clip", "video").is_err());
    }
}
