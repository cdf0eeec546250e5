//! Output-line classification for console coloring.

/// Semantic tag attached to a console line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LineTag {
    Error,
    Warn,
    Success,
    Info,
}

impl LineTag {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Success => "success",
            Self::Info => "info",
        }
    }
}

const ERROR_KEYWORDS: [&str; 2] = ["error", "got error"];
const WARN_KEYWORDS: [&str; 4] = [
    "warning",
    "retrying",
    "skipping fragment",
    "has already been downloaded",
];
/// Post-processor prefix emitted when audio extraction writes its file.
const EXTRACT_MARKER: &str = "[ExtractAudio]";

/// Tag one line of tool output. Progress and generic info lines get `None`.
///
/// Keyword sets match case-insensitively; the success markers are literal.
pub fn classify(line: &str) -> Option<LineTag> {
    let low = line.to_lowercase();
    if ERROR_KEYWORDS.iter().any(|k| low.contains(k)) {
        return Some(LineTag::Error);
    }
    if WARN_KEYWORDS.iter().any(|k| low.contains(k)) {
        return Some(LineTag::Warn);
    }
    if line.starts_with(EXTRACT_MARKER) || line.contains("Destination") {
        return Some(LineTag::Success);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_lines_win_over_everything_else() {
        assert_eq!(classify("ERROR: network unreachable"), Some(LineTag::Error));
        assert_eq!(
            classify("WARNING: got error while retrying"),
            Some(LineTag::Error)
        );
    }

    #[test]
    fn warn_keywords_match_case_insensitively() {
        assert_eq!(classify("WARNING: retrying"), Some(LineTag::Warn));
        assert_eq!(
            classify("[download] foo.mp4 has already been downloaded"),
            Some(LineTag::Warn)
        );
        assert_eq!(classify("Skipping fragment 12"), Some(LineTag::Warn));
    }

    #[test]
    fn destination_and_extract_lines_are_success() {
        assert_eq!(
            classify("[ExtractAudio] Destination: foo.mp3"),
            Some(LineTag::Success)
        );
        assert_eq!(
            classify("[download] Destination: clip.mp4"),
            Some(LineTag::Success)
        );
        // Success markers are case-sensitive.
        assert_eq!(classify("[download] destination: clip.mp4"), None);
    }

    #[test]
    fn progress_lines_are_untagged() {
        assert_eq!(classify("frag 3/10"), None);
        assert_eq!(classify("[download]  42.0% of 10.00MiB"), None);
        assert_eq!(classify(""), None);
    }
}
