//! Shared UTF-8-safe truncation helpers.
//!
//! Status lines and log-file stems cut user text by character count. Byte
//! slicing can panic inside a multi-byte character, so every cut goes through
//! these helpers.

/// Leading slice of at most `max_chars` characters.
pub fn prefix_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Trailing slice of at most `max_chars` characters.
pub fn suffix_chars(text: &str, max_chars: usize) -> &str {
    if max_chars == 0 {
        return "";
    }
    match text.char_indices().rev().nth(max_chars - 1) {
        Some((start, _)) => &text[start..],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefix_keeps_short_text_whole() {
        assert_eq!(prefix_chars("hello", 10), "hello");
        assert_eq!(prefix_chars("hello", 5), "hello");
    }

    #[test]
    fn prefix_counts_characters_not_bytes() {
        assert_eq!(prefix_chars("aé🙂cd", 3), "aé🙂");
        assert_eq!(prefix_chars("abc", 0), "");
    }

    #[test]
    fn suffix_counts_characters_not_bytes() {
        assert_eq!(suffix_chars("ab🙂é", 2), "🙂é");
        assert_eq!(suffix_chars("abc", 3), "abc");
        assert_eq!(suffix_chars("abc", 10), "abc");
        assert_eq!(suffix_chars("abc", 0), "");
    }
}
