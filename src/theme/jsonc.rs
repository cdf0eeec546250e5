//! Comment-tolerant JSON pre-processing for editor theme files.
//!
//! Editor themes are routinely shipped as "JSON with comments": `//` and
//! `/* */` comments plus trailing commas. Both passes here are single-pass
//! character scanners that track string literals, so a `//` inside a value
//! such as `"vscode://schemas/color-theme"` is left alone.

/// Strip comments and structural trailing commas, returning strict JSON text.
pub fn strip_comments(text: &str) -> String {
    remove_trailing_commas(&remove_comments(text))
}

/// Drop `//` line comments and `/* */` block comments outside strings.
///
/// The newline ending a line comment is kept so line numbers in parse errors
/// still point at the right place. An unterminated block comment swallows the
/// rest of the input.
fn remove_comments(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;

    while let Some(ch) = chars.next() {
        if in_string {
            out.push(ch);
            match ch {
                '\\' => {
                    if let Some(escaped) = chars.next() {
                        out.push(escaped);
                    }
                }
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match (ch, chars.peek()) {
            ('/', Some('/')) => {
                while chars.peek().is_some_and(|&next| next != '\n') {
                    chars.next();
                }
            }
            ('/', Some('*')) => {
                chars.next();
                let mut prev = '\0';
                for next in chars.by_ref() {
                    if prev == '*' && next == '/' {
                        break;
                    }
                    prev = next;
                }
            }
            ('"', _) => {
                in_string = true;
                out.push(ch);
            }
            _ => out.push(ch),
        }
    }
    out
}

/// Drop commas that are followed only by whitespace and then `}` or `]`.
fn remove_trailing_commas(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut idx = 0;

    while idx < chars.len() {
        let ch = chars[idx];
        if in_string {
            out.push(ch);
            if ch == '\\' {
                if let Some(&escaped) = chars.get(idx + 1) {
                    out.push(escaped);
                    idx += 1;
                }
            } else if ch == '"' {
                in_string = false;
            }
            idx += 1;
            continue;
        }

        if ch == ',' {
            let closes = chars[idx + 1..]
                .iter()
                .find(|c| !c.is_whitespace())
                .is_some_and(|&c| c == '}' || c == ']');
            if closes {
                idx += 1;
                continue;
            }
        }
        if ch == '"' {
            in_string = true;
        }
        out.push(ch);
        idx += 1;
    }
    out
}
