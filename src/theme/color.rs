//! Hex color parsing and the small amount of color math used for derivation.

use std::fmt;

/// One opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::from_u32(0x000000);
    pub const WHITE: Rgb = Rgb::from_u32(0xffffff);

    /// Build from a packed `0xrrggbb` literal.
    pub const fn from_u32(packed: u32) -> Self {
        Self {
            r: ((packed >> 16) & 0xff) as u8,
            g: ((packed >> 8) & 0xff) as u8,
            b: (packed & 0xff) as u8,
        }
    }

    /// Parse any accepted hex form (`#rgb`, `#rgba`, `#rrggbb`, `#rrggbbaa`).
    pub fn parse(input: &str) -> Option<Self> {
        let hex = expand_hex_digits(input)?;
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).ok();
        Some(Self {
            r: channel(0..2)?,
            g: channel(2..4)?,
            b: channel(4..6)?,
        })
    }

    /// Lowercase `#rrggbb` form.
    pub fn to_hex(self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl From<Rgb> for crossterm::style::Color {
    fn from(value: Rgb) -> Self {
        crossterm::style::Color::Rgb {
            r: value.r,
            g: value.g,
            b: value.b,
        }
    }
}

/// Normalize an editor color string to lowercase `#rrggbb`.
///
/// Shorthand forms are expanded by digit duplication and any alpha channel is
/// dropped. Returns `None` for anything else; callers treat that as "try the
/// next candidate".
pub fn normalize_hex(input: &str) -> Option<String> {
    Rgb::parse(input).map(Rgb::to_hex)
}

fn expand_hex_digits(input: &str) -> Option<String> {
    let digits = input.strip_prefix('#')?;
    if !digits.is_ascii() {
        return None;
    }
    let six: String = match digits.len() {
        3 => digits.chars().flat_map(|c| [c, c]).collect(),
        4 => digits.chars().take(3).flat_map(|c| [c, c]).collect(),
        6 => digits.to_string(),
        8 => digits[..6].to_string(),
        _ => return None,
    };
    if six.chars().all(|c| c.is_ascii_hexdigit()) {
        Some(six.to_ascii_lowercase())
    } else {
        None
    }
}

/// WCAG relative luminance in `[0, 1]`.
pub fn luminance(color: Rgb) -> f64 {
    fn linear(channel: u8) -> f64 {
        let c = f64::from(channel) / 255.0;
        if c <= 0.04045 {
            c / 12.92
        } else {
            ((c + 0.055) / 1.055).powf(2.4)
        }
    }
    0.2126 * linear(color.r) + 0.7152 * linear(color.g) + 0.0722 * linear(color.b)
}

/// True when `color` reads as a dark background.
pub fn is_dark(color: Rgb) -> bool {
    luminance(color) < 0.5
}

/// Per-channel linear interpolation from `a` (t = 0) to `b` (t = 1).
///
/// Channel values are truncated toward zero, not rounded.
pub fn blend(a: Rgb, b: Rgb, t: f64) -> Rgb {
    let mix = |from: u8, to: u8| {
        let from = f64::from(from);
        (from + (f64::from(to) - from) * t) as u8
    };
    Rgb {
        r: mix(a.r, b.r),
        g: mix(a.g, b.g),
        b: mix(a.b, b.b),
    }
}
