//! Theme slots, the `Theme` value type, and the built-in palettes.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::color::Rgb;

/// Number of color slots in every theme.
pub const SLOT_COUNT: usize = 15;

/// Name of the built-in used whenever a requested theme cannot be resolved.
pub const DEFAULT_THEME_NAME: &str = "Catppuccin Mocha";

/// One named color role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Slot {
    /// Main background.
    Bg,
    /// Toolbar / raised background.
    Bg2,
    /// Deep background (status bar, troughs).
    Bg3,
    /// Primary foreground.
    Fg,
    /// Muted foreground.
    Fg2,
    Accent,
    /// Accent hover variant.
    Accent2,
    Btn,
    BtnHover,
    Border,
    Success,
    Error,
    Warn,
    /// Text input background.
    EntryBg,
    /// Selection highlight background.
    SelBg,
}

impl Slot {
    /// Every slot in declaration order.
    pub const ALL: [Slot; SLOT_COUNT] = [
        Self::Bg,
        Self::Bg2,
        Self::Bg3,
        Self::Fg,
        Self::Fg2,
        Self::Accent,
        Self::Accent2,
        Self::Btn,
        Self::BtnHover,
        Self::Border,
        Self::Success,
        Self::Error,
        Self::Warn,
        Self::EntryBg,
        Self::SelBg,
    ];

    /// Stable key used in persisted theme maps.
    pub fn key(self) -> &'static str {
        match self {
            Self::Bg => "bg",
            Self::Bg2 => "bg2",
            Self::Bg3 => "bg3",
            Self::Fg => "fg",
            Self::Fg2 => "fg2",
            Self::Accent => "accent",
            Self::Accent2 => "accent2",
            Self::Btn => "btn",
            Self::BtnHover => "btn_hover",
            Self::Border => "border",
            Self::Success => "success",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::EntryBg => "entry_bg",
            Self::SelBg => "sel_bg",
        }
    }

    pub fn from_key(key: &str) -> Option<Slot> {
        let normalized = key.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|slot| slot.key() == normalized)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// A complete palette: exactly one color per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    try_from = "BTreeMap<String, String>",
    into = "BTreeMap<String, String>"
)]
pub struct Theme {
    colors: [Rgb; SLOT_COUNT],
}

impl Theme {
    /// Build from packed colors listed in [`Slot::ALL`] order.
    pub const fn from_packed(packed: [u32; SLOT_COUNT]) -> Self {
        let mut colors = [Rgb::BLACK; SLOT_COUNT];
        let mut idx = 0;
        while idx < SLOT_COUNT {
            colors[idx] = Rgb::from_u32(packed[idx]);
            idx += 1;
        }
        Self { colors }
    }

    pub fn get(&self, slot: Slot) -> Rgb {
        self.colors[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, color: Rgb) {
        self.colors[slot.index()] = color;
    }

    /// Lowercase `#rrggbb` string for one slot.
    pub fn hex(&self, slot: Slot) -> String {
        self.get(slot).to_hex()
    }

    /// Iterate `(slot, color)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, Rgb)> + '_ {
        Slot::ALL.into_iter().map(|slot| (slot, self.get(slot)))
    }
}

impl TryFrom<BTreeMap<String, String>> for Theme {
    type Error = String;

    fn try_from(map: BTreeMap<String, String>) -> Result<Self, Self::Error> {
        let mut theme = Theme::from_packed([0; SLOT_COUNT]);
        for slot in Slot::ALL {
            let raw = map
                .get(slot.key())
                .ok_or_else(|| format!("missing theme slot `{}`", slot.key()))?;
            let color = Rgb::parse(raw)
                .ok_or_else(|| format!("invalid color `{raw}` for slot `{}`", slot.key()))?;
            theme.set(slot, color);
        }
        Ok(theme)
    }
}

impl From<Theme> for BTreeMap<String, String> {
    fn from(theme: Theme) -> Self {
        theme
            .iter()
            .map(|(slot, color)| (slot.key().to_string(), color.to_hex()))
            .collect()
    }
}

// Slot order: bg bg2 bg3 fg fg2 accent accent2 btn btn_hover border
//             success error warn entry_bg sel_bg
static BUILTIN_THEMES: [(&str, Theme); 15] = [
    (
        "Catppuccin Mocha",
        Theme::from_packed([
            0x1e1e2e, 0x2a2a3e, 0x313145, 0xcdd6f4, 0xa6adc8, 0x89b4fa, 0x74c7ec, 0x313145,
            0x45475a, 0x45475a, 0xa6e3a1, 0xf38ba8, 0xfab387, 0x181825, 0x45475a,
        ]),
    ),
    (
        "One Dark Pro",
        Theme::from_packed([
            0x282c34, 0x21252b, 0x2c313a, 0xabb2bf, 0x636d83, 0x61afef, 0x56b6c2, 0x2c313a,
            0x3e4452, 0x3e4452, 0x98c379, 0xe06c75, 0xe5c07b, 0x1e2227, 0x3e4452,
        ]),
    ),
    (
        "Tokyo Night",
        Theme::from_packed([
            0x1a1b26, 0x16161e, 0x1f2335, 0xc0caf5, 0x565f89, 0x7aa2f7, 0x7dcfff, 0x1f2335,
            0x292e42, 0x292e42, 0x9ece6a, 0xf7768e, 0xe0af68, 0x13141c, 0x283457,
        ]),
    ),
    (
        "Dracula",
        Theme::from_packed([
            0x282a36, 0x21222c, 0x343746, 0xf8f8f2, 0x6272a4, 0xbd93f9, 0x8be9fd, 0x343746,
            0x44475a, 0x44475a, 0x50fa7b, 0xff5555, 0xffb86c, 0x1e1f29, 0x44475a,
        ]),
    ),
    (
        "Nord",
        Theme::from_packed([
            0x2e3440, 0x3b4252, 0x434c5e, 0xeceff4, 0xd8dee9, 0x88c0d0, 0x81a1c1, 0x434c5e,
            0x4c566a, 0x4c566a, 0xa3be8c, 0xbf616a, 0xebcb8b, 0x242933, 0x4c566a,
        ]),
    ),
    (
        "GitHub Dark",
        Theme::from_packed([
            0x0d1117, 0x161b22, 0x1c2128, 0xe6edf3, 0x8b949e, 0x58a6ff, 0x79c0ff, 0x21262d,
            0x30363d, 0x30363d, 0x3fb950, 0xf85149, 0xd29922, 0x010409, 0x1f6feb,
        ]),
    ),
    (
        "Gruvbox Dark",
        Theme::from_packed([
            0x282828, 0x3c3836, 0x504945, 0xebdbb2, 0xa89984, 0x458588, 0x689d6a, 0x3c3836,
            0x504945, 0x665c54, 0xb8bb26, 0xcc241d, 0xd79921, 0x1d2021, 0x504945,
        ]),
    ),
    (
        "Monokai",
        Theme::from_packed([
            0x272822, 0x1e1f1c, 0x32332d, 0xf8f8f2, 0x75715e, 0x66d9e8, 0xa6e22e, 0x32332d,
            0x3e3d32, 0x3e3d32, 0xa6e22e, 0xf92672, 0xe6db74, 0x1a1b16, 0x49483e,
        ]),
    ),
    (
        "Solarized Dark",
        Theme::from_packed([
            0x002b36, 0x073642, 0x073642, 0x839496, 0x657b83, 0x268bd2, 0x2aa198, 0x073642,
            0x0a4155, 0x586e75, 0x859900, 0xdc322f, 0xb58900, 0x00212b, 0x0a4155,
        ]),
    ),
    (
        "Material Dark",
        Theme::from_packed([
            0x212121, 0x292929, 0x353535, 0xeeffff, 0x89ddff, 0x82aaff, 0x21c7a8, 0x2d2d2d,
            0x3a3a3a, 0x404040, 0xc3e88d, 0xf07178, 0xffcb6b, 0x1a1a1a, 0x3b3b3b,
        ]),
    ),
    (
        "Catppuccin Latte",
        Theme::from_packed([
            0xeff1f5, 0xe6e9ef, 0xdce0e8, 0x4c4f69, 0x6c6f85, 0x1e66f5, 0x04a5e5, 0xdce0e8,
            0xccd0da, 0xbcc0cc, 0x40a02b, 0xd20f39, 0xfe640b, 0xffffff, 0xccd0da,
        ]),
    ),
    (
        "GitHub Light",
        Theme::from_packed([
            0xffffff, 0xf6f8fa, 0xeaeef2, 0x1f2328, 0x656d76, 0x0969da, 0x218bff, 0xf6f8fa,
            0xeaeef2, 0xd0d7de, 0x1a7f37, 0xcf222e, 0x9a6700, 0xffffff, 0xddf4ff,
        ]),
    ),
    (
        "Solarized Light",
        Theme::from_packed([
            0xfdf6e3, 0xeee8d5, 0xddd8c5, 0x657b83, 0x839496, 0x268bd2, 0x2aa198, 0xeee8d5,
            0xddd8c5, 0x93a1a1, 0x859900, 0xdc322f, 0xb58900, 0xfdf6e3, 0xd3cbb6,
        ]),
    ),
    (
        "Gruvbox Light",
        Theme::from_packed([
            0xfbf1c7, 0xf2e5bc, 0xebdbb2, 0x3c3836, 0x7c6f64, 0x076678, 0x427b58, 0xebdbb2,
            0xd5c4a1, 0xbdae93, 0x79740e, 0x9d0006, 0xb57614, 0xf9f5d7, 0xd5c4a1,
        ]),
    ),
    (
        "One Light",
        Theme::from_packed([
            0xfafafa, 0xf0f0f0, 0xe5e5e6, 0x383a42, 0x696c77, 0x4078f2, 0x0184bc, 0xe5e5e6,
            0xd4d4d5, 0xc2c2c3, 0x50a14f, 0xe45649, 0xc18401, 0xffffff, 0xbfceff,
        ]),
    ),
];

/// Built-in palettes in display order.
pub fn builtin_themes() -> &'static [(&'static str, Theme)] {
    &BUILTIN_THEMES
}

/// Look up one built-in palette by exact name.
pub fn builtin(name: &str) -> Option<&'static Theme> {
    BUILTIN_THEMES
        .iter()
        .find(|(builtin_name, _)| *builtin_name == name)
        .map(|(_, theme)| theme)
}

pub fn is_builtin(name: &str) -> bool {
    builtin(name).is_some()
}

/// The palette used when nothing else resolves.
pub fn default_theme() -> &'static Theme {
    &BUILTIN_THEMES[0].1
}
