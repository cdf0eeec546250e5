//! Editor color-theme importer.
//!
//! Reads a comment-tolerant theme document, resolves each slot through a
//! priority list of editor color keys, then derives whatever is still missing
//! so the result is always a complete [`Theme`].

use serde_json::{Map, Value};
use std::path::Path;

use crate::error::ThemeError;

use super::color::{blend, is_dark, Rgb};
use super::jsonc::strip_comments;
use super::palette::{Slot, Theme, SLOT_COUNT};

const FALLBACK_BG: Rgb = Rgb::from_u32(0x1e1e2e);
const FALLBACK_FG: Rgb = Rgb::from_u32(0xcccccc);
const FALLBACK_ACCENT: Rgb = Rgb::from_u32(0x569cd6);

/// (success, error, warn) used when the source theme names none.
const DARK_STATUS: (Rgb, Rgb, Rgb) = (
    Rgb::from_u32(0x3fb950),
    Rgb::from_u32(0xf85149),
    Rgb::from_u32(0xd29922),
);
const LIGHT_STATUS: (Rgb, Rgb, Rgb) = (
    Rgb::from_u32(0x1a7f37),
    Rgb::from_u32(0xcf222e),
    Rgb::from_u32(0x9a6700),
);

/// Priority-ordered source keys for one slot.
pub fn source_keys(slot: Slot) -> &'static [&'static str] {
    match slot {
        Slot::EntryBg => &["editor.background", "input.background"],
        Slot::Fg => &["editor.foreground", "foreground"],
        Slot::Bg => &[
            "sideBar.background",
            "panel.background",
            "editor.background",
        ],
        Slot::Bg2 => &[
            "titleBar.activeBackground",
            "tab.activeBackground",
            "sideBarSectionHeader.background",
        ],
        Slot::Bg3 => &[
            "activityBar.background",
            "statusBar.background",
            "sideBarSectionHeader.background",
        ],
        Slot::Accent => &[
            "button.background",
            "focusBorder",
            "terminal.ansiBrightBlue",
            "activityBarBadge.background",
        ],
        Slot::Accent2 => &[
            "button.hoverBackground",
            "terminal.ansiCyan",
            "terminal.ansiBrightCyan",
            "editorLink.activeForeground",
        ],
        Slot::Fg2 => &[
            "statusBar.foreground",
            "tab.inactiveForeground",
            "sideBar.foreground",
            "descriptionForeground",
        ],
        Slot::Btn => &[
            "tab.activeBackground",
            "button.secondaryBackground",
            "input.background",
        ],
        Slot::BtnHover => &["list.hoverBackground", "list.activeSelectionBackground"],
        Slot::Border => &[
            "focusBorder",
            "panel.border",
            "editorGroup.border",
            "input.border",
            "widget.border",
        ],
        Slot::SelBg => &[
            "list.activeSelectionBackground",
            "editor.selectionBackground",
            "list.focusBackground",
        ],
        Slot::Success => &[
            "gitDecoration.addedResourceForeground",
            "terminal.ansiGreen",
            "terminal.ansiBrightGreen",
            "notificationsInfoIcon.foreground",
        ],
        Slot::Error => &[
            "editorError.foreground",
            "statusBarItem.errorBackground",
            "terminal.ansiRed",
            "terminal.ansiBrightRed",
            "inputValidation.errorBorder",
        ],
        Slot::Warn => &[
            "editorWarning.foreground",
            "terminal.ansiYellow",
            "terminal.ansiBrightYellow",
            "inputValidation.warningBorder",
        ],
    }
}

/// Slots found directly in the source document; `None` means unresolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedSlots {
    colors: [Option<Rgb>; SLOT_COUNT],
}

impl ResolvedSlots {
    pub fn get(&self, slot: Slot) -> Option<Rgb> {
        self.colors[slot as usize]
    }

    pub fn set(&mut self, slot: Slot, color: Rgb) {
        self.colors[slot as usize] = Some(color);
    }

    pub fn resolved_count(&self) -> usize {
        self.colors.iter().flatten().count()
    }
}

/// Import a theme file, returning `(name, theme)`.
///
/// The name is the document's `name` field when it is a non-empty string,
/// otherwise the file stem.
pub fn import_theme(path: &Path) -> Result<(String, Theme), ThemeError> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let fallback_name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Imported".to_string());
    let (name, theme) = import_theme_str(&text, &fallback_name)?;
    tracing::info!(path = %path.display(), name = %name, "imported editor theme");
    Ok((name, theme))
}

/// Import from document text; `fallback_name` is used when the document has
/// no usable `name`.
pub fn import_theme_str(text: &str, fallback_name: &str) -> Result<(String, Theme), ThemeError> {
    let document: Value = serde_json::from_str(&strip_comments(text))?;
    let Value::Object(document) = document else {
        return Err(ThemeError::NotAnObject);
    };
    let Some(Value::Object(colors)) = document.get("colors") else {
        return Err(ThemeError::MissingColors);
    };

    let resolved = resolve_slots(colors);
    tracing::debug!(
        resolved = resolved.resolved_count(),
        "resolved theme slots from source keys"
    );
    let theme = derive_missing(&resolved);

    let name = document
        .get("name")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback_name)
        .to_string();
    Ok((name, theme))
}

/// Resolve every slot against the document's `colors` map.
pub fn resolve_slots(colors: &Map<String, Value>) -> ResolvedSlots {
    let mut resolved = ResolvedSlots::default();
    for slot in Slot::ALL {
        let hit = source_keys(slot)
            .iter()
            .filter_map(|key| colors.get(*key))
            .find_map(|value| value.as_str().and_then(Rgb::parse));
        if let Some(color) = hit {
            resolved.set(slot, color);
        }
    }
    resolved
}

/// Fill every unresolved slot with a value derived from the resolved ones.
pub fn derive_missing(resolved: &ResolvedSlots) -> Theme {
    let bg = resolved
        .get(Slot::Bg)
        .or_else(|| resolved.get(Slot::EntryBg))
        .unwrap_or(FALLBACK_BG);
    let fg = resolved.get(Slot::Fg).unwrap_or(FALLBACK_FG);
    let accent = resolved.get(Slot::Accent).unwrap_or(FALLBACK_ACCENT);

    let dark = is_dark(bg);
    let mix = if dark { 0.15 } else { 0.08 };
    let shade = if dark { Rgb::BLACK } else { Rgb::WHITE };
    let (success, error, warn) = if dark { DARK_STATUS } else { LIGHT_STATUS };

    let pick = |slot: Slot, derived: Rgb| resolved.get(slot).unwrap_or(derived);
    let bg3 = pick(Slot::Bg3, blend(bg, shade, mix * 2.0));

    let mut theme = Theme::from_packed([0; SLOT_COUNT]);
    theme.set(Slot::Bg, bg);
    theme.set(Slot::Fg, fg);
    theme.set(Slot::Accent, accent);
    theme.set(Slot::EntryBg, pick(Slot::EntryBg, bg));
    theme.set(Slot::Bg2, pick(Slot::Bg2, blend(bg, shade, mix)));
    theme.set(Slot::Bg3, bg3);
    theme.set(Slot::Fg2, pick(Slot::Fg2, blend(fg, bg, 0.35)));
    theme.set(Slot::Accent2, pick(Slot::Accent2, blend(accent, fg, 0.3)));
    theme.set(Slot::Btn, pick(Slot::Btn, bg3));
    theme.set(Slot::BtnHover, pick(Slot::BtnHover, blend(bg3, fg, 0.15)));
    theme.set(Slot::Border, pick(Slot::Border, blend(bg, fg, 0.25)));
    theme.set(Slot::SelBg, pick(Slot::SelBg, blend(accent, bg, 0.6)));
    theme.set(Slot::Success, pick(Slot::Success, success));
    theme.set(Slot::Error, pick(Slot::Error, error));
    theme.set(Slot::Warn, pick(Slot::Warn, warn));
    theme
}
