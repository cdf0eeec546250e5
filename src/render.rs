//! Themed terminal console.
//!
//! Tool output goes to stdout colored by its line tag; status, section, and
//! diagnostic text goes to stderr. Colors come from the active [`Theme`], so
//! the terminal frontend honors the same palette a windowed one would.

use crossterm::style::{Color, Stylize};

use crate::downloader::{DownloadEvent, LineTag};
use crate::theme::{style_for, tag_color, ComponentKind, Rgb, Slot, Style, Theme};

/// Terminal renderer bound to one theme.
#[derive(Debug, Clone, Copy)]
pub struct Console {
    theme: Theme,
    color: bool,
}

impl Console {
    pub fn new(theme: Theme, color: bool) -> Self {
        Self { theme, color }
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Same color setting, different palette.
    pub fn with_theme(&self, theme: Theme) -> Self {
        Self { theme, ..*self }
    }

    fn paint(&self, text: &str, rgb: Rgb) -> String {
        if self.color {
            text.with(Color::from(rgb)).to_string()
        } else {
            text.to_string()
        }
    }

    /// One tool output line as printed.
    pub fn format_line(&self, text: &str, tag: Option<LineTag>) -> String {
        if tag.is_none() {
            return text.to_string();
        }
        self.paint(text, tag_color(tag, &self.theme))
    }

    pub fn format_status(&self, text: &str) -> String {
        let style = style_for(ComponentKind::StatusBar, &self.theme);
        let label = format!("[{text}]");
        match style.fg {
            Some(fg) if self.color => label.with(Color::from(fg)).italic().to_string(),
            _ => label,
        }
    }

    pub fn line(&self, text: &str, tag: Option<LineTag>) {
        println!("{}", self.format_line(text, tag));
    }

    pub fn status(&self, text: &str) {
        eprintln!("{}", self.format_status(text));
    }

    pub fn section(&self, title: &str) {
        if self.color {
            eprintln!(
                "{} {}",
                "•".with(Color::from(self.theme.get(Slot::Accent))),
                title.with(Color::from(self.theme.get(Slot::Fg))).bold()
            );
        } else {
            eprintln!("{title}:");
        }
    }

    pub fn field(&self, key: &str, value: &str) {
        if self.color {
            eprintln!(
                "  {} {}",
                format!("{key}:").with(Color::from(self.theme.get(Slot::Fg2))),
                value.with(Color::from(self.theme.get(Slot::Fg)))
            );
        } else {
            eprintln!("  {key}: {value}");
        }
    }

    pub fn warn(&self, msg: &str) {
        eprintln!("{}", self.labelled("warning:", msg, Slot::Warn));
    }

    pub fn error(&self, msg: &str) {
        eprintln!("{}", self.labelled("error:", msg, Slot::Error));
    }

    fn labelled(&self, label: &str, msg: &str, slot: Slot) -> String {
        if self.color {
            format!(
                "{} {msg}",
                label.with(Color::from(self.theme.get(slot))).bold()
            )
        } else {
            format!("{label} {msg}")
        }
    }

    /// Color block plus hex code for a palette listing.
    pub fn swatch(&self, rgb: Rgb) -> String {
        if self.color {
            format!("{} {rgb}", "  ".on(Color::from(rgb)))
        } else {
            rgb.to_hex()
        }
    }

    /// A descriptor label drawn in its resolved style.
    pub fn styled_label(&self, label: &str, style: &Style) -> String {
        if !self.color {
            return label.to_string();
        }
        let mut styled = label.stylize();
        if let Some(fg) = style.fg {
            styled = styled.with(Color::from(fg));
        }
        if let Some(bg) = style.bg {
            styled = styled.on(Color::from(bg));
        }
        styled.to_string()
    }

    /// Render one worker event. Returns `true` for the completion event.
    pub fn render_event(&self, event: &DownloadEvent) -> bool {
        match event {
            DownloadEvent::Line { text, tag } => {
                self.line(text, *tag);
                false
            }
            DownloadEvent::Status(text) => {
                self.status(text);
                false
            }
            DownloadEvent::Done => true,
        }
    }
}
