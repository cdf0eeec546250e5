//! Theme application over an explicit component descriptor tree.
//!
//! Frontends describe their window as a tree of [`Component`]s built once at
//! construction time. Styling is a pure function of component kind and theme,
//! applied by a depth-first walk; there is no runtime widget introspection.

use super::color::Rgb;
use super::palette::{Slot, Theme};
use crate::downloader::LineTag;

/// Kind of UI element a descriptor stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    Window,
    Frame,
    Toolbar,
    Logo,
    Label,
    Button,
    /// The primary call-to-action button.
    PrimaryButton,
    Checkbox,
    Scale,
    TextInput,
    DropZone,
    Console,
    StatusBar,
}

/// Resolved colors for one component. Unset roles keep the frontend default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    pub bg: Option<Rgb>,
    pub fg: Option<Rgb>,
    pub active_bg: Option<Rgb>,
    pub active_fg: Option<Rgb>,
    /// Border / focus highlight.
    pub highlight: Option<Rgb>,
    /// Selection background for text, check indicator for checkboxes,
    /// trough for scales.
    pub select_bg: Option<Rgb>,
    /// Text cursor color.
    pub cursor: Option<Rgb>,
}

/// Style for one component kind under `theme`.
pub fn style_for(kind: ComponentKind, theme: &Theme) -> Style {
    let c = |slot| Some(theme.get(slot));
    match kind {
        ComponentKind::Window | ComponentKind::Frame => Style {
            bg: c(Slot::Bg),
            ..Style::default()
        },
        ComponentKind::Toolbar => Style {
            bg: c(Slot::Bg2),
            ..Style::default()
        },
        ComponentKind::Logo => Style {
            bg: c(Slot::Bg2),
            fg: c(Slot::Accent),
            ..Style::default()
        },
        ComponentKind::Label => Style {
            bg: c(Slot::Bg),
            fg: c(Slot::Fg),
            ..Style::default()
        },
        ComponentKind::Button => Style {
            bg: c(Slot::Btn),
            fg: c(Slot::Fg),
            active_bg: c(Slot::BtnHover),
            active_fg: c(Slot::Fg),
            ..Style::default()
        },
        ComponentKind::PrimaryButton => Style {
            bg: c(Slot::Accent),
            fg: c(Slot::Bg),
            active_bg: c(Slot::Accent2),
            active_fg: c(Slot::Bg),
            ..Style::default()
        },
        ComponentKind::Checkbox => Style {
            bg: c(Slot::Bg),
            fg: c(Slot::Fg),
            active_bg: c(Slot::Bg),
            active_fg: c(Slot::Accent),
            select_bg: c(Slot::Bg3),
            ..Style::default()
        },
        ComponentKind::Scale => Style {
            bg: c(Slot::Bg),
            fg: c(Slot::Fg),
            active_bg: c(Slot::Accent),
            select_bg: c(Slot::Bg3),
            ..Style::default()
        },
        ComponentKind::TextInput | ComponentKind::Console => Style {
            bg: c(Slot::EntryBg),
            fg: c(Slot::Fg),
            highlight: c(Slot::Border),
            select_bg: c(Slot::SelBg),
            cursor: c(Slot::Fg),
            ..Style::default()
        },
        ComponentKind::DropZone => Style {
            bg: c(Slot::Bg2),
            fg: c(Slot::Fg2),
            highlight: c(Slot::Accent),
            ..Style::default()
        },
        ComponentKind::StatusBar => Style {
            bg: c(Slot::Bg3),
            fg: c(Slot::Fg2),
            ..Style::default()
        },
    }
}

/// Foreground for a tagged console line; untagged lines use `fg`.
pub fn tag_color(tag: Option<LineTag>, theme: &Theme) -> Rgb {
    let slot = match tag {
        Some(LineTag::Error) => Slot::Error,
        Some(LineTag::Warn) => Slot::Warn,
        Some(LineTag::Success) => Slot::Success,
        Some(LineTag::Info) => Slot::Accent,
        None => Slot::Fg,
    };
    theme.get(slot)
}

/// One node in a component descriptor tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub kind: ComponentKind,
    pub label: String,
    pub children: Vec<Component>,
}

impl Component {
    pub fn new(kind: ComponentKind, label: impl Into<String>) -> Self {
        Self {
            kind,
            label: label.into(),
            children: Vec::new(),
        }
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = Component>) -> Self {
        self.children.extend(children);
        self
    }

    /// Depth-first pre-order walk, handing each node its depth and style.
    pub fn walk<F>(&self, theme: &Theme, visit: &mut F)
    where
        F: FnMut(&Component, usize, Style),
    {
        self.walk_at(theme, 0, visit);
    }

    fn walk_at<F>(&self, theme: &Theme, depth: usize, visit: &mut F)
    where
        F: FnMut(&Component, usize, Style),
    {
        visit(self, depth, style_for(self.kind, theme));
        for child in &self.children {
            child.walk_at(theme, depth + 1, visit);
        }
    }

    /// Number of nodes in this subtree.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(Component::node_count).sum::<usize>()
    }
}

/// Descriptor tree for the main application window.
pub fn main_window() -> Component {
    use ComponentKind::*;

    let toolbar = Component::new(Toolbar, "toolbar").with_children([
        Component::new(Logo, "ytdrop"),
        Component::new(Button, "Settings"),
        Component::new(Button, "About"),
    ]);
    let options = Component::new(Frame, "options").with_children([
        Component::new(Checkbox, "Video"),
        Component::new(Checkbox, "Audio"),
        Component::new(Checkbox, "Use cookies"),
        Component::new(Scale, "Resolution"),
        Component::new(Label, "1080p"),
    ]);
    let actions = Component::new(Frame, "actions").with_children([
        Component::new(PrimaryButton, "Fetch"),
        Component::new(Button, "List formats"),
        Component::new(Button, "Cancel"),
        Component::new(Button, "Download folder"),
    ]);
    let left = Component::new(Frame, "left").with_children([
        Component::new(DropZone, "Drop or paste links here"),
        Component::new(Label, "URLs (one per line)"),
        Component::new(TextInput, "urls"),
        Component::new(Button, "Clear"),
        options,
        actions,
    ]);
    let right = Component::new(Frame, "right").with_children([
        Component::new(Label, "Output"),
        Component::new(Console, "console"),
        Component::new(Button, "Clear output"),
    ]);
    Component::new(Window, "ytdrop").with_children([
        toolbar,
        Component::new(Frame, "body").with_children([left, right]),
        Component::new(StatusBar, "status"),
    ])
}
