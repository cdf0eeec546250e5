//! `ytdrop theme` command helpers.
//!
//! This module owns theme selection, import, deletion, persistence, and
//! preview rendering so `main.rs` stays focused on dispatch.

use std::path::Path;

use ytdrop::config::{save_config, Config};
use ytdrop::render::Console;
use ytdrop::theme::{main_window, Slot, Theme, ThemeRegistry};

use crate::cli::ThemeAction;

/// Run one theme action and return the process exit code.
pub(crate) fn handle_theme_command(
    console: &Console,
    config: &mut Config,
    config_path: &Path,
    action: ThemeAction,
) -> i32 {
    let mut registry = config.theme_registry();
    match action {
        ThemeAction::List => {
            for line in theme_list_lines(&registry) {
                println!("{line}");
            }
            0
        }
        ThemeAction::Show { name } => {
            let selector = name.unwrap_or_else(|| registry.active_name().to_string());
            let resolved = match resolve_theme_selector(&registry.names(), &selector) {
                Ok(name) => name,
                Err(msg) => {
                    console.error(&msg);
                    return 1;
                }
            };
            match registry.get(&resolved) {
                Some(theme) => {
                    render_theme_preview(&console.with_theme(*theme), &resolved, theme);
                    0
                }
                None => {
                    console.error(&format!("Unknown theme `{resolved}`."));
                    1
                }
            }
        }
        ThemeAction::Use { name } => {
            let resolved = match resolve_theme_selector(&registry.names(), &name) {
                Ok(name) => name,
                Err(msg) => {
                    console.error(&msg);
                    return 1;
                }
            };
            if let Err(err) = registry.set_active(&resolved) {
                console.error(&err.to_string());
                return 1;
            }
            console.section(&format!("switched theme: {resolved}"));
            persist_registry(console, config, &registry, config_path);
            0
        }
        ThemeAction::Import { file } => match registry.import_file(Path::new(&file)) {
            Ok(stored) => {
                console.section(&format!("imported theme: {stored}"));
                persist_registry(console, config, &registry, config_path);
                0
            }
            Err(err) => {
                console.error(&format!("{file}: {err}"));
                1
            }
        },
        ThemeAction::Delete { name } => match registry.delete_custom(&name) {
            Ok(()) => {
                console.section(&format!("deleted theme: {name}"));
                console.field("active", registry.active_name());
                persist_registry(console, config, &registry, config_path);
                0
            }
            Err(err) => {
                console.error(&err.to_string());
                1
            }
        },
    }
}

/// Store registry state in `config` and save; failure only warns.
fn persist_registry(
    console: &Console,
    config: &mut Config,
    registry: &ThemeRegistry,
    config_path: &Path,
) {
    config.store_theme_registry(registry);
    match save_config(config_path, config) {
        Ok(()) => console.field("saved_to", &config_path.display().to_string()),
        Err(err) => console.warn(&format!(
            "theme updated for this run, but saving config failed: {err}"
        )),
    }
}

/// Numbered listing with an active-theme marker and custom tag.
pub(crate) fn theme_list_lines(registry: &ThemeRegistry) -> Vec<String> {
    let active = registry.active_name();
    registry
        .names()
        .iter()
        .enumerate()
        .map(|(idx, name)| {
            let marker = if name == active { "*" } else { " " };
            let tag = if registry.is_custom(name) { " (custom)" } else { "" };
            format!("{:>2}.{marker} {name}{tag}", idx + 1)
        })
        .collect()
}

/// Resolve a theme selector as either a 1-based index or a name
/// (case-insensitive).
pub(crate) fn resolve_theme_selector(names: &[String], selector: &str) -> Result<String, String> {
    let trimmed = selector.trim();
    if trimmed.is_empty() {
        return Err("Usage: ytdrop theme use <name|index>".to_string());
    }

    if let Ok(index) = trimmed.parse::<usize>() {
        if index == 0 || index > names.len() {
            return Err(format!(
                "Theme index out of range: {index}. Choose 1-{}.",
                names.len()
            ));
        }
        return Ok(names[index - 1].clone());
    }

    if let Some(exact) = names.iter().find(|name| name.as_str() == trimmed) {
        return Ok(exact.clone());
    }
    let normalized = trimmed.to_lowercase();
    names
        .iter()
        .find(|name| name.to_lowercase() == normalized)
        .cloned()
        .ok_or_else(|| format!("Unknown theme `{trimmed}`. Run `ytdrop theme list` to see themes."))
}

/// Palette swatches followed by the styled window layout.
fn render_theme_preview(console: &Console, name: &str, theme: &Theme) {
    println!("{name}");
    for slot in Slot::ALL {
        println!("  {:<10} {}", slot.key(), console.swatch(theme.get(slot)));
    }
    println!();
    main_window().walk(theme, &mut |node, depth, style| {
        let label = format!(" {} ", node.label);
        println!(
            "{}{}  {:?}",
            "  ".repeat(depth),
            console.styled_label(&label, &style),
            node.kind
        );
    });
}
