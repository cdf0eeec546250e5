//! Theme import through the library API and the `ytdrop theme` subcommands.

mod support;

use std::process::Command;

use support::TempDir;
use ytdrop::config::{load_config, save_config, Config};
use ytdrop::error::ThemeError;
use ytdrop::theme::{Rgb, Slot, DEFAULT_THEME_NAME};

const EDITOR_THEME: &str = r##"{
  // exported from an editor
  "name": "Night Owl",
  "type": "dark",
  "colors": {
    "editor.background": "#011627",
    "editor.foreground": "#d6deeb",
    "button.background": "#7e57c2cc", /* alpha is dropped */
    "focusBorder": "#122d42",
  },
}
"##;

const NAMED_LIKE_BUILTIN: &str = r##"{
  "name": "Catppuccin Mocha",
  "colors": { "editor.background": "#101010" }
}
"##;

#[test]
fn imported_theme_survives_a_config_round_trip() {
    let dir = TempDir::new("theme-roundtrip");
    let theme_path = dir.write("night-owl.jsonc", EDITOR_THEME);
    let config_path = dir.child(".ytdrop_config.json");

    let mut config = Config::default();
    let mut registry = config.theme_registry();
    let stored = registry.import_file(&theme_path).expect("import");
    assert_eq!(stored, "Night Owl");
    assert_eq!(registry.active_name(), "Night Owl");

    let theme = *registry.active();
    assert_eq!(theme.get(Slot::EntryBg), Rgb::parse("#011627").expect("hex"));
    assert_eq!(theme.get(Slot::Fg), Rgb::parse("#d6deeb").expect("hex"));
    assert_eq!(theme.get(Slot::Accent), Rgb::parse("#7e57c2").expect("hex"));

    config.store_theme_registry(&registry);
    save_config(&config_path, &config).expect("save");

    let reloaded = load_config(&config_path);
    assert!(!reloaded.migrated);
    let registry = reloaded.config.theme_registry();
    assert_eq!(registry.active_name(), "Night Owl");
    assert!(registry.is_custom("Night Owl"));
    assert_eq!(registry.get("Night Owl"), Some(&theme));
}

#[test]
fn builtin_names_are_never_shadowed() {
    let dir = TempDir::new("theme-collision");
    let theme_path = dir.write("mocha.json", NAMED_LIKE_BUILTIN);

    let mut registry = Config::default().theme_registry();
    assert_eq!(registry.import_file(&theme_path).expect("first"), "Catppuccin Mocha (2)");
    assert_eq!(registry.import_file(&theme_path).expect("second"), "Catppuccin Mocha (3)");
    assert_ne!(
        registry.get(DEFAULT_THEME_NAME),
        registry.get("Catppuccin Mocha (2)")
    );
}

#[test]
fn documents_without_colors_are_rejected() {
    let dir = TempDir::new("theme-nocolors");
    let theme_path = dir.write("plain.json", r#"{ "name": "Plain" }"#);

    let mut registry = Config::default().theme_registry();
    let err = registry.import_file(&theme_path).expect_err("no colors");
    assert!(matches!(err, ThemeError::MissingColors), "{err:?}");
    assert_eq!(registry.active_name(), DEFAULT_THEME_NAME);
    assert!(registry.custom_themes().is_empty());
}

fn ytdrop(config: &std::path::Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_ytdrop"))
        .arg("--config")
        .arg(config)
        .arg("--no-color")
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("run ytdrop")
}

#[test]
fn cli_import_then_list_marks_the_new_theme_active() {
    let dir = TempDir::new("theme-cli");
    let theme_path = dir.write("night-owl.json", EDITOR_THEME);
    let config_path = dir.child("config.json");

    let out = ytdrop(&config_path, &["theme", "import", &theme_path.display().to_string()]);
    assert!(out.status.success(), "{}", String::from_utf8_lossy(&out.stderr));
    assert!(String::from_utf8_lossy(&out.stderr).contains("imported theme: Night Owl"));
    assert!(config_path.exists());

    let out = ytdrop(&config_path, &["theme", "list"]);
    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    let line = stdout
        .lines()
        .find(|line| line.contains("Night Owl"))
        .expect("custom theme listed");
    assert!(line.contains("* Night Owl (custom)"), "{line}");

    let out = ytdrop(&config_path, &["theme", "delete", "Catppuccin Mocha"]);
    assert_eq!(out.status.code(), Some(1));
}

#[test]
fn cli_upgrades_a_legacy_config_once() {
    let dir = TempDir::new("theme-legacy");
    let config_path = dir.write("config.json", r#"{ "theme": "light" }"#);

    let out = ytdrop(&config_path, &["theme", "list"]);
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stdout).contains("* Catppuccin Latte"));

    let saved = std::fs::read_to_string(&config_path).expect("saved config");
    let saved: serde_json::Value = serde_json::from_str(&saved).expect("json");
    assert_eq!(saved["theme_name"], "Catppuccin Latte");
    assert_eq!(saved["schema_version"], 2);
}
