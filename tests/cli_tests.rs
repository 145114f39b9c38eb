//! Settings and file-system tests

use dotdash::ui::format::{download_file_name, format_bytes};
use dotdash::ui::theme::Theme;
use dotdash::ui::Settings;
use std::fs;
use tempfile::TempDir;

/// Settings written by hand load with defaults for missing fields
#[test]
fn test_partial_settings_file_loads() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, r#"{"server": "http://10.0.0.2:8765"}"#).unwrap();

    let settings = Settings::load_from(&path).unwrap();
    assert_eq!(settings.server, "http://10.0.0.2:8765");
    assert_eq!(settings.theme().name, Theme::default_theme().name);
}

/// A corrupt settings file is an error, not silently replaced
#[test]
fn test_corrupt_settings_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    fs::write(&path, "{ not json").unwrap();

    let err = Settings::load_from(&path).unwrap_err();
    assert!(err.to_string().contains("Failed to parse settings file"));
}

/// Saved settings never carry an unset download directory
#[test]
fn test_saved_settings_omit_unset_download_dir() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("settings.json");
    Settings::default().save_to(&path).unwrap();

    let contents = fs::read_to_string(&path).unwrap();
    assert!(!contents.contains("download_dir"));
    assert!(contents.contains("Catppuccin Mocha"));
}

#[test]
fn test_every_builtin_theme_is_selectable() {
    for theme in Theme::all() {
        let settings = Settings {
            theme: theme.name.to_string(),
            ..Settings::default()
        };
        assert_eq!(settings.theme().name, theme.name);
    }
}

#[test]
fn test_download_names_are_flat() {
    assert_eq!(download_file_name(".zshrc"), ".zshrc");
    assert_eq!(download_file_name("nvim/init.lua"), "nvim_init.lua");
}

#[test]
fn test_format_bytes_units() {
    assert_eq!(format_bytes(512), "512 B");
    assert_eq!(format_bytes(2048), "2.0 KB");
}
