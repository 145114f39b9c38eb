//! # Settings
//!
//! User settings stored as JSON in the platform config directory:
//!
//! ```text
//! ~/.config/dotdash/settings.json
//! ```
//!
//! | Field | Default |
//! |-------|---------|
//! | `server` | `http://127.0.0.1:8765` |
//! | `theme` | `Catppuccin Mocha` |
//! | `download_dir` | the platform download directory |
//!
//! The file is created with the defaults on first run. Command-line flags
//! override these for one session and are never written back.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::api::DEFAULT_SERVER;
use crate::ui::theme::Theme;

const APP_NAME: &str = "dotdash";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    /// Base URL of the dashboard backend.
    #[serde(default = "default_server")]
    pub server: String,

    /// Name of a built-in theme.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub download_dir: Option<PathBuf>,
}

fn default_server() -> String {
    DEFAULT_SERVER.to_string()
}

fn default_theme_name() -> String {
    Theme::default_theme().name.to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: default_server(),
            theme: default_theme_name(),
            download_dir: None,
        }
    }
}

impl Settings {
    /// Load from the default location, falling back to defaults when the
    /// file is unreadable. On first run the defaults are written out so the
    /// file can be edited.
    pub fn load() -> Self {
        match Self::settings_path().and_then(|path| Self::load_or_create(&path)) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!(error = %e, "using default settings");
                Self::default()
            }
        }
    }

    /// Load from `path`, writing the defaults there first when the file
    /// does not exist yet.
    pub fn load_or_create(path: &Path) -> Result<Self> {
        if !path.exists() {
            let settings = Self::default();
            settings.save_to(path)?;
            tracing::info!(path = %path.display(), "wrote default settings");
            return Ok(settings);
        }
        Self::load_from(path)
    }

    /// Load from `path`. A missing file yields the defaults.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read settings file: {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse settings file: {}", path.display()))
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create settings directory: {}", parent.display())
            })?;
        }
        let contents =
            serde_json::to_string_pretty(self).context("Failed to serialize settings")?;
        fs::write(path, contents)
            .with_context(|| format!("Failed to write settings file: {}", path.display()))
    }

    pub fn settings_path() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .context("Could not determine config directory")?;
        Ok(dirs.config_dir().join("settings.json"))
    }

    /// Directory for log files.
    pub fn log_dir() -> Result<PathBuf> {
        let dirs = directories::ProjectDirs::from("", "", APP_NAME)
            .context("Could not determine data directory")?;
        Ok(dirs.data_local_dir().join("logs"))
    }

    /// Where downloads are written: the configured directory, else the
    /// user's download directory, else the working directory.
    pub fn resolved_download_dir(&self) -> PathBuf {
        if let Some(dir) = &self.download_dir {
            return dir.clone();
        }
        directories::UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(Path::to_path_buf))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    /// The configured theme, or the default when the name is unknown.
    pub fn theme(&self) -> &'static Theme {
        Theme::by_name(&self.theme).unwrap_or_else(|| {
            tracing::warn!(theme = %self.theme, "unknown theme, using default");
            Theme::default_theme()
        })
    }
}
