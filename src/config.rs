//! Dashboard settings, stored as JSON under the user's cache directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ledger::DEFAULT_MAX_MESSAGES;

const CONFIG_FILE: &str = "config.json";

/// Columns a rendered field spends on chrome around the editable text: the label column's
/// separator, the value brackets and the right margin.
pub const FIELD_CHROME_WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashConfig {
    pub app_name: String,
    /// Width reserved for field labels.
    pub label_width: usize,
    /// Terminal width assumed until the first resize event.
    pub viewport_width: usize,
    /// Seed the edit buffer with the current value instead of starting blank.
    pub prefill_edit_buffer: bool,
    /// Per-tab ledger capacity; 0 keeps everything.
    pub max_messages: usize,
    pub tick_interval_ms: u64,
    pub theme: ThemeSettings,
}

impl Default for DashConfig {
    fn default() -> Self {
        Self {
            app_name: "devdash".to_string(),
            label_width: 18,
            viewport_width: 80,
            prefill_edit_buffer: false,
            max_messages: DEFAULT_MAX_MESSAGES,
            tick_interval_ms: 50,
            theme: ThemeSettings::default(),
        }
    }
}

impl DashConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Runes an edit buffer may hold on a viewport `viewport_width` columns wide.
    pub fn available_text_width(&self, viewport_width: usize) -> usize {
        viewport_width.saturating_sub(self.label_width + FIELD_CHROME_WIDTH)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub foreground: String,
    pub background: Option<String>,
    pub primary: String,
    pub secondary: String,
    pub muted: String,
    pub success: String,
    pub warning: String,
    pub error: String,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            foreground: "white".to_string(),
            background: None,
            primary: "cyan".to_string(),
            secondary: "yellow".to_string(),
            muted: "dark_gray".to_string(),
            success: "green".to_string(),
            warning: "yellow".to_string(),
            error: "red".to_string(),
        }
    }
}

pub fn config_path(app_name: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(app_name).join(CONFIG_FILE))
}

pub fn log_dir(app_name: &str) -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join(app_name).join("logs"))
}

/// Writes a default config to `path` if nothing is there yet.
pub fn ensure_config_file(path: &Path) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.exists() {
            std::fs::create_dir_all(parent)?;
        }
    }
    if !path.exists() {
        let content = serde_json::to_string_pretty(&DashConfig::default())
            .unwrap_or_else(|_| "{}".to_string());
        std::fs::write(path, content)?;
    }
    Ok(())
}

/// Loads `path`, falling back to defaults when the file is missing or malformed.
pub fn load_config(path: &Path) -> DashConfig {
    let data = match std::fs::read_to_string(path) {
        Ok(data) => data,
        Err(e) => {
            tracing::debug!(path = %path.display(), error = %e, "config not readable, using defaults");
            return DashConfig::default();
        }
    };
    match serde_json::from_str(&data) {
        Ok(config) => config,
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "invalid config, using defaults");
            DashConfig::default()
        }
    }
}

fn cache_dir() -> Option<PathBuf> {
    #[cfg(target_os = "macos")]
    {
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join("Library/Caches"));
    }

    #[cfg(target_os = "linux")]
    {
        if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
            return Some(PathBuf::from(xdg));
        }
        return std::env::var("HOME")
            .ok()
            .map(|home| PathBuf::from(home).join(".cache"));
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(local) = std::env::var("LOCALAPPDATA") {
            return Some(PathBuf::from(local));
        }
        return std::env::var("APPDATA").ok().map(PathBuf::from);
    }

    #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
    {
        None
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
