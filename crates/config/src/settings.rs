// Application settings
// Loaded from ~/.config/gridsync/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fastest allowed coalescer tick.
pub const MIN_SYNC_INTERVAL_MS: u64 = 25;
/// Slowest allowed coalescer tick.
pub const MAX_SYNC_INTERVAL_MS: u64 = 500;

/// Keyboard modifier style preference (primarily for macOS users)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModifierStyle {
    /// Use platform-native modifier (Cmd on macOS, Ctrl on Windows/Linux)
    #[default]
    Platform,
    /// Always use Ctrl
    Ctrl,
}

/// Error reading or writing the settings file.
#[derive(Debug)]
pub enum ConfigError {
    Io(String),
    Parse(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "settings I/O error: {}", msg),
            ConfigError::Parse(msg) => write!(f, "settings parse error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Sync
    #[serde(rename = "sync.selectionIntervalMs")]
    pub selection_interval_ms: u64,

    #[serde(rename = "sync.focusIntervalMs")]
    pub focus_interval_ms: u64,

    #[serde(rename = "sync.endpoint")]
    pub endpoint: String,

    #[serde(rename = "sync.requestTimeoutMs")]
    pub request_timeout_ms: u64,

    // Grid
    #[serde(rename = "grid.rows")]
    pub rows: usize,

    #[serde(rename = "grid.cols")]
    pub cols: usize,

    // Keyboard
    #[serde(rename = "keyboard.modifierStyle")]
    pub modifier_style: ModifierStyle,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            // Selection drags produce many events; focus changes are rarer
            // and wait on a fragment swap, so they tick slower.
            selection_interval_ms: 25,
            focus_interval_ms: 100,
            endpoint: "http://127.0.0.1:5000".to_string(),
            request_timeout_ms: 5_000,
            rows: 20,
            cols: 8,
            modifier_style: ModifierStyle::default(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("gridsync")
            .join("settings.json")
    }

    /// Load settings from the default path, falling back to defaults
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Load settings from `path`, falling back to defaults on any error.
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match Self::read(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("{} ({}), using default settings", e, path.display());
                Self::default()
            }
        }
    }

    /// Strict load: report errors instead of falling back.
    pub fn read(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        Self::parse(&contents)
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Save current settings to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))?;

        fs::write(path, json).map_err(|e| ConfigError::Io(e.to_string()))
    }

    /// Write the commented default file if nothing exists at `path` yet.
    /// Returns true if a file was written.
    pub fn create_default_file(path: &Path) -> Result<bool, ConfigError> {
        if path.exists() {
            return Ok(false);
        }
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::Io(e.to_string()))?;
        }

        let default_config = r#"{
    // Coalescer tick periods in milliseconds (clamped to 25..500)
    "sync.selectionIntervalMs": 25,
    "sync.focusIntervalMs": 100,

    // Document backend
    "sync.endpoint": "http://127.0.0.1:5000",
    "sync.requestTimeoutMs": 5000,

    // Grid size for the interactive view
    "grid.rows": 20,
    "grid.cols": 8,

    // Keyboard (macOS only: "platform" = Cmd, "ctrl" = Ctrl)
    "keyboard.modifierStyle": "platform"
}
"#;

        fs::write(path, default_config).map_err(|e| ConfigError::Io(e.to_string()))?;
        Ok(true)
    }

    /// Tick period of the selection coalescer.
    pub fn selection_interval(&self) -> Duration {
        clamp_interval(self.selection_interval_ms)
    }

    /// Tick period of the focus coalescer.
    pub fn focus_interval(&self) -> Duration {
        clamp_interval(self.focus_interval_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms.max(1))
    }
}

fn clamp_interval(ms: u64) -> Duration {
    Duration::from_millis(ms.clamp(MIN_SYNC_INTERVAL_MS, MAX_SYNC_INTERVAL_MS))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let s = Settings::default();
        assert_eq!(s.selection_interval(), Duration::from_millis(25));
        assert_eq!(s.focus_interval(), Duration::from_millis(100));
        assert_eq!(s.modifier_style, ModifierStyle::Platform);
    }

    #[test]
    fn test_parse_with_comments_and_partial_keys() {
        let s = Settings::parse(
            r#"{
    // only override one key
    "sync.focusIntervalMs": 250,
    "keyboard.modifierStyle": "ctrl"
}"#,
        )
        .unwrap();
        assert_eq!(s.focus_interval_ms, 250);
        assert_eq!(s.selection_interval_ms, 25);
        assert_eq!(s.modifier_style, ModifierStyle::Ctrl);
    }

    #[test]
    fn test_intervals_are_clamped() {
        let s = Settings {
            selection_interval_ms: 1,
            focus_interval_ms: 10_000,
            ..Settings::default()
        };
        assert_eq!(s.selection_interval(), Duration::from_millis(MIN_SYNC_INTERVAL_MS));
        assert_eq!(s.focus_interval(), Duration::from_millis(MAX_SYNC_INTERVAL_MS));
    }

    #[test]
    fn test_parse_error() {
        assert!(matches!(Settings::parse("{ not json"), Err(ConfigError::Parse(_))));
    }
}
