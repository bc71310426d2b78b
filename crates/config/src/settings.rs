// Application settings
// Loaded from ~/.config/trilabel/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// What happens to the session cursor when the operator switches stages.
///
/// The position index is not a row identity: under `Keep`, after a stage
/// switch it points at whatever row occupies the same position in the new
/// working set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CursorPolicy {
    /// Rewind to the first document of the new stage (default)
    #[default]
    Reset,
    /// Keep the raw position index across the switch
    Keep,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// The three stage label column names, in stage order
    #[serde(rename = "data.labelColumns")]
    pub label_columns: [String; 3],

    /// Cursor behavior on stage change
    #[serde(rename = "session.cursorOnStageChange")]
    pub cursor_on_stage_change: CursorPolicy,

    /// Character cap for the long free-text preview
    #[serde(rename = "view.contentPreviewChars")]
    pub content_preview_chars: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            label_columns: ["1차".into(), "2차".into(), "3차".into()],
            cursor_on_stage_change: CursorPolicy::Reset,
            content_preview_chars: 700,
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("trilabel");
        config_dir.join("settings.json")
    }

    /// Load settings from disk, falling back to defaults
    pub fn load() -> Self {
        let path = Self::config_path();

        if !path.exists() {
            let settings = Self::default();
            settings.create_default_file();
            return settings;
        }

        match fs::read_to_string(&path) {
            Ok(contents) => match parse_settings(&contents) {
                Ok(settings) => settings,
                Err(e) => {
                    eprintln!("Error parsing settings.json: {}", e);
                    eprintln!("Using default settings");
                    Self::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading settings.json: {}", e);
                Self::default()
            }
        }
    }

    /// Create default settings file with comments
    fn create_default_file(&self) {
        let path = Self::config_path();

        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                eprintln!("Error creating config directory: {}", e);
                return;
            }
        }

        let default_config = r#"{
    // Stage label columns, in pass order
    "data.labelColumns": ["1차", "2차", "3차"],

    // Cursor behavior when switching stages: "reset" or "keep"
    // "keep" preserves the position index, not the row under it
    "session.cursorOnStageChange": "reset",

    // Long free-text preview length, in characters
    "view.contentPreviewChars": 700
}
"#;

        if let Err(e) = fs::write(&path, default_config) {
            eprintln!("Error writing default settings.json: {}", e);
        }
    }
}

/// Parse settings JSON, stripping `//` comment lines first.
fn parse_settings(contents: &str) -> Result<Settings, serde_json::Error> {
    let cleaned: String = contents
        .lines()
        .filter(|line| !line.trim().starts_with("//"))
        .collect::<Vec<_>>()
        .join("\n");
    serde_json::from_str(&cleaned)
}
