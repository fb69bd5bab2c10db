use crate::canvas::model::{Color, Tool};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Settings {
    /// Dark display mode. Decides the canvas background fill and the
    /// default draw color.
    #[serde(default)]
    pub dark_theme: bool,
    #[serde(default = "default_last_tool")]
    pub last_tool: Tool,
    /// Last picked color. If `None`, the theme's default draw color is used.
    #[serde(default)]
    pub last_color: Option<Color>,
    #[serde(default = "default_last_width")]
    pub last_width: f32,
    /// Directory used for saving drawings. If `None`, a platform default is
    /// used.
    #[serde(default)]
    pub save_dir: Option<String>,
    /// Enable toast notifications in the UI.
    #[serde(default = "default_toasts")]
    pub enable_toasts: bool,
    /// Duration of toast notifications in seconds.
    #[serde(default = "default_toast_duration")]
    pub toast_duration: f32,
    /// When enabled the application initialises the logger at debug level.
    #[serde(default)]
    pub debug_logging: bool,
}

fn default_last_tool() -> Tool {
    Tool::Brush
}

fn default_last_width() -> f32 {
    25.0
}

fn default_toasts() -> bool {
    true
}

fn default_toast_duration() -> f32 {
    3.5
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            dark_theme: false,
            last_tool: default_last_tool(),
            last_color: None,
            last_width: default_last_width(),
            save_dir: None,
            enable_toasts: default_toasts(),
            toast_duration: default_toast_duration(),
            debug_logging: false,
        }
    }
}

impl Settings {
    /// Missing, empty or unparsable files all fall back to defaults; a bad
    /// settings file must never keep the application from starting.
    pub fn load(path: &str) -> Self {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.is_empty() {
            return Self::default();
        }
        match serde_json::from_str(&content) {
            Ok(settings) => settings,
            Err(e) => {
                tracing::warn!("ignoring invalid settings file {path}: {e}");
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }
}
