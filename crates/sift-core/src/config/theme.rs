//! Theme configuration for sift.
//!
//! Colors are stored as strings (e.g. `"blue"`, `"#ff5500"`) and converted
//! to [`ratatui::style::Color`] at render time via [`parse_color`].

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// Complete theme configuration with per-component color groups.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default)]
    pub panel: PanelTheme,
    #[serde(default)]
    pub header: HeaderTheme,
    #[serde(default)]
    pub statusbar: StatusBarTheme,
    #[serde(default)]
    pub preview: PreviewTheme,
    #[serde(default)]
    pub popup: PopupTheme,
    #[serde(default)]
    pub command_bar: CommandBarTheme,
}

impl Theme {
    /// Loads a theme from a TOML file at `path`.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(e, path))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Like [`Theme::load`], but a missing file yields the default theme and
    /// a broken one is logged before falling back.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(theme) => theme,
            Err(CoreError::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default theme");
                Self::default()
            }
        }
    }

    /// Saves the theme to a TOML file at `path`.
    pub fn save(&self, path: &Path) -> CoreResult<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

/// File list colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelTheme {
    pub dir_fg: String,
    pub symlink_fg: String,
    pub executable_fg: String,
    pub hidden_fg: String,
    pub selected_fg: String,
    pub selected_bg: String,
    pub marked_fg: String,
    pub column_header_fg: String,
    pub border_fg: String,
    pub active_border_fg: String,
}

impl Default for PanelTheme {
    fn default() -> Self {
        Self {
            dir_fg: "blue".to_string(),
            symlink_fg: "cyan".to_string(),
            executable_fg: "green".to_string(),
            hidden_fg: "dark_gray".to_string(),
            selected_fg: "black".to_string(),
            selected_bg: "yellow".to_string(),
            marked_fg: "magenta".to_string(),
            column_header_fg: "gray".to_string(),
            border_fg: "dark_gray".to_string(),
            active_border_fg: "yellow".to_string(),
        }
    }
}

/// Top line: current directory and view mode.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HeaderTheme {
    pub bg: String,
    pub path_fg: String,
    pub view_mode_fg: String,
}

impl Default for HeaderTheme {
    fn default() -> Self {
        Self {
            bg: "reset".to_string(),
            path_fg: "cyan".to_string(),
            view_mode_fg: "dark_gray".to_string(),
        }
    }
}

/// Status bar colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StatusBarTheme {
    pub bg: String,
    pub mode_fg: String,
    pub mode_bg: String,
    pub position_fg: String,
    pub message_fg: String,
    pub error_fg: String,
}

impl Default for StatusBarTheme {
    fn default() -> Self {
        Self {
            bg: "dark_gray".to_string(),
            mode_fg: "black".to_string(),
            mode_bg: "cyan".to_string(),
            position_fg: "white".to_string(),
            message_fg: "white".to_string(),
            error_fg: "light_red".to_string(),
        }
    }
}

/// Side panel colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewTheme {
    pub border_fg: String,
    pub title_fg: String,
    pub label_fg: String,
    pub error_fg: String,
    pub allowed_fg: String,
    pub denied_fg: String,
}

impl Default for PreviewTheme {
    fn default() -> Self {
        Self {
            border_fg: "dark_gray".to_string(),
            title_fg: "blue".to_string(),
            label_fg: "gray".to_string(),
            error_fg: "red".to_string(),
            allowed_fg: "green".to_string(),
            denied_fg: "red".to_string(),
        }
    }
}

/// Floating window colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PopupTheme {
    pub border_fg: String,
    pub title_fg: String,
    pub highlight_fg: String,
    pub key_fg: String,
}

impl Default for PopupTheme {
    fn default() -> Self {
        Self {
            border_fg: "yellow".to_string(),
            title_fg: "yellow".to_string(),
            highlight_fg: "cyan".to_string(),
            key_fg: "green".to_string(),
        }
    }
}

/// Bottom input line colors.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CommandBarTheme {
    pub prompt_fg: String,
    pub text_fg: String,
    pub completion_fg: String,
    pub output_fg: String,
}

impl Default for CommandBarTheme {
    fn default() -> Self {
        Self {
            prompt_fg: "yellow".to_string(),
            text_fg: "white".to_string(),
            completion_fg: "dark_gray".to_string(),
            output_fg: "gray".to_string(),
        }
    }
}

/// Parses a color string into a `ratatui::style::Color`.
///
/// Supports named colors (`"blue"`, `"dark_gray"`) and hex (`"#rrggbb"`).
/// Returns `Color::Reset` for unrecognised values.
pub fn parse_color(s: &str) -> ratatui::style::Color {
    use ratatui::style::Color;

    match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::Gray,
        "dark_gray" | "dark_grey" | "darkgray" | "darkgrey" => Color::DarkGray,
        "light_red" | "lightred" => Color::LightRed,
        "light_green" | "lightgreen" => Color::LightGreen,
        "light_yellow" | "lightyellow" => Color::LightYellow,
        "light_blue" | "lightblue" => Color::LightBlue,
        "light_magenta" | "lightmagenta" => Color::LightMagenta,
        "light_cyan" | "lightcyan" => Color::LightCyan,
        "white" => Color::White,
        "reset" => Color::Reset,
        hex if hex.starts_with('#') && hex.len() == 7 && hex.is_ascii() => {
            let channel =
                |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16).unwrap_or(0);
            Color::Rgb(channel(1..3), channel(3..5), channel(5..7))
        }
        _ => Color::Reset,
    }
}
