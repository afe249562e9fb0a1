//! Application configuration loaded from a TOML file.
//!
//! Every field has a default, so sift runs without a config file. Files
//! live under `<config_dir>/sift/` (see [`ConfigPaths`]).

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};
use crate::nav::filter::{Column, ColumnSet, Direction, SortKey, ViewMode};
use crate::preview::PreviewLimits;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
    /// User aliases: command name to a directory or shell line.
    #[serde(default)]
    pub commands: HashMap<String, String>,
}

impl Config {
    /// Loads configuration from a TOML file at `path`.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(e, path))?;
        toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))
    }

    /// Like [`Config::load`], but a missing file yields the defaults and a
    /// broken one is logged before falling back.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(CoreError::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default config");
                Self::default()
            }
        }
    }
}

/// How the area beside the active pane is used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitView {
    /// One full-width pane.
    #[default]
    Closed,
    /// Active pane plus the side panel.
    Preview,
    /// Two independent panes.
    Dual,
}

impl SplitView {
    pub fn next(self) -> Self {
        match self {
            Self::Closed => Self::Preview,
            Self::Preview => Self::Dual,
            Self::Dual => Self::Closed,
        }
    }

    pub fn is_open(self) -> bool {
        self != Self::Closed
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Preview => "preview",
            Self::Dual => "dual",
        }
    }
}

/// General file-browsing preferences.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    #[serde(default)]
    pub view_mode: ViewMode,
    #[serde(default = "default_sort_column")]
    pub sort_column: Column,
    #[serde(default)]
    pub sort_direction: Direction,
    #[serde(default)]
    pub split_view: SplitView,
    #[serde(default = "default_columns")]
    pub columns: Vec<Column>,
    #[serde(default = "default_true")]
    pub show_icons: bool,
}

impl GeneralConfig {
    pub fn sort_key(&self) -> SortKey {
        SortKey::new(self.sort_column, self.sort_direction)
    }

    /// Visible columns; an empty list falls back to the default set.
    pub fn column_set(&self) -> ColumnSet {
        if self.columns.is_empty() {
            ColumnSet::default()
        } else {
            ColumnSet::new(self.columns.iter().copied())
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            view_mode: ViewMode::default(),
            sort_column: default_sort_column(),
            sort_direction: Direction::default(),
            split_view: SplitView::default(),
            columns: default_columns(),
            show_icons: true,
        }
    }
}

/// Side panel preview configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_max_text_lines")]
    pub max_text_lines: usize,
    #[serde(default = "default_max_image_mb")]
    pub max_image_mb: u64,
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    #[serde(default = "default_syntax_theme")]
    pub syntax_theme: String,
}

impl PreviewConfig {
    pub fn limits(&self) -> PreviewLimits {
        PreviewLimits {
            max_text_lines: self.max_text_lines,
            max_image_bytes: self.max_image_mb * 1024 * 1024,
            debounce: Duration::from_millis(self.debounce_ms),
        }
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_text_lines: default_max_text_lines(),
            max_image_mb: default_max_image_mb(),
            debounce_ms: default_debounce_ms(),
            syntax_theme: default_syntax_theme(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_sort_column() -> Column {
    Column::Name
}

fn default_columns() -> Vec<Column> {
    ColumnSet::default().iter().collect()
}

fn default_max_text_lines() -> usize {
    40
}

fn default_max_image_mb() -> u64 {
    20
}

fn default_debounce_ms() -> u64 {
    200
}

fn default_syntax_theme() -> String {
    "base16-ocean.dark".to_string()
}

/// Locations of every file sift reads or writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigPaths {
    pub dir: PathBuf,
}

impl ConfigPaths {
    /// `<config_dir>/sift`, or `None` when no home directory is known.
    pub fn discover() -> Option<Self> {
        directories::BaseDirs::new().map(|dirs| Self::in_dir(dirs.config_dir().join("sift")))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn config(&self) -> PathBuf {
        self.dir.join("config.toml")
    }

    pub fn keymap(&self) -> PathBuf {
        self.dir.join("keymap.toml")
    }

    pub fn theme(&self) -> PathBuf {
        self.dir.join("theme.toml")
    }

    pub fn history(&self) -> PathBuf {
        self.dir.join("history")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_config_general() {
        let config = Config::default();
        assert_eq!(config.general.view_mode, ViewMode::HideHidden);
        assert_eq!(config.general.sort_key(), SortKey::default());
        assert_eq!(config.general.split_view, SplitView::Closed);
        assert_eq!(config.general.column_set(), ColumnSet::default());
        assert!(config.general.show_icons);
    }

    #[test]
    fn default_config_preview() {
        let limits = PreviewConfig::default().limits();
        assert_eq!(limits, PreviewLimits::default());
    }

    #[test]
    fn load_full_toml() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(
            &path,
            r#"
[general]
view_mode = "all"
sort_column = "size"
sort_direction = "desc"
split_view = "dual"
columns = ["name", "size"]
show_icons = false

[preview]
enabled = false
max_text_lines = 10
max_image_mb = 2
debounce_ms = 50
syntax_theme = "InspiredGitHub"

[commands]
proj = "~/projects"
st = "git status"
"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.view_mode, ViewMode::All);
        assert_eq!(
            config.general.sort_key(),
            SortKey::new(Column::Size, Direction::Desc)
        );
        assert_eq!(config.general.split_view, SplitView::Dual);
        assert_eq!(
            config.general.column_set().iter().collect::<Vec<_>>(),
            vec![Column::Size, Column::Name]
        );
        assert!(!config.general.show_icons);

        assert!(!config.preview.enabled);
        let limits = config.preview.limits();
        assert_eq!(limits.max_text_lines, 10);
        assert_eq!(limits.max_image_bytes, 2 * 1024 * 1024);
        assert_eq!(limits.debounce, Duration::from_millis(50));
        assert_eq!(config.preview.syntax_theme, "InspiredGitHub");

        assert_eq!(config.commands.get("proj").map(String::as_str), Some("~/projects"));
        assert_eq!(config.commands.len(), 2);
    }

    #[test]
    fn load_partial_toml_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[general]\nview_mode = \"dirs\"\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.view_mode, ViewMode::DirsOnly);
        assert_eq!(config.general.sort_column, Column::Name);
        assert!(config.preview.enabled);
        assert!(config.commands.is_empty());
    }

    #[test]
    fn empty_column_list_falls_back() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[general]\ncolumns = []\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.general.column_set(), ColumnSet::default());
    }

    #[test]
    fn load_nonexistent_returns_not_found() {
        let tmp = TempDir::new().unwrap();
        let result = Config::load(&tmp.path().join("nope.toml"));
        assert!(matches!(result.unwrap_err(), CoreError::NotFound(_)));
    }

    #[test]
    fn load_invalid_toml_returns_config_parse() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        fs::write(&path, "[general]\nview_mode = \"sideways\"\n").unwrap();

        assert!(matches!(Config::load(&path), Err(CoreError::ConfigParse(_))));
        let config = Config::load_or_default(&path);
        assert_eq!(config.general.view_mode, ViewMode::HideHidden);
    }

    #[test]
    fn split_view_cycles() {
        assert_eq!(SplitView::Closed.next(), SplitView::Preview);
        assert_eq!(SplitView::Preview.next(), SplitView::Dual);
        assert_eq!(SplitView::Dual.next(), SplitView::Closed);
        assert!(!SplitView::Closed.is_open());
        assert!(SplitView::Dual.is_open());
    }

    #[test]
    fn config_paths_layout() {
        let paths = ConfigPaths::in_dir("/tmp/sift-conf");
        assert_eq!(paths.config(), PathBuf::from("/tmp/sift-conf/config.toml"));
        assert_eq!(paths.keymap(), PathBuf::from("/tmp/sift-conf/keymap.toml"));
        assert_eq!(paths.theme(), PathBuf::from("/tmp/sift-conf/theme.toml"));
        assert_eq!(paths.history(), PathBuf::from("/tmp/sift-conf/history"));
    }
}
