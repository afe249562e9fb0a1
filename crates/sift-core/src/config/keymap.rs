//! Key binding configuration.
//!
//! Key bindings map key names (e.g. `"j"`, `"gg"`, `"Enter"`, `"Ctrl+d"`) to
//! [`Action`] values. The default bindings follow vim conventions.
//!
//! TOML files use string action identifiers (e.g. `"cursor_down"`); these
//! are resolved to [`Action`] via [`ActionRegistry::find_by_id`] at load
//! time. A user file is layered over the defaults; binding a key to
//! `"none"` removes it.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::action::{Action, ActionRegistry};
use crate::error::{CoreError, CoreResult};

/// Raw TOML representation, deserialized first and then resolved.
#[derive(Debug, Clone, Deserialize)]
struct RawKeymap {
    #[serde(default)]
    bindings: HashMap<String, String>,
}

const DEFAULT_BINDINGS: &[(&str, Action)] = &[
    // Navigation
    ("j", Action::CursorDown),
    ("Down", Action::CursorDown),
    ("k", Action::CursorUp),
    ("Up", Action::CursorUp),
    ("Ctrl+d", Action::PageDown),
    ("PageDown", Action::PageDown),
    ("Ctrl+u", Action::PageUp),
    ("PageUp", Action::PageUp),
    ("gg", Action::CursorTop),
    ("Home", Action::CursorTop),
    ("G", Action::CursorBottom),
    ("End", Action::CursorBottom),
    ("l", Action::Open),
    ("Right", Action::Open),
    ("Enter", Action::Open),
    ("h", Action::GoParent),
    ("Left", Action::GoParent),
    ("Backspace", Action::GoParent),
    ("~", Action::GoHome),
    ("Ctrl+r", Action::Refresh),
    (";", Action::Goto),
    ("c", Action::ChangeDir),
    // File operations
    ("a", Action::AddFile),
    ("M", Action::Mkdir),
    ("d", Action::Remove),
    ("m", Action::Move),
    ("y", Action::Copy),
    ("r", Action::Rename),
    (":", Action::CommandLine),
    // View
    ("/", Action::Filter),
    ("1", Action::ViewAll),
    ("2", Action::ViewList),
    ("3", Action::ViewDirs),
    ("4", Action::ViewFiles),
    ("p", Action::TogglePreview),
    ("w", Action::ToggleSplit),
    ("Tab", Action::SwapPane),
    ("s", Action::Sort),
    ("C", Action::Columns),
    // Selection
    ("v", Action::SelectMode),
    ("Space", Action::ToggleMark),
    // System
    (",", Action::Settings),
    ("?", Action::Help),
    ("Esc", Action::Cancel),
    ("q", Action::Quit),
    ("Ctrl+c", Action::Quit),
];

/// Complete set of key bindings.
///
/// Stores bindings as a `HashMap<String, Action>` for O(1) lookup.
#[derive(Debug, Clone)]
pub struct Keymap {
    bindings: HashMap<String, Action>,
    /// Reverse map: Action → sorted key names (for the help window).
    reverse: HashMap<Action, Vec<String>>,
}

impl Default for Keymap {
    fn default() -> Self {
        let bindings = DEFAULT_BINDINGS
            .iter()
            .map(|(key, action)| (key.to_string(), *action))
            .collect();
        Self::from_bindings(bindings)
    }
}

/// Builds the reverse mapping from Action → Vec<key string>.
fn build_reverse(bindings: &HashMap<String, Action>) -> HashMap<Action, Vec<String>> {
    let mut reverse: HashMap<Action, Vec<String>> = HashMap::new();
    for (key, action) in bindings {
        reverse.entry(*action).or_default().push(key.clone());
    }
    for keys in reverse.values_mut() {
        keys.sort();
    }
    reverse
}

impl Keymap {
    fn from_bindings(bindings: HashMap<String, Action>) -> Self {
        let reverse = build_reverse(&bindings);
        Self { bindings, reverse }
    }

    /// Loads key bindings from a TOML file at `path`, layered over the
    /// defaults.
    ///
    /// Unknown action ids are logged and ignored.
    ///
    /// # Errors
    ///
    /// - [`CoreError::NotFound`] if the file does not exist.
    /// - [`CoreError::PermissionDenied`] if the file is not readable.
    /// - [`CoreError::ConfigParse`] if the TOML is malformed.
    pub fn load(path: &Path) -> CoreResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| CoreError::from_io(e, path))?;
        let raw: RawKeymap =
            toml::from_str(&content).map_err(|e| CoreError::ConfigParse(e.to_string()))?;
        Ok(Self::default().overlay(raw))
    }

    /// Like [`Keymap::load`], but falls back to the defaults on any error.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(keymap) => keymap,
            Err(CoreError::NotFound(_)) => Self::default(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "using default keymap");
                Self::default()
            }
        }
    }

    fn overlay(self, raw: RawKeymap) -> Self {
        let registry = ActionRegistry::new();
        let mut bindings = self.bindings;
        for (key, action_id) in raw.bindings {
            if action_id == "none" {
                bindings.remove(&key);
                continue;
            }
            match registry.find_by_id(&action_id) {
                Some(action) => {
                    bindings.insert(key, action);
                }
                None => tracing::warn!(key = %key, action = %action_id, "unknown action in keymap"),
            }
        }
        Self::from_bindings(bindings)
    }

    /// Returns the action mapped to `key`, or `None` if unbound.
    pub fn action_for_key(&self, key: &str) -> Option<Action> {
        self.bindings.get(key).copied()
    }

    /// Whether some binding is longer than `prefix` and starts with it
    /// (e.g. `"g"` for `"gg"`).
    pub fn is_prefix(&self, prefix: &str) -> bool {
        self.bindings
            .keys()
            .any(|k| k.len() > prefix.len() && k.starts_with(prefix))
    }

    /// Returns the key(s) bound to a given action.
    pub fn keys_for_action(&self, action: Action) -> Option<&[String]> {
        self.reverse.get(&action).map(|v| v.as_slice())
    }

    /// Returns all bindings.
    pub fn bindings(&self) -> &HashMap<String, Action> {
        &self.bindings
    }
}
