//! Unified action system for sift.
//!
//! Every user-triggerable action is represented by the [`Action`] enum.
//! [`ActionRegistry`] provides the metadata (id, name, description,
//! category) used by `keymap.toml` and by the help window.

/// Every user-triggerable action.
///
/// Variants carry no parameters; context is determined at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    // Navigation
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    CursorTop,
    CursorBottom,
    Open,
    GoParent,
    GoHome,
    Refresh,
    // Prompts
    Filter,
    CommandLine,
    Goto,
    AddFile,
    Mkdir,
    Remove,
    Move,
    Copy,
    Rename,
    ChangeDir,
    // View
    ViewAll,
    ViewList,
    ViewDirs,
    ViewFiles,
    TogglePreview,
    ToggleSplit,
    SwapPane,
    Sort,
    Columns,
    // Selection
    SelectMode,
    ToggleMark,
    // System
    Settings,
    Help,
    Cancel,
    Quit,
}

/// Broad category for grouping actions in the help window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionCategory {
    Navigation,
    FileOps,
    View,
    Selection,
    System,
}

impl ActionCategory {
    pub const ALL: [ActionCategory; 5] = [
        ActionCategory::Navigation,
        ActionCategory::FileOps,
        ActionCategory::View,
        ActionCategory::Selection,
        ActionCategory::System,
    ];

    /// Human-readable label for display.
    pub fn label(self) -> &'static str {
        match self {
            Self::Navigation => "Navigation",
            Self::FileOps => "File",
            Self::View => "View",
            Self::Selection => "Selection",
            Self::System => "System",
        }
    }
}

/// Metadata for a single action.
#[derive(Debug, Clone)]
pub struct ActionDescriptor {
    pub action: Action,
    /// Snake-case identifier used in `keymap.toml` (e.g. `"cursor_up"`).
    pub id: &'static str,
    /// Human-readable name (e.g. `"Cursor Up"`).
    pub name: &'static str,
    /// Short description (e.g. `"Move cursor up one entry"`).
    pub description: &'static str,
    pub category: ActionCategory,
}

const fn desc(
    action: Action,
    id: &'static str,
    name: &'static str,
    description: &'static str,
    category: ActionCategory,
) -> ActionDescriptor {
    ActionDescriptor {
        action,
        id,
        name,
        description,
        category,
    }
}

const DESCRIPTORS: &[ActionDescriptor] = {
    use Action as A;
    use ActionCategory as C;
    &[
        desc(A::CursorUp, "cursor_up", "Cursor Up", "Move cursor up one entry", C::Navigation),
        desc(A::CursorDown, "cursor_down", "Cursor Down", "Move cursor down one entry", C::Navigation),
        desc(A::PageUp, "page_up", "Page Up", "Move cursor up one screen", C::Navigation),
        desc(A::PageDown, "page_down", "Page Down", "Move cursor down one screen", C::Navigation),
        desc(A::CursorTop, "cursor_top", "Go to Top", "Jump to the first entry", C::Navigation),
        desc(A::CursorBottom, "cursor_bottom", "Go to Bottom", "Jump to the last entry", C::Navigation),
        desc(A::Open, "open", "Open", "Enter the selected directory, or confirm a choice", C::Navigation),
        desc(A::GoParent, "go_parent", "Parent Directory", "Go to the parent directory", C::Navigation),
        desc(A::GoHome, "go_home", "Home Directory", "Go to the home directory", C::Navigation),
        desc(A::Refresh, "refresh", "Refresh", "Re-read the current directory", C::Navigation),
        desc(A::Goto, "goto", "Relative Jump", "Move the cursor by a typed count", C::Navigation),
        desc(A::ChangeDir, "change_dir", "Change Directory", "Type a directory to go to", C::Navigation),
        desc(A::AddFile, "add_file", "New File", "Create a file (touch)", C::FileOps),
        desc(A::Mkdir, "mkdir", "New Directory", "Create a directory and its parents", C::FileOps),
        desc(A::Remove, "remove", "Remove", "Delete a path, or the selection after confirming", C::FileOps),
        desc(A::Move, "move", "Move", "Move the selection to a path", C::FileOps),
        desc(A::Copy, "copy", "Copy", "Copy the selected file to a path", C::FileOps),
        desc(A::Rename, "rename", "Rename", "Rename the selection", C::FileOps),
        desc(A::CommandLine, "command_line", "Command Line", "Run a command (cd, mkdir, sh ...)", C::FileOps),
        desc(A::Filter, "filter", "Filter", "Filter entries by name", C::View),
        desc(A::ViewAll, "view_all", "Show All", "Show every entry, dotfiles included", C::View),
        desc(A::ViewList, "view_list", "Hide Dotfiles", "Show entries except dotfiles", C::View),
        desc(A::ViewDirs, "view_dirs", "Directories Only", "Show only directories", C::View),
        desc(A::ViewFiles, "view_files", "Files Only", "Show only files", C::View),
        desc(A::TogglePreview, "toggle_preview", "Toggle Preview", "Switch the side panel between preview and info", C::View),
        desc(A::ToggleSplit, "toggle_split", "Toggle Split", "Cycle closed, preview and dual split", C::View),
        desc(A::SwapPane, "swap_pane", "Swap Pane", "Focus the other pane (completes in the command line)", C::View),
        desc(A::Sort, "sort", "Sort", "Choose the sort column", C::View),
        desc(A::Columns, "columns", "Columns", "Choose the visible columns", C::View),
        desc(A::SelectMode, "select_mode", "Select Mode", "Mark entries while moving", C::Selection),
        desc(A::ToggleMark, "toggle_mark", "Toggle Mark", "Mark or unmark the selected entry", C::Selection),
        desc(A::Settings, "settings", "Settings", "Toggle live settings", C::System),
        desc(A::Help, "help", "Help", "Show key bindings", C::System),
        desc(A::Cancel, "cancel", "Cancel", "Leave the current mode", C::System),
        desc(A::Quit, "quit", "Quit", "Quit sift", C::System),
    ]
};

/// Registry of all available actions.
#[derive(Debug, Clone)]
pub struct ActionRegistry {
    descriptors: &'static [ActionDescriptor],
}

impl ActionRegistry {
    /// Builds the registry containing every known action.
    pub fn new() -> Self {
        Self {
            descriptors: DESCRIPTORS,
        }
    }

    /// Returns all descriptors.
    pub fn all(&self) -> &[ActionDescriptor] {
        self.descriptors
    }

    /// Descriptors in one category, in registry order.
    pub fn in_category(&self, category: ActionCategory) -> impl Iterator<Item = &ActionDescriptor> {
        self.descriptors.iter().filter(move |d| d.category == category)
    }

    /// Finds an action by its string id (for keymap.toml parsing).
    pub fn find_by_id(&self, id: &str) -> Option<Action> {
        self.descriptors
            .iter()
            .find(|d| d.id == id)
            .map(|d| d.action)
    }

    /// Returns the descriptor for a given action.
    pub fn descriptor_for(&self, action: Action) -> Option<&ActionDescriptor> {
        self.descriptors.iter().find(|d| d.action == action)
    }
}

impl Default for ActionRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn ids_are_unique() {
        let registry = ActionRegistry::new();
        let ids: HashSet<&str> = registry.all().iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), registry.all().len());
    }

    #[test]
    fn every_action_is_described_once() {
        let registry = ActionRegistry::new();
        let actions: HashSet<Action> = registry.all().iter().map(|d| d.action).collect();
        assert_eq!(actions.len(), registry.all().len());
        assert_eq!(actions.len(), 35);
    }

    #[test]
    fn find_by_id_returns_correct_action() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.find_by_id("cursor_up"), Some(Action::CursorUp));
        assert_eq!(registry.find_by_id("quit"), Some(Action::Quit));
        assert_eq!(registry.find_by_id("toggle_split"), Some(Action::ToggleSplit));
    }

    #[test]
    fn find_by_id_unknown_returns_none() {
        let registry = ActionRegistry::new();
        assert_eq!(registry.find_by_id("nonexistent"), None);
        assert_eq!(registry.find_by_id(""), None);
    }

    #[test]
    fn descriptor_for_returns_metadata() {
        let registry = ActionRegistry::new();
        let desc = registry.descriptor_for(Action::Help).unwrap();
        assert_eq!(desc.id, "help");
        assert_eq!(desc.category, ActionCategory::System);
    }

    #[test]
    fn categories_cover_everything() {
        let registry = ActionRegistry::new();
        let total: usize = ActionCategory::ALL
            .iter()
            .map(|c| registry.in_category(*c).count())
            .sum();
        assert_eq!(total, registry.all().len());
        assert_eq!(ActionCategory::FileOps.label(), "File");
    }
}
