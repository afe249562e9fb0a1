//! View-mode filtering, substring filtering and column sorting.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::fs::entry::{EntryKind, FileEntry};

/// Pre-filter applied before the substring query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    #[serde(rename = "all")]
    All,
    #[default]
    #[serde(rename = "list")]
    HideHidden,
    #[serde(rename = "dirs")]
    DirsOnly,
    #[serde(rename = "files")]
    FilesOnly,
}

impl ViewMode {
    /// Cycle order used by the settings window.
    pub const ALL: [ViewMode; 4] = [
        ViewMode::All,
        ViewMode::HideHidden,
        ViewMode::DirsOnly,
        ViewMode::FilesOnly,
    ];

    /// Short label for the header and status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::HideHidden => "List",
            Self::DirsOnly => "Dirs:ll",
            Self::FilesOnly => "Files",
        }
    }

    /// Sentence printed after a view-mode command.
    pub fn description(self) -> &'static str {
        match self {
            Self::All => "Showing all entries, hidden included",
            Self::HideHidden => "Hiding dotfiles",
            Self::DirsOnly => "Showing directories only",
            Self::FilesOnly => "Showing files only",
        }
    }

    /// Command that selects this mode (`ll`, `ls`, `ld`, `lf`).
    pub fn command(self) -> &'static str {
        match self {
            Self::All => "ll",
            Self::HideHidden => "ls",
            Self::DirsOnly => "ld",
            Self::FilesOnly => "lf",
        }
    }

    pub fn from_command(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.command() == name)
    }

    /// The mode after this one in [`ViewMode::ALL`], wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|m| *m == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    fn keeps(self, entry: &FileEntry) -> bool {
        match self {
            Self::All => true,
            Self::HideHidden => !entry.is_hidden(),
            Self::DirsOnly => entry.is_dir() || entry.kind() == EntryKind::Directory,
            Self::FilesOnly => !entry.is_dir(),
        }
    }
}

/// A list column. The declaration order is the canonical display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Permissions,
    Size,
    Type,
    User,
    Group,
    DateModified,
    Name,
}

impl Column {
    pub const ALL: [Column; 7] = [
        Column::Permissions,
        Column::Size,
        Column::Type,
        Column::User,
        Column::Group,
        Column::DateModified,
        Column::Name,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Permissions => "Permissions",
            Self::Size => "Size",
            Self::Type => "Type",
            Self::User => "User",
            Self::Group => "Group",
            Self::DateModified => "Date Modified",
            Self::Name => "Name",
        }
    }

    /// The cell text for `entry` in this column.
    pub fn cell(self, entry: &FileEntry) -> &str {
        match self {
            Self::Permissions => entry.permissions(),
            Self::Size => entry.size_display(),
            Self::Type => entry.kind().label(),
            Self::User => entry.owner(),
            Self::Group => entry.group(),
            Self::DateModified => entry.modified_display(),
            Self::Name => entry.name(),
        }
    }

    fn compare(self, a: &FileEntry, b: &FileEntry) -> Ordering {
        match self {
            Self::Name => compare_names(a, b),
            Self::Size => a.size().cmp(&b.size()),
            Self::DateModified => a.modified().cmp(&b.modified()),
            Self::Permissions | Self::Type | Self::User | Self::Group => {
                self.cell(a).cmp(self.cell(b))
            }
        }
    }
}

fn compare_names(a: &FileEntry, b: &FileEntry) -> Ordering {
    a.name()
        .to_lowercase()
        .cmp(&b.name().to_lowercase())
        .then_with(|| a.name().cmp(b.name()))
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Asc,
    Desc,
}

impl Direction {
    pub fn flip(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "↑",
            Self::Desc => "↓",
        }
    }
}

/// The single active sort key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SortKey {
    pub column: Column,
    pub direction: Direction,
}

impl SortKey {
    pub fn new(column: Column, direction: Direction) -> Self {
        Self { column, direction }
    }
}

impl Default for SortKey {
    fn default() -> Self {
        Self::new(Column::Name, Direction::Asc)
    }
}

/// A set of visible columns, always iterated in canonical order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnSet(BTreeSet<Column>);

impl ColumnSet {
    pub fn new(columns: impl IntoIterator<Item = Column>) -> Self {
        Self(columns.into_iter().collect())
    }

    pub fn contains(&self, column: Column) -> bool {
        self.0.contains(&column)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds the column if missing, removes it otherwise.
    pub fn toggled(mut self, column: Column) -> Self {
        if !self.0.remove(&column) {
            self.0.insert(column);
        }
        self
    }

    pub fn iter(&self) -> impl Iterator<Item = Column> + '_ {
        self.0.iter().copied()
    }
}

impl Default for ColumnSet {
    fn default() -> Self {
        Self::new([
            Column::Permissions,
            Column::Size,
            Column::DateModified,
            Column::Name,
        ])
    }
}

/// Derives the visible list from raw directory entries.
///
/// Applies the view mode, then the case-insensitive substring `query`, then
/// sorts directories first and by `sort` within each group. Ties fall back
/// to ascending name order. Returns a **new** vector; `entries` is never
/// mutated.
pub fn filter_entries(
    entries: &[FileEntry],
    view_mode: ViewMode,
    query: &str,
    sort: SortKey,
) -> Vec<FileEntry> {
    let needle = query.to_lowercase();

    let mut visible: Vec<FileEntry> = entries
        .iter()
        .filter(|e| view_mode.keeps(e))
        .filter(|e| needle.is_empty() || e.name().to_lowercase().contains(&needle))
        .cloned()
        .collect();

    visible.sort_by(|a, b| {
        b.is_dir()
            .cmp(&a.is_dir())
            .then_with(|| {
                let ord = sort.column.compare(a, b);
                match sort.direction {
                    Direction::Asc => ord,
                    Direction::Desc => ord.reverse(),
                }
            })
            .then_with(|| compare_names(a, b))
    });

    visible
}

/// Clamps a selection index into a list of `len` entries.
///
/// Empty lists have no selection; a missing selection becomes the first row.
pub fn clamp_selection(old: Option<usize>, len: usize) -> Option<usize> {
    if len == 0 {
        None
    } else {
        Some(old.unwrap_or(0).min(len - 1))
    }
}
