//! Per-pane browsing state.
//!
//! A [`Pane`] owns the raw entries of its directory and the derived visible
//! list. Every mutation consumes the pane and returns a new one; the
//! selection is re-clamped whenever the visible list is rebuilt so that it
//! is `None` exactly when nothing is visible.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use crate::fs::entry::FileEntry;
use crate::fs::ops::read_directory;
use crate::nav::filter::{clamp_selection, filter_entries, Column, ColumnSet, SortKey, ViewMode};

/// Jump target for [`Pane::go_to`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Top,
    Bottom,
}

/// One file list.
#[derive(Debug, Clone, Default)]
pub struct Pane {
    cwd: PathBuf,
    all_entries: Vec<FileEntry>,
    visible: Vec<FileEntry>,
    selection: Option<usize>,
    query: String,
    marks: BTreeSet<PathBuf>,
    columns: ColumnSet,
    view_mode: ViewMode,
    sort_key: SortKey,
    offset: usize,
    load_error: Option<String>,
}

impl Pane {
    /// Creates an empty pane with the given presentation settings.
    ///
    /// Nothing is read from disk until [`Pane::change_directory`].
    pub fn new(view_mode: ViewMode, sort_key: SortKey, columns: ColumnSet) -> Self {
        Self {
            view_mode,
            sort_key,
            columns,
            ..Self::default()
        }
    }

    // --- accessors ---

    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn all_entries(&self) -> &[FileEntry] {
        &self.all_entries
    }

    pub fn visible(&self) -> &[FileEntry] {
        &self.visible
    }

    pub fn selection(&self) -> Option<usize> {
        self.selection
    }

    pub fn selected(&self) -> Option<&FileEntry> {
        self.selection.and_then(|i| self.visible.get(i))
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn marks(&self) -> &BTreeSet<PathBuf> {
        &self.marks
    }

    pub fn is_marked(&self, path: &Path) -> bool {
        self.marks.contains(path)
    }

    pub fn columns(&self) -> &ColumnSet {
        &self.columns
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn sort_key(&self) -> SortKey {
        self.sort_key
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The error from the last failed directory read, if any.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    // --- transitions ---

    /// Switches to `dir` and reads it.
    ///
    /// The selection resets to the first row. A read failure leaves the
    /// pane empty with the error recorded in [`Pane::load_error`].
    pub fn change_directory(self, dir: &Path) -> Self {
        let cwd = std::fs::canonicalize(dir).unwrap_or_else(|_| dir.to_path_buf());
        let (all_entries, load_error) = match read_directory(&cwd) {
            Ok(entries) => (entries, None),
            Err(e) => {
                tracing::warn!(path = %cwd.display(), error = %e, "failed to read directory");
                (Vec::new(), Some(e.to_string()))
            }
        };

        Self {
            cwd,
            all_entries,
            load_error,
            selection: None,
            offset: 0,
            ..self
        }
        .rederive()
    }

    /// Re-reads the current directory, keeping the selected name if it is
    /// still visible.
    pub fn reload(self) -> Self {
        let keep = self.selected().map(|e| e.name().to_string());
        let old_selection = self.selection;
        let offset = self.offset;
        let cwd = self.cwd.clone();

        let pane = Self {
            offset,
            ..self.change_directory(&cwd)
        };
        match keep {
            Some(name) if pane.visible.iter().any(|e| e.name() == name) => pane.select_name(&name),
            _ => Self {
                selection: clamp_selection(old_selection, pane.visible.len()),
                ..pane
            },
        }
    }

    /// Replaces the substring query and re-derives the visible list.
    pub fn apply_filter(self, query: &str) -> Self {
        Self {
            query: query.to_string(),
            ..self
        }
        .rederive()
    }

    /// Moves the selection by `delta` rows, clamped to the list.
    pub fn move_cursor(self, delta: isize) -> Self {
        let Some(current) = self.selection else {
            return self;
        };
        let last = self.visible.len().saturating_sub(1);
        let target = current.saturating_add_signed(delta).min(last);
        Self {
            selection: Some(target),
            ..self
        }
    }

    pub fn go_to(self, edge: Edge) -> Self {
        if self.visible.is_empty() {
            return self;
        }
        let selection = match edge {
            Edge::Top => 0,
            Edge::Bottom => self.visible.len() - 1,
        };
        Self {
            selection: Some(selection),
            ..self
        }
    }

    /// Selects the visible entry called `name`; unchanged if there is none.
    pub fn select_name(self, name: &str) -> Self {
        match self.visible.iter().position(|e| e.name() == name) {
            Some(idx) => Self {
                selection: Some(idx),
                ..self
            },
            None => self,
        }
    }

    /// Adds `path` to the mark set, or removes it if already marked.
    pub fn toggle_mark(mut self, path: &Path) -> Self {
        if !self.marks.remove(path) {
            self.marks.insert(path.to_path_buf());
        }
        self
    }

    pub fn clear_marks(self) -> Self {
        Self {
            marks: BTreeSet::new(),
            ..self
        }
    }

    pub fn set_columns(self, columns: ColumnSet) -> Self {
        Self { columns, ..self }
    }

    pub fn toggle_column(self, column: Column) -> Self {
        let columns = self.columns.clone().toggled(column);
        Self { columns, ..self }
    }

    /// Sorts by `column`; picking the active column again flips direction.
    pub fn set_sort(self, column: Column) -> Self {
        let sort_key = if self.sort_key.column == column {
            SortKey::new(column, self.sort_key.direction.flip())
        } else {
            SortKey::new(column, Default::default())
        };
        Self { sort_key, ..self }.rederive()
    }

    pub fn set_view_mode(self, view_mode: ViewMode) -> Self {
        Self { view_mode, ..self }.rederive()
    }

    /// Adjusts the viewport offset so that the selection is within the
    /// first `height` rows starting at the offset.
    pub fn scroll_into_view(self, height: usize) -> Self {
        let height = height.max(1);
        let max_offset = self.visible.len().saturating_sub(height);
        let offset = match self.selection {
            None => 0,
            Some(sel) if sel < self.offset => sel,
            Some(sel) if sel >= self.offset + height => sel + 1 - height,
            Some(_) => self.offset,
        };
        Self {
            offset: offset.min(max_offset),
            ..self
        }
    }

    fn rederive(self) -> Self {
        let visible = filter_entries(&self.all_entries, self.view_mode, &self.query, self.sort_key);
        let selection = clamp_selection(self.selection, visible.len());
        Self {
            visible,
            selection,
            ..self
        }
    }
}

/// Which of the two panes is meant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn other(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }
}

/// The left and right panes plus the active side.
#[derive(Debug, Clone)]
pub struct Panes {
    left: Pane,
    right: Pane,
    active: Side,
}

impl Panes {
    /// Both panes start as copies of `pane`; the left one is active.
    pub fn new(pane: Pane) -> Self {
        Self {
            left: pane.clone(),
            right: pane,
            active: Side::Left,
        }
    }

    pub fn left(&self) -> &Pane {
        &self.left
    }

    pub fn right(&self) -> &Pane {
        &self.right
    }

    pub fn get(&self, side: Side) -> &Pane {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    pub fn active_side(&self) -> Side {
        self.active
    }

    pub fn active(&self) -> &Pane {
        self.get(self.active)
    }

    /// Makes the other pane active.
    pub fn swap_active(self) -> Self {
        Self {
            active: self.active.other(),
            ..self
        }
    }

    /// Replaces the active pane with `f(active)`.
    pub fn update_active(&mut self, f: impl FnOnce(Pane) -> Pane) {
        let slot = match self.active {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        };
        *slot = f(std::mem::take(slot));
    }

    /// Applies `f` to both panes.
    pub fn update_both(&mut self, f: impl Fn(Pane) -> Pane) {
        self.left = f(std::mem::take(&mut self.left));
        self.right = f(std::mem::take(&mut self.right));
    }
}
