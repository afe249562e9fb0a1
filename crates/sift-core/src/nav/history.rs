//! Persistent command-line history.
//!
//! One line per submitted command, appended to a plain UTF-8 file. The
//! in-memory copy supports prefix completion and cyclic up/down browsing.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::{CoreError, CoreResult};

/// Steps `current` by `step` through `len` items, wrapping at both ends.
///
/// `None` means "not browsing yet": a backward step starts at the last
/// item and a forward step at the first.
pub fn cycle_index(current: Option<usize>, len: usize, step: isize) -> Option<usize> {
    if len == 0 {
        return None;
    }
    let len_i = len as isize;
    let next = match current {
        None if step < 0 => len_i - 1,
        None => 0,
        Some(i) => (i as isize + step).rem_euclid(len_i),
    };
    Some(next as usize)
}

/// Command history backed by an append-only file.
#[derive(Debug, Clone, Default)]
pub struct CommandHistory {
    path: Option<PathBuf>,
    entries: Vec<String>,
    cursor: Option<usize>,
}

impl CommandHistory {
    /// A history that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Loads the history file at `path`.
    ///
    /// A missing file yields an empty history; other read errors are logged
    /// and also yield an empty history. Lines are trimmed and empty lines
    /// dropped.
    pub fn load(path: &Path) -> Self {
        let entries = match fs::read_to_string(path) {
            Ok(text) => text
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string)
                .collect(),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "failed to read history");
                Vec::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            entries,
            cursor: None,
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records a submitted line.
    ///
    /// Empty lines and repeats of the most recent line are ignored. The
    /// browse cursor is reset either way.
    ///
    /// # Errors
    ///
    /// Returns a [`CoreError`] if the history file cannot be opened or
    /// written; the in-memory entry is kept regardless.
    pub fn append(&mut self, line: &str) -> CoreResult<()> {
        self.cursor = None;
        let line = line.trim();
        if line.is_empty() || self.entries.last().map(String::as_str) == Some(line) {
            return Ok(());
        }
        self.entries.push(line.to_string());

        let Some(path) = &self.path else {
            return Ok(());
        };
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| CoreError::from_io(e, parent))?;
        }
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .map_err(|e| CoreError::from_io(e, path))?;
        writeln!(file, "{line}")?;
        Ok(())
    }

    /// Entries starting with `prefix` (case-insensitive), most recent
    /// first, without duplicates.
    pub fn matches(&self, prefix: &str) -> Vec<String> {
        let prefix = prefix.to_lowercase();
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .rev()
            .filter(|e| e.to_lowercase().starts_with(&prefix))
            .filter(|e| seen.insert(e.as_str()))
            .cloned()
            .collect()
    }

    /// Moves the browse cursor one entry back in time (wrapping).
    pub fn previous(&mut self) -> Option<&str> {
        self.step(-1)
    }

    /// Moves the browse cursor one entry forward in time (wrapping).
    pub fn next(&mut self) -> Option<&str> {
        self.step(1)
    }

    pub fn reset_cursor(&mut self) {
        self.cursor = None;
    }

    fn step(&mut self, step: isize) -> Option<&str> {
        self.cursor = cycle_index(self.cursor, self.entries.len(), step);
        self.cursor.map(|i| self.entries[i].as_str())
    }
}
