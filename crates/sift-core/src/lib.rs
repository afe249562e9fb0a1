//! sift core library: UI-agnostic file manager logic.
//!
//! `sift-core` holds everything that does not need a terminal: directory
//! snapshots, filtering and sorting, the command language, the modal state
//! machine and the side-panel preview controller. The `sift` binary in
//! `sift-tui` drives these types from its event loop.
//!
//! # Modules
//!
//! - [`fs`]: [`FileEntry`] snapshots, directory reads, file primitives, path resolution.
//! - [`nav`]: panes, view-mode and substring filtering, sorting, command history.
//! - [`command`]: built-in commands, user aliases and the external shell.
//! - [`mode`]: input modes and the single-slot previous mode.
//! - [`preview`]: debounced side-panel preview state machine.
//! - [`action`] and [`config`]: actions, key bindings, settings and theme.
//! - [`error`]: [`CoreError`], [`CommandError`] and [`CoreResult`].

pub mod action;
pub mod command;
pub mod config;
pub mod error;
pub mod fs;
pub mod mode;
pub mod nav;
pub mod preview;

pub use error::{CommandError, CoreError, CoreResult};
pub use fs::ops::read_directory;
pub use fs::{EntryInfo, EntryKind, FileEntry};
pub use nav::filter::{Column, ColumnSet, Direction, SortKey, ViewMode};
pub use nav::history::CommandHistory;
pub use nav::pane::{Edge, Pane, Panes, Side};

pub use action::{Action, ActionCategory, ActionDescriptor, ActionRegistry};
pub use command::{Effect, LoginShell, Shell, UserCommand, UserCommands};
pub use config::keymap::Keymap;
pub use config::settings::{Config, ConfigPaths, SplitView};
pub use config::theme::{parse_color, Theme};
pub use mode::{Mode, ModeState};
pub use preview::{
    CellRect, GraphicsSupport, PreviewContent, PreviewController, PreviewEffect, PreviewLimits,
    PreviewRequest,
};
