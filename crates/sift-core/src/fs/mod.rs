//! File system access for sift.
//!
//! [`entry::FileEntry`] snapshots, directory reads and file primitives in
//! [`ops`], path resolution in [`path`], and file-level preview helpers in
//! [`preview`].

pub mod entry;
pub mod ops;
pub mod path;
pub mod preview;

pub use entry::{EntryKind, FileEntry};
pub use preview::EntryInfo;
