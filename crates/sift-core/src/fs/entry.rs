//! File entry representation.
//!
//! A [`FileEntry`] is an immutable snapshot of one directory entry with all
//! of its display strings (permissions, size, owner, group, date) computed
//! up front, so that sorting and rendering never touch the file system.

use std::os::unix::fs::MetadataExt;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use chrono::{DateTime, Local};
use unicode_normalization::UnicodeNormalization;

const S_IFMT: u32 = 0o170_000;
const S_IFSOCK: u32 = 0o140_000;
const S_IFLNK: u32 = 0o120_000;
const S_IFBLK: u32 = 0o060_000;
const S_IFDIR: u32 = 0o040_000;
const S_IFCHR: u32 = 0o020_000;
const S_IFIFO: u32 = 0o010_000;

/// Name used when a uid or gid has no matching account.
pub const UNKNOWN_OWNER: &str = "unknown";

/// Classified type of an entry, derived from its mode bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    Directory,
    Symlink,
    Socket,
    Pipe,
    Device,
    Executable,
    File,
}

impl EntryKind {
    /// Classifies raw `st_mode` bits.
    ///
    /// Priority: directory > symlink > socket > pipe > device > executable
    /// (any execute bit on a non-directory) > file.
    pub fn from_mode(mode: u32) -> Self {
        match mode & S_IFMT {
            S_IFDIR => Self::Directory,
            S_IFLNK => Self::Symlink,
            S_IFSOCK => Self::Socket,
            S_IFIFO => Self::Pipe,
            S_IFCHR | S_IFBLK => Self::Device,
            _ if mode & 0o111 != 0 => Self::Executable,
            _ => Self::File,
        }
    }

    /// Lower-case label shown in the Type column.
    pub fn label(self) -> &'static str {
        match self {
            Self::Directory => "directory",
            Self::Symlink => "symlink",
            Self::Socket => "socket",
            Self::Pipe => "pipe",
            Self::Device => "device",
            Self::Executable => "executable",
            Self::File => "file",
        }
    }
}

/// Raw stat fields needed to build a [`FileEntry`].
///
/// Produced from [`std::fs::Metadata`] by [`FileEntry::new`]; constructing one
/// by hand is useful for entries that do not come from the local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStat {
    pub mode: u32,
    pub size: u64,
    pub modified: Option<SystemTime>,
    pub owner: String,
    pub group: String,
}

/// A single file or directory entry.
///
/// `FileEntry` is immutable; create new instances via [`FileEntry::new`]
/// or [`FileEntry::from_stat`] rather than mutating existing ones.
/// Directory sizes are reported as `0` and displayed as `"-"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    name: String,
    kind: EntryKind,
    is_dir: bool,
    mode: u32,
    permissions: String,
    owner: String,
    group: String,
    size: u64,
    size_display: String,
    modified: Option<SystemTime>,
    modified_display: String,
}

impl FileEntry {
    /// Creates a new `FileEntry` from a path and its (non-following) metadata.
    ///
    /// Owner and group names are looked up from the uid/gid; failed lookups
    /// yield [`UNKNOWN_OWNER`].
    pub fn new(path: PathBuf, metadata: &std::fs::Metadata) -> Self {
        let stat = RawStat {
            mode: metadata.mode(),
            size: metadata.len(),
            modified: metadata.modified().ok(),
            owner: user_name(metadata.uid()),
            group: group_name(metadata.gid()),
        };
        Self::from_stat(path, stat)
    }

    /// Creates a `FileEntry` from already-collected stat fields.
    pub fn from_stat(path: PathBuf, stat: RawStat) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().nfc().collect::<String>())
            .unwrap_or_else(|| path.display().to_string());
        let kind = EntryKind::from_mode(stat.mode);
        let is_dir = kind == EntryKind::Directory;
        let size = if is_dir { 0 } else { stat.size };
        let size_display = if is_dir {
            "-".to_string()
        } else {
            format_size(size)
        };
        let modified_display = stat
            .modified
            .map(format_modified)
            .unwrap_or_else(|| "-".to_string());

        Self {
            path,
            name,
            kind,
            is_dir,
            mode: stat.mode,
            permissions: format_permissions(stat.mode),
            owner: stat.owner,
            group: stat.group,
            size,
            size_display,
            modified: stat.modified,
            modified_display,
        }
    }

    /// Returns the full path of this entry.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the file or directory name (last component of the path).
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> EntryKind {
        self.kind
    }

    /// Returns `true` if this entry is a directory.
    pub fn is_dir(&self) -> bool {
        self.is_dir
    }

    /// Returns `true` if the name starts with `.`.
    pub fn is_hidden(&self) -> bool {
        self.name.starts_with('.')
    }

    /// Returns `true` if this entry is a symbolic link.
    pub fn is_symlink(&self) -> bool {
        self.kind == EntryKind::Symlink
    }

    /// Raw `st_mode` bits.
    pub fn mode(&self) -> u32 {
        self.mode
    }

    /// The ten-character `ls -l` style permission string.
    pub fn permissions(&self) -> &str {
        &self.permissions
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the file size in bytes. Always `0` for directories.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// Human-readable size (`"-"` for directories).
    pub fn size_display(&self) -> &str {
        &self.size_display
    }

    /// Returns the last-modified time, if available.
    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Modified time formatted as `"DD Mon HH:MM"` in local time.
    pub fn modified_display(&self) -> &str {
        &self.modified_display
    }
}

/// Formats a byte count with base-1000 units: `999`, `1.5k`, `2.0M`, ...
pub fn format_size(bytes: u64) -> String {
    const UNITS: [char; 4] = ['k', 'M', 'G', 'T'];

    if bytes < 1000 {
        return bytes.to_string();
    }

    let mut value = bytes as f64 / 1000.0;
    for (i, unit) in UNITS.iter().enumerate() {
        if value < 1000.0 || i == UNITS.len() - 1 {
            return format!("{value:.1}{unit}");
        }
        value /= 1000.0;
    }
    unreachable!("the last unit always returns")
}

/// Formats mode bits as a type character followed by nine `rwx` flags.
pub fn format_permissions(mode: u32) -> String {
    let type_char = match mode & S_IFMT {
        S_IFDIR => 'd',
        S_IFLNK => 'l',
        S_IFSOCK => 's',
        S_IFIFO => 'p',
        S_IFCHR => 'c',
        S_IFBLK => 'b',
        _ => '-',
    };

    let mut out = String::with_capacity(10);
    out.push(type_char);
    for shift in [6u32, 3, 0] {
        let bits = (mode >> shift) & 0o7;
        out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
        out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
        out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
    }
    out
}

/// Formats a timestamp as `"02 Jan 15:04"` in the local time zone.
pub fn format_modified(time: SystemTime) -> String {
    let local: DateTime<Local> = time.into();
    local.format("%d %b %H:%M").to_string()
}

fn user_name(uid: u32) -> String {
    uzers::get_user_by_uid(uid)
        .map(|u| u.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_OWNER.to_string())
}

fn group_name(gid: u32) -> String {
    uzers::get_group_by_gid(gid)
        .map(|g| g.name().to_string_lossy().into_owned())
        .unwrap_or_else(|| UNKNOWN_OWNER.to_string())
}
