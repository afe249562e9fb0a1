//! File-level preview helpers.
//!
//! Text detection, bounded text reads, image thumbnails and the info block
//! shown when previews are turned off. The [`crate::preview`] controller
//! decides *which* of these to use for a selection.

use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use image::ImageFormat;
use tempfile::NamedTempFile;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Bytes inspected when deciding whether a file is text.
pub const TEXT_PROBE_SIZE: usize = 4096;

/// Hard cap on text preview lines regardless of the viewport height.
pub const MAX_TEXT_LINES: usize = 40;

/// Largest image file (in bytes) that will be thumbnailed.
pub const MAX_IMAGE_BYTES: u64 = 20 * 1024 * 1024;

/// Bounding box of generated thumbnails, in pixels.
pub const THUMBNAIL_SIZE: u32 = 300;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff", "tif"];

/// Returns `true` if the file looks like text.
///
/// Reads up to [`TEXT_PROBE_SIZE`] bytes and reports binary as soon as a NUL
/// byte is seen. Empty files are text; files that cannot be opened are not.
pub fn is_text(path: &Path) -> bool {
    let Ok(mut file) = fs::File::open(path) else {
        return false;
    };
    let mut buf = [0u8; TEXT_PROBE_SIZE];
    match file.read(&mut buf) {
        Ok(n) => !buf[..n].contains(&0),
        Err(_) => false,
    }
}

/// Reads at most `max_lines` lines of a text file with control sequences
/// stripped.
///
/// # Errors
///
/// Returns [`CoreError::NotFound`] / [`CoreError::PermissionDenied`] when the
/// file cannot be opened and [`CoreError::Io`] on read failures.
pub fn read_text_lines(path: &Path, max_lines: usize) -> CoreResult<Vec<String>> {
    let file = fs::File::open(path).map_err(|e| CoreError::from_io(e, path))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::with_capacity(max_lines.min(64));
    for line in reader.lines().take(max_lines) {
        lines.push(strip_ansi_escapes(&line?));
    }
    Ok(lines)
}

/// Returns `true` if the extension is one the thumbnailer understands.
pub fn is_image_path(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|ext| {
            let ext = ext.to_ascii_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

/// Decodes the image at `path`, shrinks it to fit [`THUMBNAIL_SIZE`] while
/// keeping its aspect ratio, and writes it as JPEG to a fresh temp file.
///
/// The returned file is removed when dropped.
///
/// # Errors
///
/// Returns [`CoreError::Image`] when decoding or encoding fails and
/// [`CoreError::Io`] when the temp file cannot be created.
pub fn make_thumbnail(path: &Path) -> CoreResult<NamedTempFile> {
    let img = image::open(path).map_err(|e| CoreError::Image(e.to_string()))?;
    let thumb = img.thumbnail(THUMBNAIL_SIZE, THUMBNAIL_SIZE);
    let rgb = image::DynamicImage::ImageRgb8(thumb.to_rgb8());

    let mut file = tempfile::Builder::new()
        .prefix("sift-thumb-")
        .suffix(".jpg")
        .tempfile()?;
    rgb.write_to(file.as_file_mut(), ImageFormat::Jpeg)
        .map_err(|e| CoreError::Image(e.to_string()))?;

    tracing::debug!(
        source = %path.display(),
        thumb = %file.path().display(),
        width = rgb.width(),
        height = rgb.height(),
        "thumbnail written"
    );
    Ok(file)
}

/// Best-effort MIME type for an entry.
pub fn mime_type(entry: &FileEntry) -> String {
    if entry.is_dir() {
        return "inode/directory".to_string();
    }
    mime_guess::from_path(entry.path())
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// One-line description of a file that has no richer preview.
pub fn binary_summary(entry: &FileEntry) -> String {
    format!(
        "Binary file ({}, {})",
        mime_type(entry),
        entry.size_display()
    )
}

/// One row of the decoded permission table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccessRow {
    pub who: &'static str,
    pub read: bool,
    pub write: bool,
    pub execute: bool,
}

/// Metadata block shown in the side panel when previews are off.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryInfo {
    pub fields: Vec<(&'static str, String)>,
    /// `"Traverse"` for directories, `"Execute"` otherwise.
    pub execute_label: &'static str,
    pub access: [AccessRow; 3],
}

impl EntryInfo {
    pub fn from_entry(entry: &FileEntry) -> Self {
        let fields = vec![
            ("Name", entry.name().to_string()),
            ("Path", entry.path().display().to_string()),
            ("Type", entry.kind().label().to_string()),
            ("MIME", mime_type(entry)),
            ("Size", entry.size_display().to_string()),
            ("Owner", entry.owner().to_string()),
            ("Group", entry.group().to_string()),
            ("Modified", entry.modified_display().to_string()),
            ("Permissions", entry.permissions().to_string()),
        ];

        let mode = entry.mode();
        let row = |who, shift: u32| AccessRow {
            who,
            read: mode & (0o4 << shift) != 0,
            write: mode & (0o2 << shift) != 0,
            execute: mode & (0o1 << shift) != 0,
        };

        Self {
            fields,
            execute_label: if entry.is_dir() { "Traverse" } else { "Execute" },
            access: [row("Owner", 6), row("Group", 3), row("Other", 0)],
        }
    }

    /// Renders the block as plain lines.
    pub fn to_lines(&self) -> Vec<String> {
        let width = self.fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);
        let mut lines: Vec<String> = self
            .fields
            .iter()
            .map(|(k, v)| format!("{k:<width$}  {v}"))
            .collect();

        lines.push(String::new());
        lines.push(format!(
            "{:<6} {:<5} {:<5} {}",
            "", "Read", "Write", self.execute_label
        ));
        let mark = |b: bool| if b { "yes" } else { "no" };
        for row in &self.access {
            lines.push(format!(
                "{:<6} {:<5} {:<5} {}",
                row.who,
                mark(row.read),
                mark(row.write),
                mark(row.execute)
            ));
        }
        lines
    }
}

/// Strips ANSI escape sequences and other control characters from a line.
///
/// CSI (`ESC [ ... letter`) and OSC (`ESC ] ... BEL|ST`) sequences are
/// removed whole, tabs become four spaces.
pub fn strip_ansi_escapes(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '\x1b' => match chars.next() {
                Some('[') => {
                    for next in chars.by_ref() {
                        if next.is_ascii_alphabetic() {
                            break;
                        }
                    }
                }
                Some(']') => {
                    while let Some(next) = chars.next() {
                        if next == '\x07' {
                            break;
                        }
                        if next == '\x1b' && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                }
                _ => {}
            },
            '\t' => out.push_str("    "),
            c if c.is_control() => {}
            c => out.push(c),
        }
    }

    out
}
