//! Nerd Font icon mapping for file entries.
//!
//! Non-regular entries get an icon for their kind; regular files are looked
//! up by special filename first and then by extension.

use sift_core::{EntryKind, FileEntry};

const DEFAULT_ICON: &str = "\u{f15b} ";

/// Returns a Nerd Font icon for the given file entry.
pub fn icon_for_entry(entry: &FileEntry) -> &'static str {
    match entry.kind() {
        EntryKind::Directory => return "\u{f07b} ",
        EntryKind::Symlink => return "\u{f0c1} ",
        EntryKind::Socket => return "\u{f1e6} ",
        EntryKind::Pipe => return "\u{f124} ",
        EntryKind::Device => return "\u{f0a0} ",
        EntryKind::Executable | EntryKind::File => {}
    }

    if let Some(icon) = icon_for_filename(entry.name()) {
        return icon;
    }

    let ext = entry
        .path()
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    match icon_for_extension(ext) {
        Some(icon) => icon,
        None if entry.kind() == EntryKind::Executable => "\u{f489} ",
        None => DEFAULT_ICON,
    }
}

/// Plain-text marker used when icons are turned off.
pub fn marker_for_entry(entry: &FileEntry) -> &'static str {
    match entry.kind() {
        EntryKind::Directory => "/",
        EntryKind::Symlink => "@",
        EntryKind::Socket => "=",
        EntryKind::Pipe => "|",
        EntryKind::Executable => "*",
        EntryKind::Device | EntryKind::File => " ",
    }
}

fn icon_for_filename(name: &str) -> Option<&'static str> {
    let icon = match name.to_lowercase().as_str() {
        "makefile" | "gnumakefile" => "\u{e779} ",
        "dockerfile" => "\u{f308} ",
        "cargo.toml" | "cargo.lock" => "\u{e7a8} ",
        ".gitignore" | ".gitmodules" | ".gitattributes" => "\u{e702} ",
        "license" | "license.md" | "license.txt" => "\u{f0219} ",
        "readme.md" | "readme" | "readme.txt" => "\u{e73e} ",
        _ => return None,
    };
    Some(icon)
}

fn icon_for_extension(ext: &str) -> Option<&'static str> {
    let icon = match ext.to_lowercase().as_str() {
        "rs" => "\u{e7a8} ",
        "py" | "pyw" | "pyi" => "\u{e73c} ",
        "js" | "mjs" | "cjs" => "\u{e74e} ",
        "ts" | "mts" | "cts" => "\u{e628} ",
        "go" => "\u{e724} ",
        "c" | "h" => "\u{e61e} ",
        "cpp" | "cc" | "cxx" | "hpp" => "\u{e61d} ",
        "lua" => "\u{e620} ",
        "sh" | "bash" | "zsh" | "fish" => "\u{f489} ",
        "toml" | "ini" | "cfg" | "conf" => "\u{e615} ",
        "yaml" | "yml" => "\u{e6a8} ",
        "json" => "\u{e60b} ",
        "html" | "htm" => "\u{e736} ",
        "css" | "scss" => "\u{e749} ",
        "md" | "markdown" => "\u{e73e} ",
        "txt" | "log" => "\u{f15c} ",
        "pdf" => "\u{f1c1} ",
        "zip" | "tar" | "gz" | "bz2" | "xz" | "7z" | "zst" => "\u{f410} ",
        "png" | "jpg" | "jpeg" | "gif" | "bmp" | "webp" | "tiff" | "tif" | "ico" => "\u{f1c5} ",
        "mp3" | "wav" | "flac" | "ogg" => "\u{f001} ",
        "mp4" | "mkv" | "mov" | "webm" => "\u{f03d} ",
        "lock" => "\u{f023} ",
        _ => return None,
    };
    Some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn make_file(tmp: &TempDir, name: &str) -> FileEntry {
        let path = tmp.path().join(name);
        fs::write(&path, "").unwrap();
        let meta = fs::symlink_metadata(&path).unwrap();
        FileEntry::new(path, &meta)
    }

    fn make_dir(tmp: &TempDir, name: &str) -> FileEntry {
        let path = tmp.path().join(name);
        fs::create_dir(&path).unwrap();
        let meta = fs::symlink_metadata(&path).unwrap();
        FileEntry::new(path, &meta)
    }

    #[test]
    fn dir_gets_folder_icon() {
        let tmp = TempDir::new().unwrap();
        let entry = make_dir(&tmp, "src");
        assert_eq!(icon_for_entry(&entry), "\u{f07b} ");
        assert_eq!(marker_for_entry(&entry), "/");
    }

    #[test]
    fn rust_file_gets_rust_icon() {
        let tmp = TempDir::new().unwrap();
        let entry = make_file(&tmp, "main.rs");
        assert_eq!(icon_for_entry(&entry), "\u{e7a8} ");
    }

    #[test]
    fn unknown_ext_gets_default_icon() {
        let tmp = TempDir::new().unwrap();
        let entry = make_file(&tmp, "data.xyz");
        assert_eq!(icon_for_entry(&entry), DEFAULT_ICON);
        assert_eq!(marker_for_entry(&entry), " ");
    }

    #[test]
    fn special_filename_wins_over_extension() {
        let tmp = TempDir::new().unwrap();
        let entry = make_file(&tmp, "README.md");
        assert_eq!(icon_for_entry(&entry), "\u{e73e} ");
        let entry = make_file(&tmp, "Dockerfile");
        assert_eq!(icon_for_entry(&entry), "\u{f308} ");
    }

    #[test]
    fn executable_without_extension_gets_shell_icon() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("run");
        fs::write(&path, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        let entry = FileEntry::new(path.clone(), &fs::symlink_metadata(&path).unwrap());
        assert_eq!(icon_for_entry(&entry), "\u{f489} ");
        assert_eq!(marker_for_entry(&entry), "*");
    }

    #[test]
    fn symlink_gets_link_icon() {
        let tmp = TempDir::new().unwrap();
        let target = tmp.path().join("target.txt");
        fs::write(&target, "").unwrap();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(&target, &link).unwrap();
        let entry = FileEntry::new(link.clone(), &fs::symlink_metadata(&link).unwrap());
        assert_eq!(icon_for_entry(&entry), "\u{f0c1} ");
        assert_eq!(marker_for_entry(&entry), "@");
    }
}
