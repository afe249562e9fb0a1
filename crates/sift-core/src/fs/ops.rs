//! File system operations: directory listing and the primitives behind the
//! built-in commands (`touch`, `mkdir`, `rm`, `mv`, `cp`, `ln`).

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use crate::error::{CoreError, CoreResult};
use crate::fs::entry::FileEntry;

/// Reads the immediate contents of a directory and returns them as [`FileEntry`] values.
///
/// Entries are stat'ed without following symlinks. Entries whose stat fails
/// are skipped. The returned entries are **unsorted**; use
/// [`crate::nav::filter::filter_entries`] to derive a sorted view.
///
/// # Errors
///
/// - [`CoreError::NotFound`]: the path does not exist.
/// - [`CoreError::NotADirectory`]: the path is not a directory.
/// - [`CoreError::PermissionDenied`]: read access is denied.
/// - [`CoreError::Io`]: any other I/O error.
///
/// # Examples
///
/// ```no_run
/// use sift_core::read_directory;
/// use std::path::Path;
///
/// let entries = read_directory(Path::new("/home/user")).unwrap();
/// for entry in &entries {
///     println!("{} {}", entry.permissions(), entry.name());
/// }
/// ```
pub fn read_directory(path: &Path) -> CoreResult<Vec<FileEntry>> {
    let meta = fs::metadata(path).map_err(|e| CoreError::from_io(e, path))?;
    if !meta.is_dir() {
        return Err(CoreError::NotADirectory(path.to_path_buf()));
    }

    let read_dir = fs::read_dir(path).map_err(|e| CoreError::from_io(e, path))?;

    let mut entries = Vec::new();
    for dir_entry in read_dir {
        let Ok(dir_entry) = dir_entry else { continue };
        // DirEntry::metadata does not traverse symlinks on unix.
        let Ok(metadata) = dir_entry.metadata() else {
            continue;
        };
        entries.push(FileEntry::new(dir_entry.path(), &metadata));
    }

    tracing::debug!(path = %path.display(), count = entries.len(), "read directory");
    Ok(entries)
}

/// Returns the destination for `mv`/`cp`/`ln`: `dest/basename(src)` when
/// `dest` is an existing directory, otherwise `dest` itself.
pub fn into_dir_target(src: &Path, dest: &Path) -> PathBuf {
    if dest.is_dir() {
        if let Some(name) = src.file_name() {
            return dest.join(name);
        }
    }
    dest.to_path_buf()
}

/// Creates `path` if it does not exist, otherwise bumps its modification time.
pub fn touch(path: &Path) -> CoreResult<()> {
    let file = fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| CoreError::from_io(e, path))?;
    file.set_modified(SystemTime::now())?;
    Ok(())
}

/// Creates `path` and all missing parents.
pub fn make_dirs(path: &Path) -> CoreResult<()> {
    fs::create_dir_all(path).map_err(|e| CoreError::from_io(e, path))
}

/// Deletes a file or directory (recursively, like `rm -r`).
///
/// Symlinks are removed, never followed.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `path` does not exist.
/// - [`CoreError::Io`] for any I/O failure during deletion.
pub fn remove_path(path: &Path) -> CoreResult<()> {
    let meta = fs::symlink_metadata(path).map_err(|e| CoreError::from_io(e, path))?;

    if meta.is_dir() {
        fs::remove_dir_all(path).map_err(|e| CoreError::from_io(e, path))?;
    } else {
        fs::remove_file(path).map_err(|e| CoreError::from_io(e, path))?;
    }

    Ok(())
}

/// Renames `src` to `dest`, moving it into `dest` when that is a directory.
///
/// Returns the final path. Directories are accepted.
pub fn move_path(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    fs::symlink_metadata(src).map_err(|e| CoreError::from_io(e, src))?;
    let target = into_dir_target(src, dest);
    fs::rename(src, &target).map_err(|e| CoreError::from_io(e, src))?;
    Ok(target)
}

/// Copies a single regular file, preserving its permission bits.
///
/// Returns the final path. Directories are refused; there is no recursive
/// copy.
///
/// # Errors
///
/// - [`CoreError::NotFound`] if `src` does not exist.
/// - [`CoreError::IsADirectory`] if `src` is a directory.
/// - [`CoreError::Io`] for any I/O failure during copy.
pub fn copy_regular_file(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    let meta = fs::metadata(src).map_err(|e| CoreError::from_io(e, src))?;
    if meta.is_dir() {
        return Err(CoreError::IsADirectory(src.to_path_buf()));
    }

    let target = into_dir_target(src, dest);
    // fs::copy copies the permission bits along with the contents.
    fs::copy(src, &target).map_err(|e| CoreError::from_io(e, &target))?;
    fs::set_permissions(&target, meta.permissions())?;
    Ok(target)
}

/// Creates a hard link to `src` at `dest` (or inside it, when a directory).
pub fn hard_link(src: &Path, dest: &Path) -> CoreResult<PathBuf> {
    let target = into_dir_target(src, dest);
    fs::hard_link(src, &target).map_err(|e| CoreError::from_io(e, src))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    fn setup() -> TempDir {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join("a.txt"), "aaa").unwrap();
        fs::write(tmp.path().join(".hidden"), "h").unwrap();
        fs::create_dir(tmp.path().join("docs")).unwrap();
        tmp
    }

    #[test]
    fn read_directory_lists_all_entries() {
        let tmp = setup();
        let entries = read_directory(tmp.path()).unwrap();
        let mut names: Vec<&str> = entries.iter().map(|e| e.name()).collect();
        names.sort();
        assert_eq!(names, vec![".hidden", "a.txt", "docs"]);
    }

    #[test]
    fn read_directory_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(read_directory(tmp.path()).unwrap().is_empty());
    }

    #[test]
    fn read_directory_missing_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = read_directory(&tmp.path().join("nope")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn read_directory_on_file_is_not_a_directory() {
        let tmp = setup();
        let err = read_directory(&tmp.path().join("a.txt")).unwrap_err();
        assert!(matches!(err, CoreError::NotADirectory(_)));
    }

    #[test]
    fn read_directory_keeps_dangling_symlink() {
        let tmp = TempDir::new().unwrap();
        std::os::unix::fs::symlink(tmp.path().join("missing"), tmp.path().join("dangling"))
            .unwrap();
        let entries = read_directory(tmp.path()).unwrap();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].is_symlink());
    }

    #[test]
    fn into_dir_target_existing_dir() {
        let tmp = setup();
        let target = into_dir_target(&tmp.path().join("a.txt"), &tmp.path().join("docs"));
        assert_eq!(target, tmp.path().join("docs").join("a.txt"));
    }

    #[test]
    fn into_dir_target_new_name() {
        let tmp = setup();
        let target = into_dir_target(&tmp.path().join("a.txt"), &tmp.path().join("b.txt"));
        assert_eq!(target, tmp.path().join("b.txt"));
    }

    #[test]
    fn touch_creates_and_updates() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("new.txt");
        touch(&path).unwrap();
        assert!(path.is_file());

        fs::write(&path, "keep").unwrap();
        touch(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "keep");
    }

    #[test]
    fn make_dirs_creates_parents() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("x").join("y");
        make_dirs(&path).unwrap();
        assert!(path.is_dir());
    }

    #[test]
    fn remove_path_file_and_dir() {
        let tmp = setup();
        fs::write(tmp.path().join("docs").join("inner.md"), "x").unwrap();

        remove_path(&tmp.path().join("a.txt")).unwrap();
        remove_path(&tmp.path().join("docs")).unwrap();

        assert!(!tmp.path().join("a.txt").exists());
        assert!(!tmp.path().join("docs").exists());
    }

    #[test]
    fn remove_path_missing() {
        let tmp = TempDir::new().unwrap();
        let err = remove_path(&tmp.path().join("ghost")).unwrap_err();
        assert!(matches!(err, CoreError::NotFound(_)));
    }

    #[test]
    fn remove_symlink_keeps_target() {
        let tmp = setup();
        let link = tmp.path().join("link");
        std::os::unix::fs::symlink(tmp.path().join("docs"), &link).unwrap();
        remove_path(&link).unwrap();
        assert!(tmp.path().join("docs").is_dir());
    }

    #[test]
    fn move_round_trip_restores_path() {
        let tmp = setup();
        let s = tmp.path().join("a.txt");
        let d = tmp.path().join("renamed.txt");

        let moved = move_path(&s, &d).unwrap();
        assert_eq!(moved, d);
        assert!(!s.exists());

        let back = move_path(&d, &s).unwrap();
        assert_eq!(back, s);
        assert_eq!(fs::read_to_string(&s).unwrap(), "aaa");
    }

    #[test]
    fn move_into_directory() {
        let tmp = setup();
        let target = move_path(&tmp.path().join("a.txt"), &tmp.path().join("docs")).unwrap();
        assert_eq!(target, tmp.path().join("docs").join("a.txt"));
        assert!(target.is_file());
    }

    #[test]
    fn move_accepts_directories() {
        let tmp = setup();
        let target = move_path(&tmp.path().join("docs"), &tmp.path().join("papers")).unwrap();
        assert!(target.is_dir());
    }

    #[test]
    fn copy_preserves_mode() {
        let tmp = setup();
        let src = tmp.path().join("script.sh");
        fs::write(&src, "#!/bin/sh\n").unwrap();
        fs::set_permissions(&src, fs::Permissions::from_mode(0o750)).unwrap();

        let dest = copy_regular_file(&src, &tmp.path().join("copy.sh")).unwrap();

        let src_mode = fs::metadata(&src).unwrap().permissions().mode() & 0o777;
        let dest_mode = fs::metadata(&dest).unwrap().permissions().mode() & 0o777;
        assert_eq!(src_mode, dest_mode);
        assert_eq!(fs::read_to_string(&dest).unwrap(), "#!/bin/sh\n");
    }

    #[test]
    fn copy_into_directory() {
        let tmp = setup();
        let dest = copy_regular_file(&tmp.path().join("a.txt"), &tmp.path().join("docs")).unwrap();
        assert_eq!(dest, tmp.path().join("docs").join("a.txt"));
        assert!(tmp.path().join("a.txt").exists());
    }

    #[test]
    fn copy_refuses_directories() {
        let tmp = setup();
        let err = copy_regular_file(&tmp.path().join("docs"), &tmp.path().join("docs2"))
            .unwrap_err();
        assert!(matches!(err, CoreError::IsADirectory(_)));
        assert!(!tmp.path().join("docs2").exists());
    }

    #[test]
    fn hard_link_shares_content() {
        let tmp = setup();
        let link = hard_link(&tmp.path().join("a.txt"), &tmp.path().join("docs")).unwrap();
        assert_eq!(link, tmp.path().join("docs").join("a.txt"));
        assert_eq!(fs::read_to_string(&link).unwrap(), "aaa");
    }
}
