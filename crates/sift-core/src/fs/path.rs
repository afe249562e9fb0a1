//! Path resolution against a working directory.
//!
//! Expands a leading `~` and joins relative paths onto a base directory.
//! Symlinks are never evaluated; the result is purely lexical.

use std::path::{Path, PathBuf};

/// Returns the current user's home directory, if it can be determined.
pub fn home_dir() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|dirs| dirs.home_dir().to_path_buf())
}

/// Resolves `input` against `cwd` using the current user's home directory.
///
/// See [`resolve_with_home`] for the rules.
pub fn resolve(input: &str, cwd: &Path) -> PathBuf {
    resolve_with_home(input, cwd, home_dir().as_deref())
}

/// Resolves `input` against `cwd`, expanding `~` to `home`.
///
/// Rules, applied in order:
///
/// 1. empty input resolves to `cwd`;
/// 2. `~` alone resolves to `home`, `~/rest` to `home/rest`;
/// 3. absolute paths are returned unchanged;
/// 4. anything else is joined onto `cwd`.
///
/// When `home` is `None` a `~`-prefixed input is returned unchanged.
pub fn resolve_with_home(input: &str, cwd: &Path, home: Option<&Path>) -> PathBuf {
    if input.is_empty() {
        return cwd.to_path_buf();
    }

    if input == "~" || input.starts_with("~/") {
        return match home {
            Some(home) => match input.strip_prefix("~/") {
                Some(rest) if !rest.is_empty() => home.join(rest),
                _ => home.to_path_buf(),
            },
            None => PathBuf::from(input),
        };
    }

    let path = Path::new(input);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        cwd.join(path)
    }
}

/// Replaces a leading home directory with `~` for display.
pub fn abbreviate_home(path: &Path, home: Option<&Path>) -> String {
    match home.and_then(|h| path.strip_prefix(h).ok()) {
        Some(rest) if rest.as_os_str().is_empty() => "~".to_string(),
        Some(rest) => format!("~/{}", rest.display()),
        None => path.display().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOME: &str = "/home/alice";
    const CWD: &str = "/srv/data";

    fn res(input: &str) -> PathBuf {
        resolve_with_home(input, Path::new(CWD), Some(Path::new(HOME)))
    }

    #[test]
    fn empty_is_cwd() {
        assert_eq!(res(""), PathBuf::from(CWD));
    }

    #[test]
    fn tilde_alone_is_home() {
        assert_eq!(res("~"), PathBuf::from(HOME));
    }

    #[test]
    fn tilde_slash_is_home() {
        assert_eq!(res("~/"), PathBuf::from(HOME));
    }

    #[test]
    fn tilde_prefix_joins_home() {
        assert_eq!(res("~/a"), PathBuf::from("/home/alice/a"));
        assert_eq!(res("~/a/b"), PathBuf::from("/home/alice/a/b"));
    }

    #[test]
    fn absolute_unchanged() {
        assert_eq!(res("/x"), PathBuf::from("/x"));
    }

    #[test]
    fn relative_joins_cwd() {
        assert_eq!(res("a"), PathBuf::from("/srv/data/a"));
        assert_eq!(res("../up"), PathBuf::from("/srv/data/../up"));
    }

    #[test]
    fn tilde_user_form_is_relative() {
        // `~bob` is not expanded; it is an ordinary relative name.
        assert_eq!(res("~bob"), PathBuf::from("/srv/data/~bob"));
    }

    #[test]
    fn missing_home_returns_input() {
        let p = resolve_with_home("~/a", Path::new(CWD), None);
        assert_eq!(p, PathBuf::from("~/a"));
    }

    #[test]
    fn abbreviate_home_prefix() {
        let home = Path::new(HOME);
        assert_eq!(abbreviate_home(Path::new(HOME), Some(home)), "~");
        assert_eq!(
            abbreviate_home(Path::new("/home/alice/src"), Some(home)),
            "~/src"
        );
        assert_eq!(abbreviate_home(Path::new("/etc"), Some(home)), "/etc");
        assert_eq!(abbreviate_home(Path::new("/etc"), None), "/etc");
    }
}
