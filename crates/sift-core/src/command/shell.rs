//! External shell seam.

use std::path::Path;
use std::process::{Command, Stdio};

/// Captured result of a shell invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellOutput {
    /// stdout followed by stderr.
    pub text: String,
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
}

impl ShellOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// The text shown to the user, with an exit-status note on failure.
    pub fn display(&self) -> String {
        let text = self.text.trim_end();
        if self.success() {
            return text.to_string();
        }
        let note = match self.code {
            Some(code) => format!("[exit status {code}]"),
            None => "[terminated by signal]".to_string(),
        };
        if text.is_empty() {
            note
        } else {
            format!("{text}\n{note}")
        }
    }
}

/// Runs a command line verbatim in a working directory.
pub trait Shell: Send + Sync {
    fn run(&self, line: &str, cwd: &Path) -> std::io::Result<ShellOutput>;
}

/// The user's login shell (`$SHELL`, falling back to `/bin/sh`), invoked
/// as `<shell> -l -c <line>` with stdin closed.
#[derive(Debug, Clone)]
pub struct LoginShell {
    program: String,
}

impl LoginShell {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn from_env() -> Self {
        let program = std::env::var("SHELL")
            .ok()
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| "/bin/sh".to_string());
        Self::new(program)
    }

    pub fn program(&self) -> &str {
        &self.program
    }
}

impl Default for LoginShell {
    fn default() -> Self {
        Self::from_env()
    }
}

impl Shell for LoginShell {
    fn run(&self, line: &str, cwd: &Path) -> std::io::Result<ShellOutput> {
        tracing::debug!(shell = %self.program, line, cwd = %cwd.display(), "running shell command");
        let output = Command::new(&self.program)
            .arg("-l")
            .arg("-c")
            .arg(line)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .output()?;

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        Ok(ShellOutput {
            text,
            code: output.status.code(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn display_success_trims() {
        let out = ShellOutput {
            text: "hello\n".to_string(),
            code: Some(0),
        };
        assert_eq!(out.display(), "hello");
    }

    #[test]
    fn display_failure_adds_status() {
        let out = ShellOutput {
            text: "boom\n".to_string(),
            code: Some(2),
        };
        assert_eq!(out.display(), "boom\n[exit status 2]");

        let silent = ShellOutput {
            text: String::new(),
            code: None,
        };
        assert_eq!(silent.display(), "[terminated by signal]");
    }

    #[test]
    fn login_shell_runs_in_cwd_and_captures_both_streams() {
        let tmp = TempDir::new().unwrap();
        std::fs::write(tmp.path().join("marker"), "").unwrap();
        let shell = LoginShell::new("/bin/sh");

        let out = shell.run("ls; echo err 1>&2; exit 3", tmp.path()).unwrap();
        assert!(out.text.contains("marker"));
        assert!(out.text.contains("err"));
        assert_eq!(out.code, Some(3));
    }
}
