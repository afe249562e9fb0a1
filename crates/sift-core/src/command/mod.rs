//! Command-line execution.
//!
//! [`execute`] takes a typed line such as `mkdir build` and dispatches it to
//! a built-in handler, a [`UserCommand`], or the external [`Shell`]. The
//! outcome is an [`Effect`] the UI applies (change directory, refresh, ...).

pub mod shell;
pub mod user;

use std::path::{Path, PathBuf};

use crate::error::{CommandError, CoreError};
use crate::fs::{ops, path};
use crate::nav::filter::ViewMode;

pub use shell::{LoginShell, Shell, ShellOutput};
pub use user::{CallableOutput, CommandCallable, CommandContext, UserCommand, UserCommands};

/// What the UI should do after a command ran.
///
/// `Effect::default()` means "nothing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Effect {
    pub cwd: Option<PathBuf>,
    pub refresh: bool,
    pub view_mode: Option<ViewMode>,
    pub open_help: bool,
    pub quit: bool,
    pub output: Option<String>,
}

impl Effect {
    pub fn change_dir(path: PathBuf) -> Self {
        Self {
            cwd: Some(path),
            ..Self::default()
        }
    }

    pub fn refresh() -> Self {
        Self {
            refresh: true,
            ..Self::default()
        }
    }

    pub fn output(text: impl Into<String>) -> Self {
        Self {
            output: Some(text.into()),
            ..Self::default()
        }
    }

    pub fn is_noop(&self) -> bool {
        *self == Self::default()
    }
}

/// Everything a command needs besides its arguments.
pub struct CommandEnv<'a> {
    pub cwd: &'a Path,
    pub context: &'a CommandContext,
    pub user_commands: &'a UserCommands,
    pub shell: &'a dyn Shell,
}

pub type CommandResult = Result<Effect, CommandError>;
type Handler = fn(&CommandEnv<'_>, &str, &[&str]) -> CommandResult;

const BUILTINS: &[(&str, Handler)] = &[
    ("cd", cmd_cd),
    ("ll", cmd_view),
    ("ls", cmd_view),
    ("ld", cmd_view),
    ("lf", cmd_view),
    ("help", cmd_help),
    ("touch", cmd_touch),
    ("mkdir", cmd_mkdir),
    ("mkcd", cmd_mkcd),
    ("rm", cmd_rm),
    ("mv", cmd_mv),
    ("cp", cmd_cp),
    ("ln", cmd_ln),
    ("quit", cmd_quit),
    ("q", cmd_quit),
];

const SHELL_PREFIX: &str = "sh ";

/// Parses and runs one command line.
///
/// Lines starting with `sh ` go to the shell verbatim; everything else is
/// split on whitespace and handed to [`execute_args`].
pub fn execute(env: &CommandEnv<'_>, line: &str) -> CommandResult {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Effect::default());
    }

    if let Some(rest) = line.strip_prefix(SHELL_PREFIX) {
        return run_shell(env, "sh", rest.trim_start());
    }

    let (name, rest) = line
        .split_once(char::is_whitespace)
        .map_or((line, ""), |(name, rest)| (name, rest.trim_start()));
    let args: Vec<&str> = rest.split_whitespace().collect();
    dispatch(env, name, &args, Some(rest))
}

/// Runs the command `name` with pre-split arguments.
///
/// Used directly by prompts whose single argument may contain spaces.
pub fn execute_args(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    dispatch(env, name, args, None)
}

/// `raw` is the text after the name as typed; shell fallbacks use it
/// untouched so quoting and spacing survive.
fn dispatch(env: &CommandEnv<'_>, name: &str, args: &[&str], raw: Option<&str>) -> CommandResult {
    tracing::debug!(command = name, ?args, "dispatching command");

    if let Some((_, handler)) = BUILTINS.iter().find(|(n, _)| *n == name) {
        return handler(env, name, args);
    }

    match env.user_commands.get(name) {
        Some(UserCommand::Callable(callable)) => callable
            .call(env.context, args)
            .map(Effect::from),
        Some(UserCommand::Alias(target)) => run_alias(env, name, target, args, raw),
        None => run_shell(env, name, &shell_line(name, args, raw)),
    }
}

/// Recognises the relative-goto forms `<n>` (down), `<n>-` and `-<n>` (up).
pub fn parse_relative_goto(line: &str) -> Option<isize> {
    let line = line.trim();
    let (digits, sign) = if let Some(d) = line.strip_suffix('-') {
        (d, -1)
    } else if let Some(d) = line.strip_prefix('-') {
        (d, -1)
    } else {
        (line, 1)
    };

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    match digits.parse::<isize>() {
        Ok(n) if n > 0 => Some(sign * n),
        _ => None,
    }
}

/// `head` followed by the typed remainder, or by the arguments joined
/// with single spaces when there is no typed line.
fn shell_line(head: &str, args: &[&str], raw: Option<&str>) -> String {
    match raw {
        Some("") => head.to_string(),
        Some(rest) => format!("{head} {rest}"),
        None => std::iter::once(head)
            .chain(args.iter().copied())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn run_shell(env: &CommandEnv<'_>, command: &str, line: &str) -> CommandResult {
    let output = env
        .shell
        .run(line, env.cwd)
        .map_err(|e| CommandError::new(command, e.to_string()))?;
    Ok(Effect {
        output: Some(output.display()),
        refresh: true,
        ..Effect::default()
    })
}

fn run_alias(
    env: &CommandEnv<'_>,
    name: &str,
    target: &str,
    args: &[&str],
    raw: Option<&str>,
) -> CommandResult {
    let resolved = path::resolve(target, env.cwd);
    if resolved.is_dir() {
        return Ok(Effect::change_dir(resolved));
    }
    run_shell(env, name, &shell_line(target, args, raw))
}

fn fs_error(command: &str, err: CoreError) -> CommandError {
    CommandError::new(command, err.to_string())
}

fn require_args<'a>(command: &str, args: &'a [&'a str], n: usize) -> Result<&'a [&'a str], CommandError> {
    if args.len() < n {
        Err(CommandError::missing_operand(command))
    } else {
        Ok(args)
    }
}

fn cmd_cd(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    let args = require_args(name, args, 1)?;
    let target = path::resolve(args[0], env.cwd);
    let meta = std::fs::metadata(&target)
        .map_err(|e| fs_error(name, CoreError::from_io(e, &target)))?;
    if !meta.is_dir() {
        return Err(fs_error(name, CoreError::NotADirectory(target)));
    }
    Ok(Effect::change_dir(target))
}

fn cmd_view(_env: &CommandEnv<'_>, name: &str, _args: &[&str]) -> CommandResult {
    let mode = ViewMode::from_command(name)
        .ok_or_else(|| CommandError::new(name, "unknown view mode"))?;
    Ok(Effect {
        view_mode: Some(mode),
        output: Some(mode.description().to_string()),
        ..Effect::default()
    })
}

fn cmd_help(_env: &CommandEnv<'_>, _name: &str, _args: &[&str]) -> CommandResult {
    Ok(Effect {
        open_help: true,
        ..Effect::default()
    })
}

fn cmd_quit(_env: &CommandEnv<'_>, _name: &str, _args: &[&str]) -> CommandResult {
    Ok(Effect {
        quit: true,
        ..Effect::default()
    })
}

fn for_each_path(
    env: &CommandEnv<'_>,
    name: &str,
    args: &[&str],
    op: fn(&Path) -> crate::error::CoreResult<()>,
) -> Result<Vec<PathBuf>, CommandError> {
    let args = require_args(name, args, 1)?;
    let mut done = Vec::with_capacity(args.len());
    for arg in args {
        let target = path::resolve(arg, env.cwd);
        op(&target).map_err(|e| fs_error(name, e))?;
        done.push(target);
    }
    Ok(done)
}

fn cmd_touch(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    for_each_path(env, name, args, ops::touch)?;
    Ok(Effect::refresh())
}

fn cmd_mkdir(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    for_each_path(env, name, args, ops::make_dirs)?;
    Ok(Effect::refresh())
}

fn cmd_mkcd(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    let created = for_each_path(env, name, args, ops::make_dirs)?;
    Ok(Effect {
        cwd: created.last().cloned(),
        refresh: true,
        ..Effect::default()
    })
}

fn cmd_rm(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    for_each_path(env, name, args, ops::remove_path)?;
    Ok(Effect::refresh())
}

fn two_paths(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> Result<(PathBuf, PathBuf), CommandError> {
    let args = require_args(name, args, 2)?;
    Ok((path::resolve(args[0], env.cwd), path::resolve(args[1], env.cwd)))
}

fn cmd_mv(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    let (src, dest) = two_paths(env, name, args)?;
    ops::move_path(&src, &dest).map_err(|e| fs_error(name, e))?;
    Ok(Effect::refresh())
}

fn cmd_cp(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    let (src, dest) = two_paths(env, name, args)?;
    ops::copy_regular_file(&src, &dest).map_err(|e| fs_error(name, e))?;
    Ok(Effect::refresh())
}

fn cmd_ln(env: &CommandEnv<'_>, name: &str, args: &[&str]) -> CommandResult {
    let (src, dest) = two_paths(env, name, args)?;
    ops::hard_link(&src, &dest).map_err(|e| fs_error(name, e))?;
    Ok(Effect::refresh())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::sync::Mutex;
    use tempfile::TempDir;

    /// Records every line instead of running it.
    #[derive(Default)]
    struct RecordingShell {
        lines: Mutex<Vec<(String, PathBuf)>>,
    }

    impl Shell for RecordingShell {
        fn run(&self, line: &str, cwd: &Path) -> std::io::Result<ShellOutput> {
            self.lines
                .lock()
                .unwrap()
                .push((line.to_string(), cwd.to_path_buf()));
            Ok(ShellOutput {
                text: format!("ran {line}\n"),
                code: Some(0),
            })
        }
    }

    impl RecordingShell {
        fn recorded(&self) -> Vec<String> {
            self.lines.lock().unwrap().iter().map(|(l, _)| l.clone()).collect()
        }
    }

    struct Fixture {
        tmp: TempDir,
        context: CommandContext,
        commands: UserCommands,
        shell: RecordingShell,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let context = CommandContext::new(tmp.path(), None);
            Self {
                tmp,
                context,
                commands: UserCommands::new(),
                shell: RecordingShell::default(),
            }
        }

        fn with_commands(mut self, commands: UserCommands) -> Self {
            self.commands = commands;
            self
        }

        fn run(&self, line: &str) -> CommandResult {
            let env = CommandEnv {
                cwd: self.tmp.path(),
                context: &self.context,
                user_commands: &self.commands,
                shell: &self.shell,
            };
            execute(&env, line)
        }

        fn path(&self, rel: &str) -> PathBuf {
            self.tmp.path().join(rel)
        }
    }

    #[test]
    fn empty_line_is_noop() {
        let fx = Fixture::new();
        assert!(fx.run("   ").unwrap().is_noop());
        assert!(fx.shell.recorded().is_empty());
    }

    #[test]
    fn cd_to_directory() {
        let fx = Fixture::new();
        fs::create_dir(fx.path("sub")).unwrap();
        let effect = fx.run("cd sub").unwrap();
        assert_eq!(effect.cwd, Some(fx.path("sub")));
    }

    #[test]
    fn cd_errors_carry_prefix() {
        let fx = Fixture::new();
        fs::write(fx.path("file"), "").unwrap();

        assert_eq!(fx.run("cd").unwrap_err().to_string(), "cd: missing operand");
        let err = fx.run("cd file").unwrap_err();
        assert!(err.to_string().starts_with("cd: not a directory"));
        let err = fx.run("cd nowhere").unwrap_err();
        assert!(err.to_string().starts_with("cd: path not found"));
    }

    #[test]
    fn view_mode_commands() {
        let fx = Fixture::new();
        let effect = fx.run("ld").unwrap();
        assert_eq!(effect.view_mode, Some(ViewMode::DirsOnly));
        assert_eq!(effect.output.as_deref(), Some(ViewMode::DirsOnly.description()));
        assert_eq!(fx.run("ll").unwrap().view_mode, Some(ViewMode::All));
        assert_eq!(fx.run("ls").unwrap().view_mode, Some(ViewMode::HideHidden));
        assert_eq!(fx.run("lf").unwrap().view_mode, Some(ViewMode::FilesOnly));
    }

    #[test]
    fn help_and_quit() {
        let fx = Fixture::new();
        assert!(fx.run("help").unwrap().open_help);
        assert!(fx.run("q").unwrap().quit);
        assert!(fx.run("quit").unwrap().quit);
    }

    #[test]
    fn touch_mkdir_rm() {
        let fx = Fixture::new();
        assert!(fx.run("touch a.txt b.txt").unwrap().refresh);
        assert!(fx.path("a.txt").is_file());
        assert!(fx.path("b.txt").is_file());

        fx.run("mkdir deep/er").unwrap();
        assert!(fx.path("deep/er").is_dir());

        fx.run("rm a.txt deep").unwrap();
        assert!(!fx.path("a.txt").exists());
        assert!(!fx.path("deep").exists());

        assert_eq!(fx.run("rm").unwrap_err().to_string(), "rm: missing operand");
    }

    #[test]
    fn mkcd_changes_to_last_created() {
        let fx = Fixture::new();
        let effect = fx.run("mkcd x/y").unwrap();
        assert_eq!(effect.cwd, Some(fx.path("x/y")));
        assert!(effect.refresh);
        assert!(fx.path("x").is_dir());
        assert!(fx.path("x/y").is_dir());
    }

    #[test]
    fn mv_cp_ln_into_directory() {
        let fx = Fixture::new();
        fs::write(fx.path("f.txt"), "data").unwrap();
        fs::create_dir(fx.path("dir")).unwrap();

        fx.run("cp f.txt dir").unwrap();
        assert_eq!(fs::read_to_string(fx.path("dir/f.txt")).unwrap(), "data");

        fx.run("ln f.txt linked.txt").unwrap();
        assert!(fx.path("linked.txt").is_file());

        fx.run("mv f.txt moved.txt").unwrap();
        assert!(!fx.path("f.txt").exists());
        assert!(fx.path("moved.txt").exists());

        fx.run("mv moved.txt f.txt").unwrap();
        assert_eq!(fs::read_to_string(fx.path("f.txt")).unwrap(), "data");
    }

    #[test]
    fn cp_refuses_directory() {
        let fx = Fixture::new();
        fs::create_dir(fx.path("dir")).unwrap();
        let err = fx.run("cp dir other").unwrap_err();
        assert_eq!(err.command, "cp");
        assert!(err.message.contains("is a directory"));
    }

    #[test]
    fn two_operand_commands_need_both() {
        let fx = Fixture::new();
        assert_eq!(fx.run("mv a").unwrap_err().to_string(), "mv: missing operand");
        assert_eq!(fx.run("cp").unwrap_err().to_string(), "cp: missing operand");
    }

    #[test]
    fn execute_args_keeps_spaces() {
        let fx = Fixture::new();
        let env = CommandEnv {
            cwd: fx.tmp.path(),
            context: &fx.context,
            user_commands: &fx.commands,
            shell: &fx.shell,
        };
        execute_args(&env, "touch", &["with space.txt"]).unwrap();
        assert!(fx.path("with space.txt").is_file());
    }

    #[test]
    fn sh_prefix_goes_to_shell_verbatim() {
        let fx = Fixture::new();
        let effect = fx.run("sh echo  hi | wc").unwrap();
        assert_eq!(fx.shell.recorded(), vec!["echo  hi | wc"]);
        assert_eq!(effect.output.as_deref(), Some("ran echo  hi | wc"));
    }

    #[test]
    fn unknown_name_falls_back_to_shell() {
        let fx = Fixture::new();
        fx.run("git   status").unwrap();
        assert_eq!(fx.shell.recorded(), vec!["git   status"]);
        assert_eq!(fx.shell.lines.lock().unwrap()[0].1, fx.tmp.path());
    }

    #[test]
    fn alias_to_directory_changes_dir() {
        let fx = Fixture::new();
        fs::create_dir(fx.path("projects")).unwrap();
        let fx = fx.with_commands(UserCommands::new().with_alias("p", "projects"));
        let effect = fx.run("p").unwrap();
        assert_eq!(effect.cwd, Some(fx.path("projects")));
        assert!(fx.shell.recorded().is_empty());
    }

    #[test]
    fn alias_to_command_runs_shell_with_args() {
        let fx = Fixture::new().with_commands(UserCommands::new().with_alias("g", "git log"));
        fx.run("g -n 3").unwrap();
        assert_eq!(fx.shell.recorded(), vec!["git log -n 3"]);
    }

    #[test]
    fn shell_fallback_keeps_quoted_spacing() {
        let fx = Fixture::new();
        fx.run(r#"printf "%s|" "a   b""#).unwrap();
        assert_eq!(fx.shell.recorded(), vec![r#"printf "%s|" "a   b""#]);

        let fx = Fixture::new().with_commands(UserCommands::new().with_alias("say", "echo"));
        fx.run(r#"say  "x   y""#).unwrap();
        assert_eq!(fx.shell.recorded(), vec![r#"echo "x   y""#]);
    }

    #[test]
    fn execute_args_fallback_joins_arguments() {
        let fx = Fixture::new();
        let env = CommandEnv {
            cwd: fx.tmp.path(),
            context: &fx.context,
            user_commands: &fx.commands,
            shell: &fx.shell,
        };
        execute_args(&env, "git", &["log", "-n", "3"]).unwrap();
        assert_eq!(fx.shell.recorded(), vec!["git log -n 3"]);
    }

    #[test]
    fn callable_receives_context() {
        let fx = Fixture::new();
        let commands = UserCommands::new()
            .with_callable(
                "where",
                |ctx: &CommandContext, _args: &[&str]| -> Result<CallableOutput, CommandError> {
                    Ok(CallableOutput::Text(ctx.cwd.display().to_string()))
                },
            )
            .with_callable(
                "up",
                |ctx: &CommandContext, _args: &[&str]| -> Result<CallableOutput, CommandError> {
                    let parent = ctx.cwd.parent().map(Path::to_path_buf);
                    Ok(CallableOutput::Effect(Effect {
                        cwd: parent,
                        ..Effect::default()
                    }))
                },
            );
        let fx = fx.with_commands(commands);

        let out = fx.run("where").unwrap();
        assert_eq!(out.output, Some(fx.tmp.path().display().to_string()));
        let up = fx.run("up").unwrap();
        assert_eq!(up.cwd.as_deref(), fx.tmp.path().parent());
    }

    #[test]
    fn relative_goto_forms() {
        assert_eq!(parse_relative_goto("3"), Some(3));
        assert_eq!(parse_relative_goto("5-"), Some(-5));
        assert_eq!(parse_relative_goto("-2"), Some(-2));
        assert_eq!(parse_relative_goto(" 12 "), Some(12));
        assert_eq!(parse_relative_goto("0"), None);
        assert_eq!(parse_relative_goto("-"), None);
        assert_eq!(parse_relative_goto("+3"), None);
        assert_eq!(parse_relative_goto("3x"), None);
        assert_eq!(parse_relative_goto("--3"), None);
        assert_eq!(parse_relative_goto("ls"), None);
    }
}
