//! User-defined commands: config aliases and programmatic callables.

use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::command::Effect;
use crate::error::CommandError;
use crate::fs::entry::{EntryKind, FileEntry};

/// What a user command gets to know about the current selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandContext {
    pub cwd: PathBuf,
    pub selected: Option<PathBuf>,
    pub name: Option<String>,
    pub is_dir: bool,
    pub kind: Option<EntryKind>,
}

impl CommandContext {
    pub fn new(cwd: &Path, selected: Option<&FileEntry>) -> Self {
        Self {
            cwd: cwd.to_path_buf(),
            selected: selected.map(|e| e.path().to_path_buf()),
            name: selected.map(|e| e.name().to_string()),
            is_dir: selected.is_some_and(|e| e.is_dir()),
            kind: selected.map(|e| e.kind()),
        }
    }
}

/// Return value of a [`CommandCallable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallableOutput {
    Effect(Effect),
    Text(String),
}

impl From<Effect> for CallableOutput {
    fn from(effect: Effect) -> Self {
        Self::Effect(effect)
    }
}

impl From<String> for CallableOutput {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<CallableOutput> for Effect {
    fn from(output: CallableOutput) -> Self {
        match output {
            CallableOutput::Effect(effect) => effect,
            CallableOutput::Text(text) => Effect::output(text),
        }
    }
}

/// A command implemented in Rust.
pub trait CommandCallable: Send + Sync {
    fn call(&self, ctx: &CommandContext, args: &[&str]) -> Result<CallableOutput, CommandError>;
}

impl<F> CommandCallable for F
where
    F: Fn(&CommandContext, &[&str]) -> Result<CallableOutput, CommandError> + Send + Sync,
{
    fn call(&self, ctx: &CommandContext, args: &[&str]) -> Result<CallableOutput, CommandError> {
        self(ctx, args)
    }
}

/// A single user command.
#[derive(Clone)]
pub enum UserCommand {
    /// A directory to jump to, or a shell line to run with the arguments
    /// appended.
    Alias(String),
    Callable(Arc<dyn CommandCallable>),
}

impl fmt::Debug for UserCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Alias(target) => f.debug_tuple("Alias").field(target).finish(),
            Self::Callable(_) => f.write_str("Callable(..)"),
        }
    }
}

/// Name → command table consulted for names that are not built in.
#[derive(Debug, Clone, Default)]
pub struct UserCommands {
    commands: HashMap<String, UserCommand>,
}

impl UserCommands {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a table of aliases, e.g. from the `[commands]` config section.
    pub fn from_aliases(aliases: &HashMap<String, String>) -> Self {
        let commands = aliases
            .iter()
            .map(|(name, target)| (name.clone(), UserCommand::Alias(target.clone())))
            .collect();
        Self { commands }
    }

    pub fn with_alias(mut self, name: &str, target: &str) -> Self {
        self.commands
            .insert(name.to_string(), UserCommand::Alias(target.to_string()));
        self
    }

    pub fn with_callable(mut self, name: &str, callable: impl CommandCallable + 'static) -> Self {
        self.commands
            .insert(name.to_string(), UserCommand::Callable(Arc::new(callable)));
        self
    }

    pub fn get(&self, name: &str) -> Option<&UserCommand> {
        self.commands.get(name)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Command names in alphabetical order.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.commands.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::RawStat;

    #[test]
    fn context_from_selection() {
        let entry = FileEntry::from_stat(
            PathBuf::from("/w/run.sh"),
            RawStat {
                mode: 0o100_755,
                size: 1,
                modified: None,
                owner: "a".to_string(),
                group: "b".to_string(),
            },
        );
        let ctx = CommandContext::new(Path::new("/w"), Some(&entry));
        assert_eq!(ctx.name.as_deref(), Some("run.sh"));
        assert_eq!(ctx.kind, Some(EntryKind::Executable));
        assert!(!ctx.is_dir);

        let empty = CommandContext::new(Path::new("/w"), None);
        assert!(empty.selected.is_none());
    }

    #[test]
    fn table_from_aliases() {
        let mut aliases = HashMap::new();
        aliases.insert("proj".to_string(), "~/projects".to_string());
        aliases.insert("gs".to_string(), "git status".to_string());
        let table = UserCommands::from_aliases(&aliases);
        assert_eq!(table.names(), vec!["gs", "proj"]);
        assert!(matches!(table.get("proj"), Some(UserCommand::Alias(t)) if t == "~/projects"));
    }

    #[test]
    fn closures_are_callables() {
        let table = UserCommands::new().with_callable(
            "hi",
            |ctx: &CommandContext, args: &[&str]| -> Result<CallableOutput, CommandError> {
                Ok(CallableOutput::Text(format!("{} {}", ctx.cwd.display(), args.join(","))))
            },
        );
        let Some(UserCommand::Callable(f)) = table.get("hi") else {
            panic!("expected callable");
        };
        let ctx = CommandContext::new(Path::new("/x"), None);
        let out = f.call(&ctx, &["a", "b"]).unwrap();
        assert_eq!(out, CallableOutput::Text("/x a,b".to_string()));
        assert_eq!(
            format!("{:?}", table.get("hi").unwrap()),
            "Callable(..)"
        );
    }
}
