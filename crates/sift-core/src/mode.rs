//! Input modes and the single-slot mode memory.

/// The mode that currently owns keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Mode {
    #[default]
    Normal,
    Filter,
    Command,
    Goto,
    AddFile,
    Mkdir,
    Remove,
    Copy,
    Move,
    Rename,
    ChangeDir,
    Help,
    Quit,
    Select,
    Sort,
    ColumnVisibility,
    Settings,
    Confirm,
}

impl Mode {
    /// Label shown at the left of the status bar.
    pub fn label(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Filter => "FILTER",
            Self::Command => "COMMAND",
            Self::Goto => "GOTO",
            Self::AddFile => "ADD FILE",
            Self::Mkdir => "MKDIR",
            Self::Remove => "REMOVE",
            Self::Copy => "COPY",
            Self::Move => "MOVE",
            Self::Rename => "RENAME",
            Self::ChangeDir => "CD",
            Self::Help => "HELP",
            Self::Quit => "QUIT",
            Self::Select => "SELECT",
            Self::Sort => "SORT",
            Self::ColumnVisibility => "COLUMNS",
            Self::Settings => "SETTINGS",
            Self::Confirm => "CONFIRM",
        }
    }

    /// Prompt modes that edit a single argument in the command bar, and the
    /// command each one issues on submit.
    pub fn prompt_command(self) -> Option<&'static str> {
        match self {
            Self::AddFile => Some("touch"),
            Self::Mkdir => Some("mkdir"),
            Self::Remove => Some("rm"),
            Self::Copy => Some("cp"),
            Self::Move | Self::Rename => Some("mv"),
            Self::ChangeDir => Some("cd"),
            _ => None,
        }
    }

    /// Whether the mode is drawn as a floating window.
    pub fn is_floating(self) -> bool {
        matches!(
            self,
            Self::Help
                | Self::Quit
                | Self::Sort
                | Self::ColumnVisibility
                | Self::Settings
                | Self::Confirm
        )
    }
}

/// Current mode plus a single remembered previous mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ModeState {
    current: Mode,
    previous: Mode,
}

impl ModeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Mode {
        self.current
    }

    pub fn previous(&self) -> Mode {
        self.previous
    }

    pub fn is(&self, mode: Mode) -> bool {
        self.current == mode
    }

    /// Switches to `mode`, remembering the mode being left.
    ///
    /// Re-entering the current mode does nothing.
    pub fn enter(&mut self, mode: Mode) {
        if mode == self.current {
            return;
        }
        self.previous = self.current;
        self.current = mode;
    }

    /// Returns to the remembered mode, or to Normal if it is the current
    /// one. The remembered mode itself is left alone. Normal ignores cancel.
    pub fn cancel(&mut self) {
        if self.current == Mode::Normal {
            return;
        }
        self.current = if self.previous == self.current {
            Mode::Normal
        } else {
            self.previous
        };
    }

    /// Drops straight back to Normal.
    pub fn reset(&mut self) {
        self.enter(Mode::Normal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_in_normal() {
        let state = ModeState::new();
        assert_eq!(state.current(), Mode::Normal);
        assert_eq!(state.previous(), Mode::Normal);
    }

    #[test]
    fn enter_records_previous() {
        let mut state = ModeState::new();
        state.enter(Mode::Filter);
        assert_eq!(state.current(), Mode::Filter);
        assert_eq!(state.previous(), Mode::Normal);

        state.enter(Mode::Quit);
        assert_eq!(state.current(), Mode::Quit);
        assert_eq!(state.previous(), Mode::Filter);
    }

    #[test]
    fn cancel_restores_previous() {
        let mut state = ModeState::new();
        state.enter(Mode::Command);
        state.enter(Mode::Help);
        state.cancel();
        assert_eq!(state.current(), Mode::Command);
        assert_eq!(state.previous(), Mode::Command);
    }

    #[test]
    fn second_cancel_falls_back_to_normal() {
        let mut state = ModeState::new();
        state.enter(Mode::Command);
        state.enter(Mode::Help);
        state.cancel();
        state.cancel();
        assert_eq!(state.current(), Mode::Normal);
        state.cancel();
        assert_eq!(state.current(), Mode::Normal);
    }

    #[test]
    fn cancel_from_first_level_is_idempotent() {
        let mut state = ModeState::new();
        state.enter(Mode::Sort);
        state.cancel();
        let once = state;
        state.cancel();
        assert_eq!(state, once);
        assert_eq!(state.current(), Mode::Normal);
    }

    #[test]
    fn normal_ignores_cancel() {
        let mut state = ModeState::new();
        state.enter(Mode::Filter);
        state.enter(Mode::Normal);
        state.cancel();
        assert_eq!(state.current(), Mode::Normal);
    }

    #[test]
    fn reentering_current_keeps_previous() {
        let mut state = ModeState::new();
        state.enter(Mode::Filter);
        state.enter(Mode::Filter);
        assert_eq!(state.previous(), Mode::Normal);
    }

    #[test]
    fn prompt_commands() {
        assert_eq!(Mode::Rename.prompt_command(), Some("mv"));
        assert_eq!(Mode::ChangeDir.prompt_command(), Some("cd"));
        assert_eq!(Mode::Normal.prompt_command(), None);
        assert!(Mode::Help.is_floating());
        assert!(!Mode::Filter.is_floating());
    }
}
