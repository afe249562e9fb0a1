//! Key routing: turns a crossterm key event into an [`InputAction`] for the
//! current mode.
//!
//! Keys are first given a name (`"j"`, `"Ctrl+d"`, `"Enter"`) and then
//! resolved through the [`Keymap`]. Text-entry modes see editing keys
//! before the keymap, and Confirm/Quit look at `y`/`n` directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use sift_core::{Action, Keymap, Mode};

use crate::editor::EditKey;

/// Actions that can result from a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputAction {
    /// A bound action, interpreted by the current mode.
    Action(Action),
    /// An editing keystroke for the focused text input.
    Edit(EditKey),
    /// `y` or `n` in a yes/no window.
    Answer(bool),
    /// No action for this key.
    None,
}

/// Tracks state for multi-key sequences like "gg".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InputState {
    pending: Option<String>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keys typed so far of an unfinished sequence.
    pub fn pending(&self) -> Option<&str> {
        self.pending.as_deref()
    }
}

/// Names a key the way `keymap.toml` spells it.
pub fn key_name(key: &KeyEvent) -> Option<String> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    let base = match key.code {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) if ctrl || alt => c.to_ascii_lowercase().to_string(),
        KeyCode::Char(c) => return Some(c.to_string()),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "BackTab".to_string(),
        KeyCode::Backspace => "Backspace".to_string(),
        KeyCode::Delete => "Delete".to_string(),
        KeyCode::Up => "Up".to_string(),
        KeyCode::Down => "Down".to_string(),
        KeyCode::Left => "Left".to_string(),
        KeyCode::Right => "Right".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::PageUp => "PageUp".to_string(),
        KeyCode::PageDown => "PageDown".to_string(),
        KeyCode::F(n) => format!("F{n}"),
        _ => return None,
    };

    let name = match (ctrl, alt) {
        (true, _) => format!("Ctrl+{base}"),
        (false, true) => format!("Alt+{base}"),
        (false, false) => base,
    };
    Some(name)
}

fn is_text_mode(mode: Mode) -> bool {
    matches!(mode, Mode::Filter | Mode::Command | Mode::Goto) || mode.prompt_command().is_some()
}

/// Maps a key event to an InputAction based on the current mode.
/// Returns the action and a new InputState.
pub fn handle_key(
    key: KeyEvent,
    mode: Mode,
    state: &InputState,
    keymap: &Keymap,
) -> (InputAction, InputState) {
    if key.kind == KeyEventKind::Release {
        return (InputAction::None, state.clone());
    }

    match mode {
        m if is_text_mode(m) => handle_text_key(key, m, keymap),
        Mode::Confirm | Mode::Quit => handle_answer_key(key, keymap),
        _ => handle_sequence_key(key, state, keymap),
    }
}

fn handle_text_key(key: KeyEvent, mode: Mode, keymap: &Keymap) -> (InputAction, InputState) {
    let new_state = InputState::new();
    if let Some(edit) = edit_key(&key) {
        let accepted = match edit {
            EditKey::Insert(c) if mode == Mode::Goto => c.is_ascii_digit() || c == '-',
            _ => true,
        };
        let action = if accepted {
            InputAction::Edit(edit)
        } else {
            InputAction::None
        };
        return (action, new_state);
    }
    (lookup(&key, keymap), new_state)
}

fn handle_answer_key(key: KeyEvent, keymap: &Keymap) -> (InputAction, InputState) {
    let new_state = InputState::new();
    let no_modifiers = !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT);
    let action = match key.code {
        KeyCode::Char('y' | 'Y') if no_modifiers => InputAction::Answer(true),
        KeyCode::Char('n' | 'N') if no_modifiers => InputAction::Answer(false),
        _ => lookup(&key, keymap),
    };
    (action, new_state)
}

fn handle_sequence_key(
    key: KeyEvent,
    state: &InputState,
    keymap: &Keymap,
) -> (InputAction, InputState) {
    let Some(name) = key_name(&key) else {
        return (InputAction::None, InputState::new());
    };

    let combined = match &state.pending {
        Some(prefix) => format!("{prefix}{name}"),
        None => name,
    };

    if let Some(action) = keymap.action_for_key(&combined) {
        return (InputAction::Action(action), InputState::new());
    }
    if keymap.is_prefix(&combined) {
        return (
            InputAction::None,
            InputState {
                pending: Some(combined),
            },
        );
    }
    (InputAction::None, InputState::new())
}

fn lookup(key: &KeyEvent, keymap: &Keymap) -> InputAction {
    key_name(key)
        .and_then(|name| keymap.action_for_key(&name))
        .map_or(InputAction::None, InputAction::Action)
}

fn edit_key(key: &KeyEvent) -> Option<EditKey> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let edit = match key.code {
        KeyCode::Char('u') if ctrl => EditKey::KillToStart,
        KeyCode::Char('w') if ctrl => EditKey::KillWord,
        KeyCode::Char(c) if !ctrl && !alt => EditKey::Insert(c),
        KeyCode::Backspace => EditKey::Backspace,
        KeyCode::Delete => EditKey::Delete,
        KeyCode::Left => EditKey::Left,
        KeyCode::Right => EditKey::Right,
        KeyCode::Home => EditKey::Home,
        KeyCode::End => EditKey::End,
        _ => return None,
    };
    Some(edit)
}
