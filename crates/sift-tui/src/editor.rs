//! Single-line text input used by the filter bar and the command bar.

/// One editing keystroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditKey {
    Insert(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    /// Ctrl+u: drop everything before the cursor.
    KillToStart,
    /// Ctrl+w: drop the word before the cursor.
    KillWord,
}

/// A line of text with a cursor measured in characters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineEditor {
    text: String,
    cursor: usize,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Replaces the text and puts the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.char_len();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Applies `key`; returns whether the text changed.
    pub fn apply(&mut self, key: EditKey) -> bool {
        match key {
            EditKey::Insert(c) => {
                let at = self.byte_index(self.cursor);
                self.text.insert(at, c);
                self.cursor += 1;
                true
            }
            EditKey::Backspace => {
                if self.cursor == 0 {
                    return false;
                }
                self.cursor -= 1;
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                true
            }
            EditKey::Delete => {
                if self.cursor >= self.char_len() {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.text.remove(at);
                true
            }
            EditKey::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                false
            }
            EditKey::Right => {
                self.cursor = (self.cursor + 1).min(self.char_len());
                false
            }
            EditKey::Home => {
                self.cursor = 0;
                false
            }
            EditKey::End => {
                self.cursor = self.char_len();
                false
            }
            EditKey::KillToStart => {
                if self.cursor == 0 {
                    return false;
                }
                let at = self.byte_index(self.cursor);
                self.text.replace_range(..at, "");
                self.cursor = 0;
                true
            }
            EditKey::KillWord => {
                let before: Vec<char> = self.text.chars().take(self.cursor).collect();
                let trimmed = before.iter().rposition(|c| !c.is_whitespace());
                let start = match trimmed {
                    None => 0,
                    Some(end) => before[..=end]
                        .iter()
                        .rposition(|c| c.is_whitespace())
                        .map_or(0, |i| i + 1),
                };
                if start == self.cursor {
                    return false;
                }
                let from = self.byte_index(start);
                let to = self.byte_index(self.cursor);
                self.text.replace_range(from..to, "");
                self.cursor = start;
                true
            }
        }
    }

    fn char_len(&self) -> usize {
        self.text.chars().count()
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map_or(self.text.len(), |(i, _)| i)
    }
}
