//! Bottom input line and the search row above the panes.

use ratatui::{
    layout::{Position, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sift_core::{parse_color, Mode, Theme};

use crate::app::Completions;
use crate::editor::LineEditor;

/// Prompt shown before the input for a text mode, if any.
///
/// `source` is the selected entry name for commands that act on it.
pub fn prompt(mode: Mode, source: Option<&str>) -> Option<String> {
    let source = source.unwrap_or("?");
    let text = match mode {
        Mode::Filter => "/".to_string(),
        Mode::Command => ":".to_string(),
        Mode::Goto => "goto ".to_string(),
        Mode::AddFile => "touch ".to_string(),
        Mode::Mkdir => "mkdir ".to_string(),
        Mode::Remove => "rm (empty for selection) ".to_string(),
        Mode::Copy => format!("cp {source} "),
        Mode::Move => format!("mv {source} "),
        Mode::Rename => format!("rename {source} to "),
        Mode::ChangeDir => "cd ".to_string(),
        _ => return None,
    };
    Some(text)
}

/// Data needed to render the command bar.
pub struct CommandBarProps<'a> {
    pub mode: Mode,
    pub editor: &'a LineEditor,
    pub source: Option<&'a str>,
    pub completions: &'a Completions,
}

/// Renders the two command rows and places the terminal cursor in the
/// input when a text mode is active.
pub fn render_command_bar(f: &mut Frame, area: Rect, props: &CommandBarProps<'_>, theme: &Theme) {
    // Filter input lives in the search row.
    let prompt_text = match props.mode {
        Mode::Filter => None,
        mode => prompt(mode, props.source),
    };
    let Some(prompt_text) = prompt_text else {
        f.render_widget(Paragraph::new(""), area);
        return;
    };

    let input = input_line(&prompt_text, props.editor, theme);
    let lines = vec![input, completion_line(props.completions, theme)];
    f.render_widget(Paragraph::new(lines), area);

    if let Some(pos) = cursor_position(area, &prompt_text, props.editor) {
        f.set_cursor_position(pos);
    }
}

/// The search row: the live filter input, or the active query.
pub fn render_search_row(
    f: &mut Frame,
    area: Rect,
    mode: Mode,
    editor: &LineEditor,
    query: &str,
    theme: &Theme,
) {
    if mode == Mode::Filter {
        f.render_widget(Paragraph::new(input_line("/", editor, theme)), area);
        if let Some(pos) = cursor_position(area, "/", editor) {
            f.set_cursor_position(pos);
        }
        return;
    }

    let line = if query.is_empty() {
        Line::from("")
    } else {
        Line::from(vec![
            Span::styled("/", Style::default().fg(parse_color(&theme.command_bar.prompt_fg))),
            Span::styled(
                query.to_string(),
                Style::default().fg(parse_color(&theme.command_bar.completion_fg)),
            ),
        ])
    };
    f.render_widget(Paragraph::new(line), area);
}

fn input_line(prompt: &str, editor: &LineEditor, theme: &Theme) -> Line<'static> {
    Line::from(vec![
        Span::styled(
            prompt.to_string(),
            Style::default()
                .fg(parse_color(&theme.command_bar.prompt_fg))
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            editor.text().to_string(),
            Style::default().fg(parse_color(&theme.command_bar.text_fg)),
        ),
    ])
}

fn completion_line(completions: &Completions, theme: &Theme) -> Line<'static> {
    let normal = Style::default().fg(parse_color(&theme.command_bar.completion_fg));
    let current = Style::default()
        .fg(parse_color(&theme.command_bar.text_fg))
        .add_modifier(Modifier::REVERSED);

    let mut spans = Vec::new();
    for (i, item) in completions.matches.iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        let style = if completions.index == Some(i) {
            current
        } else {
            normal
        };
        spans.push(Span::styled(item.clone(), style));
    }
    Line::from(spans)
}

/// Terminal cell of the editor cursor, if it is inside `area`.
pub fn cursor_position(area: Rect, prompt: &str, editor: &LineEditor) -> Option<Position> {
    let before: String = editor.text().chars().take(editor.cursor()).collect();
    let offset = Span::raw(prompt).width() + Span::raw(before.as_str()).width();
    let x = u16::try_from(offset).ok()?.checked_add(area.x)?;
    (x < area.right() && area.height > 0).then_some(Position::new(x, area.y))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::EditKey;

    #[test]
    fn prompts_name_the_command() {
        assert_eq!(prompt(Mode::Mkdir, None).as_deref(), Some("mkdir "));
        assert_eq!(
            prompt(Mode::Rename, Some("a.txt")).as_deref(),
            Some("rename a.txt to ")
        );
        assert_eq!(prompt(Mode::Normal, None), None);
        assert_eq!(prompt(Mode::Help, None), None);
    }

    #[test]
    fn cursor_follows_the_editor() {
        let mut editor = LineEditor::new();
        editor.set("abc");
        let area = Rect::new(0, 22, 80, 2);
        assert_eq!(cursor_position(area, ":", &editor), Some(Position::new(4, 22)));

        editor.apply(EditKey::Home);
        assert_eq!(cursor_position(area, ":", &editor), Some(Position::new(1, 22)));
    }

    #[test]
    fn cursor_outside_the_area_is_hidden() {
        let mut editor = LineEditor::new();
        editor.set(&"x".repeat(20));
        let area = Rect::new(0, 0, 10, 1);
        assert_eq!(cursor_position(area, ":", &editor), None);
    }

    #[test]
    fn current_completion_is_highlighted() {
        let completions = Completions {
            matches: vec!["mkdir a".to_string(), "mkdir b".to_string()],
            index: Some(1),
        };
        let line = completion_line(&completions, &Theme::default());
        assert_eq!(line.spans.len(), 3);
        assert!(line.spans[2].style.add_modifier.contains(Modifier::REVERSED));
        assert!(!line.spans[0].style.add_modifier.contains(Modifier::REVERSED));
    }
}
