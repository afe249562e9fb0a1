//! Status bar rendering.
//!
//! The first row shows the mode, `position/total`, the selected entry and
//! the sort key; the second shows the latest message, a pending key
//! sequence, or the partial relative-jump count.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sift_core::{parse_color, FileEntry, Mode, SortKey, Theme};

/// Data needed to render the status bar.
pub struct StatusBarProps<'a> {
    pub mode: Mode,
    pub selection: Option<usize>,
    pub total: usize,
    pub selected_entry: Option<&'a FileEntry>,
    pub sort_key: SortKey,
    /// Text and whether it is an error.
    pub message: Option<(&'a str, bool)>,
    pub pending_keys: Option<&'a str>,
    pub goto_input: Option<&'a str>,
}

/// `" 3/12"`, or `" 0/0"` for an empty list.
pub fn position_text(selection: Option<usize>, total: usize) -> String {
    match selection {
        Some(i) if total > 0 => format!(" {}/{total}", i + 1),
        _ => format!(" 0/{total}"),
    }
}

/// One-line description of the selected entry.
pub fn entry_summary(entry: &FileEntry) -> String {
    if entry.is_dir() {
        format!("  {}  {}", entry.permissions(), entry.name())
    } else {
        format!(
            "  {}  {}  {}",
            entry.permissions(),
            entry.size_display(),
            entry.name()
        )
    }
}

/// `"Name ↑"` style sort indicator.
pub fn sort_indicator(sort_key: SortKey) -> String {
    format!("{} {} ", sort_key.column.label(), sort_key.direction.arrow())
}

/// Renders the two status rows.
pub fn render_statusbar(f: &mut Frame, area: Rect, props: &StatusBarProps<'_>, theme: &Theme) {
    let bg = parse_color(&theme.statusbar.bg);
    let position_fg = parse_color(&theme.statusbar.position_fg);
    let base = Style::default().fg(position_fg).bg(bg);

    let mode_span = Span::styled(
        format!(" {} ", props.mode.label()),
        Style::default()
            .fg(parse_color(&theme.statusbar.mode_fg))
            .bg(parse_color(&theme.statusbar.mode_bg))
            .add_modifier(Modifier::BOLD),
    );
    let position = Span::styled(
        position_text(props.selection, props.total),
        base.add_modifier(Modifier::BOLD),
    );
    let summary = Span::styled(
        props.selected_entry.map(entry_summary).unwrap_or_default(),
        base,
    );

    let sort = sort_indicator(props.sort_key);
    let used = mode_span.width() + position.width() + summary.width();
    let spacer = usize::from(area.width).saturating_sub(used + Span::raw(sort.as_str()).width());
    let top = Line::from(vec![
        mode_span,
        position,
        summary,
        Span::styled(" ".repeat(spacer), base),
        Span::styled(sort, base),
    ]);

    let bottom = match (props.goto_input, props.pending_keys, props.message) {
        (Some(input), _, _) => Span::styled(format!(" goto {input}"), base),
        (None, Some(keys), _) => Span::styled(format!(" {keys}"), base),
        (None, None, Some((text, is_error))) => {
            let fg = if is_error {
                parse_color(&theme.statusbar.error_fg)
            } else {
                parse_color(&theme.statusbar.message_fg)
            };
            let first = text.lines().next().unwrap_or_default();
            Span::styled(
                format!(" {first}"),
                Style::default()
                    .fg(fg)
                    .bg(bg)
                    .add_modifier(Modifier::ITALIC),
            )
        }
        (None, None, None) => Span::raw(""),
    };

    let bar = Paragraph::new(vec![top, Line::from(bottom)]).style(Style::default().bg(bg));
    f.render_widget(bar, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use sift_core::{Column, Direction};

    fn props<'a>() -> StatusBarProps<'a> {
        StatusBarProps {
            mode: Mode::Normal,
            selection: Some(2),
            total: 12,
            selected_entry: None,
            sort_key: SortKey::new(Column::Name, Direction::Asc),
            message: None,
            pending_keys: None,
            goto_input: None,
        }
    }

    fn draw(props: &StatusBarProps<'_>) -> Vec<String> {
        let backend = TestBackend::new(40, 2);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| render_statusbar(f, f.area(), props, &Theme::default()))
            .unwrap();
        let buf = terminal.backend().buffer();
        (0..2)
            .map(|y| (0..40).map(|x| buf[(x, y)].symbol().to_string()).collect())
            .collect()
    }

    #[test]
    fn position_is_one_based() {
        assert_eq!(position_text(Some(2), 12), " 3/12");
        assert_eq!(position_text(None, 0), " 0/0");
    }

    #[test]
    fn sort_indicator_shows_direction() {
        let key = SortKey::new(Column::Size, Direction::Desc);
        assert_eq!(sort_indicator(key), format!("Size {} ", Direction::Desc.arrow()));
    }

    #[test]
    fn top_row_has_mode_position_and_sort() {
        let rows = draw(&props());
        assert!(rows[0].starts_with(" NORMAL  3/12"));
        assert!(rows[0].trim_end().ends_with(Direction::Asc.arrow()));
    }

    #[test]
    fn goto_input_wins_over_message() {
        let p = StatusBarProps {
            goto_input: Some("12-"),
            message: Some(("hello", false)),
            ..props()
        };
        assert!(draw(&p)[1].starts_with(" goto 12-"));
    }

    #[test]
    fn only_the_first_message_line_is_shown() {
        let p = StatusBarProps {
            message: Some(("first\nsecond", true)),
            ..props()
        };
        let rows = draw(&p);
        assert!(rows[1].starts_with(" first"));
        assert!(!rows[1].contains("second"));
    }
}
