//! Content of the floating windows, one builder per modal mode.

use ratatui::{
    style::{Modifier, Style},
    text::{Line, Span},
};
use sift_core::{parse_color, Column, Mode, Theme};

use crate::app::{help_lines, App, ConfirmAction, Setting};
use crate::ui::floating::FloatingWindow;

/// The window for the current mode, if it has one.
pub fn window_for(app: &App) -> Option<FloatingWindow> {
    let theme = app.theme();
    let window = match app.mode() {
        Mode::Help => help_window(app, theme),
        Mode::Sort => sort_window(app, theme),
        Mode::ColumnVisibility => columns_window(app, theme),
        Mode::Settings => settings_window(app, theme),
        Mode::Confirm => confirm_window(app.confirm()),
        Mode::Quit => FloatingWindow::new("Quit", vec![Line::from("Quit sift? (y/n)")]),
        _ => return None,
    };
    Some(window)
}

fn help_window(app: &App, theme: &Theme) -> FloatingWindow {
    let key_style = Style::default().fg(parse_color(&theme.popup.key_fg));
    let heading = Style::default()
        .fg(parse_color(&theme.popup.highlight_fg))
        .add_modifier(Modifier::BOLD);

    let rows = help_lines(app.registry(), app.keymap());
    let key_width = rows
        .iter()
        .filter(|(_, desc)| !desc.is_empty())
        .map(|(keys, _)| keys.chars().count())
        .max()
        .unwrap_or(0);

    let lines = rows
        .into_iter()
        .map(|(keys, desc)| {
            if desc.is_empty() {
                Line::from(Span::styled(keys, heading))
            } else {
                Line::from(vec![
                    Span::styled(format!("{keys:<key_width$}  "), key_style),
                    Span::raw(desc),
                ])
            }
        })
        .collect();

    let max_height = app.area().height.saturating_sub(4).max(3);
    FloatingWindow::new("Help", lines)
        .with_max_height(max_height)
        .with_scroll(app.help_scroll())
}

/// One cursor row: `> label` when selected.
fn choice(label: String, selected: bool, theme: &Theme) -> Line<'static> {
    if selected {
        Line::from(Span::styled(
            format!("> {label}"),
            Style::default()
                .fg(parse_color(&theme.popup.highlight_fg))
                .add_modifier(Modifier::BOLD),
        ))
    } else {
        Line::from(format!("  {label}"))
    }
}

fn sort_window(app: &App, theme: &Theme) -> FloatingWindow {
    let key = app.active_pane().sort_key();
    let lines = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let arrow = if *column == key.column {
                format!(" {}", key.direction.arrow())
            } else {
                String::new()
            };
            choice(
                format!("{}{arrow}", column.label()),
                i == app.list_cursor(),
                theme,
            )
        })
        .collect();
    FloatingWindow::new("Sort", lines)
}

fn columns_window(app: &App, theme: &Theme) -> FloatingWindow {
    let columns = app.active_pane().columns();
    let lines = Column::ALL
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let check = if columns.contains(*column) { "[x]" } else { "[ ]" };
            choice(
                format!("{check} {}", column.label()),
                i == app.list_cursor(),
                theme,
            )
        })
        .collect();
    FloatingWindow::new("Columns", lines)
}

fn settings_window(app: &App, theme: &Theme) -> FloatingWindow {
    let width = Setting::ALL
        .iter()
        .map(|s| s.label().len())
        .max()
        .unwrap_or(0);
    let lines = Setting::ALL
        .iter()
        .enumerate()
        .map(|(i, setting)| {
            choice(
                format!("{:<width$}  {}", setting.label(), app.setting_value(*setting)),
                i == app.list_cursor(),
                theme,
            )
        })
        .collect();
    FloatingWindow::new("Settings", lines)
}

fn confirm_window(action: Option<&ConfirmAction>) -> FloatingWindow {
    let mut lines = Vec::new();
    match action {
        Some(ConfirmAction::Remove(paths)) => {
            let noun = if paths.len() == 1 { "entry" } else { "entries" };
            lines.push(Line::from(format!("Remove {} {noun}?", paths.len())));
            for path in paths.iter().take(5) {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                lines.push(Line::from(format!("  {name}")));
            }
            if paths.len() > 5 {
                lines.push(Line::from(format!("  ... and {} more", paths.len() - 5)));
            }
        }
        None => lines.push(Line::from("Nothing to confirm.")),
    }
    lines.push(Line::from(""));
    lines.push(Line::from("(y/n)"));
    FloatingWindow::new("Confirm", lines)
}
