//! File list pane rendering.
//!
//! Each row shows the enabled columns in `ls -l` order with the name last.
//! Column widths follow the widest cell of the listed entries; the header
//! with the column labels sits in the top border.

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};
use sift_core::{parse_color, Column, ColumnSet, EntryKind, FileEntry, Pane, Theme};

use crate::icons::{icon_for_entry, marker_for_entry};

/// Column widths for the non-name columns, in display order.
pub fn column_widths(entries: &[FileEntry], columns: &ColumnSet) -> Vec<(Column, usize)> {
    columns
        .iter()
        .filter(|c| *c != Column::Name)
        .map(|column| {
            let widest = entries
                .iter()
                .map(|e| column.cell(e).chars().count())
                .max()
                .unwrap_or(0);
            (column, widest.max(column_label(column).len()))
        })
        .collect()
}

/// Short header label for a column.
fn column_label(column: Column) -> &'static str {
    match column {
        Column::Permissions => "Perms",
        Column::Size => "Size",
        Column::Type => "Type",
        Column::User => "User",
        Column::Group => "Group",
        Column::DateModified => "Modified",
        Column::Name => "Name",
    }
}

fn pad(text: &str, width: usize, right_align: bool) -> String {
    if right_align {
        format!("{text:>width$}")
    } else {
        format!("{text:<width$}")
    }
}

/// One list row for `entry`.
pub fn entry_row(
    entry: &FileEntry,
    widths: &[(Column, usize)],
    marked: bool,
    show_icons: bool,
    theme: &Theme,
) -> Line<'static> {
    let mark_span = if marked {
        Span::styled(
            "* ",
            Style::default()
                .fg(parse_color(&theme.panel.marked_fg))
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::raw("  ")
    };

    let mut spans = vec![mark_span];
    for (column, width) in widths {
        let cell = pad(column.cell(entry), *width, *column == Column::Size);
        spans.push(Span::raw(format!("{cell} ")));
    }

    let icon = if show_icons {
        icon_for_entry(entry)
    } else {
        marker_for_entry(entry)
    };
    spans.push(Span::styled(
        format!("{icon}{}", entry.name()),
        entry_style(entry, marked, theme),
    ));
    Line::from(spans)
}

/// Header line listing the enabled columns, matching [`entry_row`] layout.
pub fn header_line(widths: &[(Column, usize)], theme: &Theme) -> Line<'static> {
    let style = Style::default()
        .fg(parse_color(&theme.panel.column_header_fg))
        .add_modifier(Modifier::BOLD);
    let mut text = String::from("  ");
    for (column, width) in widths {
        text.push_str(&pad(column_label(*column), *width, *column == Column::Size));
        text.push(' ');
    }
    text.push_str(column_label(Column::Name));
    Line::from(Span::styled(text, style))
}

/// Renders one pane as a bordered, scrollable list.
pub fn render_pane(
    f: &mut Frame,
    area: Rect,
    pane: &Pane,
    is_active: bool,
    show_icons: bool,
    theme: &Theme,
) {
    let entries = pane.visible();
    let widths = column_widths(entries, pane.columns());

    let items: Vec<ListItem> = entries
        .iter()
        .map(|entry| {
            ListItem::new(entry_row(
                entry,
                &widths,
                pane.is_marked(entry.path()),
                show_icons,
                theme,
            ))
        })
        .collect();

    let border_color = if is_active {
        parse_color(&theme.panel.active_border_fg)
    } else {
        parse_color(&theme.panel.border_fg)
    };

    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(header_line(&widths, theme))
        .border_style(Style::default().fg(border_color));
    if let Some(err) = pane.load_error() {
        block = block.title_bottom(Span::styled(
            format!(" {err} "),
            Style::default().fg(parse_color(&theme.statusbar.error_fg)),
        ));
    }

    let list = List::new(items).block(block).highlight_style(
        Style::default()
            .fg(parse_color(&theme.panel.selected_fg))
            .bg(parse_color(&theme.panel.selected_bg))
            .add_modifier(Modifier::BOLD),
    );

    let mut state = ListState::default()
        .with_offset(pane.offset())
        .with_selected(pane.selection());
    f.render_stateful_widget(list, area, &mut state);
}

fn entry_style(entry: &FileEntry, marked: bool, theme: &Theme) -> Style {
    if marked {
        return Style::default().fg(parse_color(&theme.panel.marked_fg));
    }
    match entry.kind() {
        EntryKind::Directory => Style::default()
            .fg(parse_color(&theme.panel.dir_fg))
            .add_modifier(Modifier::BOLD),
        EntryKind::Symlink => Style::default().fg(parse_color(&theme.panel.symlink_fg)),
        _ if entry.is_hidden() => Style::default().fg(parse_color(&theme.panel.hidden_fg)),
        EntryKind::Executable => Style::default().fg(parse_color(&theme.panel.executable_fg)),
        _ => Style::default(),
    }
}
