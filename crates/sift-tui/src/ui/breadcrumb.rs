//! Header rendering: breadcrumb trail plus the view-mode and mark summary.

use std::path::Path;

use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use sift_core::fs::path::home_dir;
use sift_core::{parse_color, Pane, Theme};

/// Breadcrumb spans for `dir`, with the home directory shown as `~`.
///
/// Example: `" ~ / projects / sift"`.
pub fn breadcrumb_spans(dir: &Path, home: Option<&Path>, theme: &Theme) -> Vec<Span<'static>> {
    let path_fg = parse_color(&theme.header.path_fg);
    let sep_style = Style::default().fg(parse_color(&theme.header.view_mode_fg));
    let comp_style = Style::default().fg(path_fg);

    match home.and_then(|h| dir.strip_prefix(h).ok()) {
        Some(rest) => {
            let mut parts = vec![Span::styled(
                " ~",
                Style::default().fg(path_fg).add_modifier(Modifier::BOLD),
            )];
            for component in rest.components() {
                parts.push(Span::styled(" / ", sep_style));
                parts.push(Span::styled(
                    component.as_os_str().to_string_lossy().into_owned(),
                    comp_style,
                ));
            }
            parts
        }
        None => vec![Span::styled(format!(" {}", dir.display()), comp_style)],
    }
}

/// Second header row: view mode, filter and mark count of the active pane.
pub fn summary_line(pane: &Pane, theme: &Theme) -> Line<'static> {
    let style = Style::default().fg(parse_color(&theme.header.view_mode_fg));
    let mut text = format!(" {}", pane.view_mode().label());
    if !pane.query().is_empty() {
        text.push_str(&format!("  filter \"{}\"", pane.query()));
    }
    let marks = pane.marks().len();
    if marks > 0 {
        text.push_str(&format!("  {marks} marked"));
    }
    Line::from(Span::styled(text, style))
}

/// Renders the two header rows for the active pane.
pub fn render_header(f: &mut Frame, area: Rect, pane: &Pane, theme: &Theme) {
    let bg = parse_color(&theme.header.bg);
    let home = home_dir();
    let lines = vec![
        Line::from(breadcrumb_spans(pane.cwd(), home.as_deref(), theme)),
        summary_line(pane, theme),
    ];
    let header = Paragraph::new(lines).style(Style::default().bg(bg));
    f.render_widget(header, area);
}
