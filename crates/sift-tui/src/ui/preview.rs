//! Side panel rendering: preview content, entry info, or command output.
//!
//! Text previews are syntax-highlighted via `syntect` when it knows the
//! file type. Images are drawn by the terminal outside of ratatui, so the
//! panel leaves their area blank.

use std::path::Path;
use std::sync::OnceLock;

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use sift_core::fs::preview::AccessRow;
use sift_core::{parse_color, ColumnSet, EntryInfo, PreviewContent, Theme};
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::SyntaxSet;

use crate::ui::panel::{column_widths, entry_row};

const FALLBACK_SYNTAX_THEME: &str = "base16-ocean.dark";

/// Lazily initialised syntax set.
fn syntax_set() -> &'static SyntaxSet {
    static SS: OnceLock<SyntaxSet> = OnceLock::new();
    SS.get_or_init(SyntaxSet::load_defaults_newlines)
}

/// Lazily initialised theme set.
fn theme_set() -> &'static ThemeSet {
    static TS: OnceLock<ThemeSet> = OnceLock::new();
    TS.get_or_init(ThemeSet::load_defaults)
}

/// What the side panel shows this frame.
pub enum PanelView<'a> {
    Preview(&'a PreviewContent),
    /// Command output or an error message.
    Output { text: &'a str, is_error: bool },
}

/// Options that affect how content is drawn.
pub struct PanelStyle<'a> {
    pub syntax_theme: &'a str,
    pub show_icons: bool,
    /// Columns of the active pane, reused for directory listings.
    pub columns: &'a ColumnSet,
}

/// Renders the side panel.
pub fn render_side_panel(
    f: &mut Frame,
    area: Rect,
    view: &PanelView<'_>,
    style: &PanelStyle<'_>,
    theme: &Theme,
) {
    let (title, lines, bg) = match view {
        PanelView::Output { text, is_error } => ("Output", output_lines(text, *is_error, theme), None),
        PanelView::Preview(content) => {
            let (lines, bg) = content_lines(content, style, theme);
            (content_title(content), lines, bg)
        }
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(
            format!(" {title} "),
            Style::default().fg(parse_color(&theme.preview.title_fg)),
        ))
        .border_style(Style::default().fg(parse_color(&theme.preview.border_fg)));

    let base_style = bg.map(|bg| Style::default().bg(bg)).unwrap_or_default();
    let paragraph = Paragraph::new(pad_lines(lines, block.inner(area), base_style))
        .block(block)
        .style(base_style);
    f.render_widget(paragraph, area);
}

/// Pads every line to the inner width and fills the remaining height, so
/// every cell is rewritten and no stale text survives a shorter preview.
fn pad_lines(mut lines: Vec<Line<'static>>, inner: Rect, style: Style) -> Vec<Line<'static>> {
    let width = usize::from(inner.width);
    for line in &mut lines {
        let current = line.width();
        if current < width {
            line.spans.push(Span::styled(" ".repeat(width - current), style));
        }
    }
    while lines.len() < usize::from(inner.height) {
        lines.push(Line::from(Span::styled(" ".repeat(width), style)));
    }
    lines
}

fn content_title(content: &PreviewContent) -> &'static str {
    match content {
        PreviewContent::Info(_) => "Info",
        PreviewContent::Directory(_) => "Directory",
        PreviewContent::Error(_) => "Error",
        _ => "Preview",
    }
}

fn content_lines(
    content: &PreviewContent,
    style: &PanelStyle<'_>,
    theme: &Theme,
) -> (Vec<Line<'static>>, Option<Color>) {
    let error_style = Style::default().fg(parse_color(&theme.preview.error_fg));
    match content {
        PreviewContent::None | PreviewContent::Image { .. } => (Vec::new(), None),
        PreviewContent::Info(info) => (info_lines(info, theme), None),
        PreviewContent::Directory(entries) if entries.is_empty() => (
            content
                .message_lines()
                .into_iter()
                .map(Line::from)
                .collect(),
            None,
        ),
        PreviewContent::Directory(entries) => {
            let widths = column_widths(entries, style.columns);
            let lines = entries
                .iter()
                .map(|e| entry_row(e, &widths, false, style.show_icons, theme))
                .collect();
            (lines, None)
        }
        PreviewContent::Text { path, lines } => {
            let (highlighted, bg) = highlight_lines(path, lines, style.syntax_theme);
            (highlighted.into_iter().map(Line::from).collect(), bg)
        }
        PreviewContent::Error(_) | PreviewContent::Degraded => (
            content
                .message_lines()
                .into_iter()
                .map(|l| Line::from(Span::styled(l, error_style)))
                .collect(),
            None,
        ),
        PreviewContent::Binary(_) => (
            content
                .message_lines()
                .into_iter()
                .map(|l| Line::from(Span::styled(l, Style::default().fg(Color::DarkGray))))
                .collect(),
            None,
        ),
    }
}

fn output_lines(text: &str, is_error: bool, theme: &Theme) -> Vec<Line<'static>> {
    let fg = if is_error {
        parse_color(&theme.preview.error_fg)
    } else {
        parse_color(&theme.command_bar.output_fg)
    };
    text.lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(fg))))
        .collect()
}

/// Field list followed by the Owner/Group/Other access table.
pub fn info_lines(info: &EntryInfo, theme: &Theme) -> Vec<Line<'static>> {
    let label_style = Style::default()
        .fg(parse_color(&theme.preview.label_fg))
        .add_modifier(Modifier::BOLD);
    let width = info.fields.iter().map(|(k, _)| k.len()).max().unwrap_or(0);

    let mut lines: Vec<Line<'static>> = info
        .fields
        .iter()
        .map(|(k, v)| {
            Line::from(vec![
                Span::styled(format!("{k:<width$}  "), label_style),
                Span::raw(v.clone()),
            ])
        })
        .collect();

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("{:<6} {:<5} {:<5} {}", "", "Read", "Write", info.execute_label),
        label_style,
    )));
    for row in &info.access {
        lines.push(access_line(row, theme));
    }
    lines
}

fn access_line(row: &AccessRow, theme: &Theme) -> Line<'static> {
    let allowed = Style::default().fg(parse_color(&theme.preview.allowed_fg));
    let denied = Style::default().fg(parse_color(&theme.preview.denied_fg));
    let cell = |ok: bool, width: usize| {
        let (text, style) = if ok { ("yes", allowed) } else { ("no", denied) };
        Span::styled(format!("{text:<width$}"), style)
    };
    Line::from(vec![
        Span::raw(format!("{:<6} ", row.who)),
        cell(row.read, 6),
        cell(row.write, 6),
        cell(row.execute, 0),
    ])
}

/// Applies syntect highlighting to lines, converting to ratatui Spans.
/// Returns the highlighted spans and the syntect theme's background color.
fn highlight_lines(
    path: &Path,
    lines: &[String],
    syntax_theme_name: &str,
) -> (Vec<Vec<Span<'static>>>, Option<Color>) {
    let ss = syntax_set();
    let ts = theme_set();

    let Some(th) = ts
        .themes
        .get(syntax_theme_name)
        .or_else(|| ts.themes.get(FALLBACK_SYNTAX_THEME))
        .or_else(|| ts.themes.values().next())
    else {
        return (plain_spans(lines), None);
    };

    let syntax = path
        .extension()
        .and_then(|ext| ss.find_syntax_by_extension(&ext.to_string_lossy()))
        .or_else(|| {
            path.file_name()
                .and_then(|name| ss.find_syntax_by_extension(&name.to_string_lossy()))
        });
    let Some(syntax) = syntax else {
        return (plain_spans(lines), None);
    };

    let theme_bg = th.settings.background.map(|c| Color::Rgb(c.r, c.g, c.b));
    let mut highlighter = syntect::easy::HighlightLines::new(syntax, th);

    let highlighted = lines
        .iter()
        .map(|line| {
            let regions = highlighter.highlight_line(line, ss).unwrap_or_default();

            regions
                .into_iter()
                .map(|(style, text)| {
                    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);
                    let bg = Color::Rgb(style.background.r, style.background.g, style.background.b);
                    let mut modifier = Modifier::empty();
                    if style.font_style.contains(FontStyle::BOLD) {
                        modifier |= Modifier::BOLD;
                    }
                    if style.font_style.contains(FontStyle::ITALIC) {
                        modifier |= Modifier::ITALIC;
                    }
                    if style.font_style.contains(FontStyle::UNDERLINE) {
                        modifier |= Modifier::UNDERLINED;
                    }
                    Span::styled(
                        text.to_string(),
                        Style::default().fg(fg).bg(bg).add_modifier(modifier),
                    )
                })
                .collect()
        })
        .collect();

    (highlighted, theme_bg)
}

fn plain_spans(lines: &[String]) -> Vec<Vec<Span<'static>>> {
    lines.iter().map(|l| vec![Span::raw(l.clone())]).collect()
}
