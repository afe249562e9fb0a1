//! Floating windows drawn over the base layer.
//!
//! A window is sized to its content, centred on the base area and drawn
//! with its title set into the top border as `┤ TITLE ├`.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
};
use sift_core::{parse_color, Theme};

/// Column of the top border where the title starts.
const TITLE_COLUMN: u16 = 2;

/// Fallback origin when the window does not fit inside the base.
const FALLBACK_ORIGIN: (u16, u16) = (10, 10);

/// Content of one floating window.
#[derive(Debug, Clone, Default)]
pub struct FloatingWindow {
    pub title: String,
    pub lines: Vec<Line<'static>>,
    /// Rows to skip from the top of `lines`.
    pub scroll: usize,
    /// Cap on the content height; taller content scrolls.
    pub max_height: Option<u16>,
}

impl FloatingWindow {
    pub fn new(title: impl Into<String>, lines: Vec<Line<'static>>) -> Self {
        Self {
            title: title.into(),
            lines,
            scroll: 0,
            max_height: None,
        }
    }

    pub fn with_scroll(self, scroll: usize) -> Self {
        Self { scroll, ..self }
    }

    pub fn with_max_height(self, max_height: u16) -> Self {
        Self {
            max_height: Some(max_height),
            ..self
        }
    }

    /// Outer width and height, borders and one column of padding included.
    pub fn dimensions(&self) -> (u16, u16) {
        let content_width = self
            .lines
            .iter()
            .map(Line::width)
            .max()
            .unwrap_or(0)
            .max(Span::raw(self.title.as_str()).width() + 4);
        let content_height = self.lines.len().max(1);
        let content_height = match self.max_height {
            Some(max) => content_height.min(usize::from(max.max(1))),
            None => content_height,
        };
        let width = u16::try_from(content_width + 4).unwrap_or(u16::MAX);
        let height = u16::try_from(content_height + 2).unwrap_or(u16::MAX);
        (width, height)
    }
}

/// Where a `width` x `height` window goes on `base`.
///
/// Centred when it fits, otherwise at the fallback origin. The result is
/// clipped to `base` so it can always be drawn.
pub fn placement(base: Rect, width: u16, height: u16) -> Rect {
    let fits = width <= base.width && height <= base.height;
    let (x, y) = if fits {
        (
            base.x + (base.width - width) / 2,
            base.y + (base.height - height) / 2,
        )
    } else {
        (base.x + FALLBACK_ORIGIN.0, base.y + FALLBACK_ORIGIN.1)
    };
    Rect::new(x, y, width, height).intersection(base)
}

/// The `┤ TITLE ├` label, cut to fit a window `width` cells wide.
pub fn title_label(title: &str, width: u16) -> String {
    let max = usize::from(width.saturating_sub(2)).saturating_sub(2);
    let label = format!("┤ {title} ├");
    label.chars().take(max).collect()
}

/// Draws `window` centred on `base`.
pub fn render_floating(buf: &mut Buffer, base: Rect, window: &FloatingWindow, theme: &Theme) {
    let (width, height) = window.dimensions();
    let area = placement(base, width, height);
    if area.width < 2 || area.height < 2 {
        return;
    }

    let border_fg = parse_color(&theme.popup.border_fg);
    let title_fg = parse_color(&theme.popup.title_fg);

    Clear.render(area, buf);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_fg));
    let inner = block.inner(area);
    block.render(area, buf);

    let label = title_label(&window.title, area.width);
    if !label.is_empty() {
        buf.set_string(
            area.x + TITLE_COLUMN,
            area.y,
            &label,
            Style::default().fg(title_fg),
        );
    }

    let padded = Rect {
        x: inner.x.saturating_add(1).min(inner.right()),
        width: inner.width.saturating_sub(2),
        ..inner
    };
    let lines: Vec<Line<'static>> = window
        .lines
        .iter()
        .skip(window.scroll)
        .take(usize::from(padded.height))
        .cloned()
        .collect();
    Paragraph::new(lines).render(padded, buf);
}
