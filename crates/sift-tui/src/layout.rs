//! Screen geometry: fixed rows, pane widths and the preview rectangle.

use ratatui::layout::Rect;
use sift_core::{CellRect, SplitView};

pub const HEADER_HEIGHT: u16 = 2;
pub const SEARCH_HEIGHT: u16 = 1;
pub const STATUS_HEIGHT: u16 = 2;
pub const COMMAND_HEIGHT: u16 = 2;

const FIXED_ROWS: u16 = HEADER_HEIGHT + SEARCH_HEIGHT + STATUS_HEIGHT + COMMAND_HEIGHT;
const MIN_VIEWPORT: u16 = 3;

/// Rectangles for every base-layer component.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppLayout {
    pub header: Rect,
    pub search: Rect,
    /// The left (or only) pane, border included.
    pub left: Rect,
    /// The side area when the split is open, border included.
    pub right: Option<Rect>,
    pub status: Rect,
    pub command: Rect,
    pub viewport_height: u16,
    /// List rows inside a pane border.
    pub content_height: u16,
    pub content_width: u16,
}

impl AppLayout {
    /// Computes the layout for a terminal of `area` size.
    pub fn compute(area: Rect, split: SplitView) -> Self {
        let viewport_height = area.height.saturating_sub(FIXED_ROWS).max(MIN_VIEWPORT);
        let content_height = viewport_height.saturating_sub(2).max(1);
        let pane_width = if split.is_open() {
            area.width / 2
        } else {
            area.width
        };
        let content_width = pane_width.saturating_sub(2).max(1);

        let mut y = area.y;
        let mut row = |height: u16| {
            let rect = clip(Rect::new(area.x, y, area.width, height), area);
            y = y.saturating_add(height);
            rect
        };
        let header = row(HEADER_HEIGHT);
        let search = row(SEARCH_HEIGHT);
        let panes = row(viewport_height);
        let status = row(STATUS_HEIGHT);
        let command = row(COMMAND_HEIGHT);

        let left = Rect {
            width: pane_width.min(panes.width),
            ..panes
        };
        let right = split.is_open().then(|| Rect {
            x: panes.x + left.width,
            width: panes.width - left.width,
            ..panes
        });

        Self {
            header,
            search,
            left,
            right,
            status,
            command,
            viewport_height,
            content_height,
            content_width,
        }
    }

    /// Interior of the side area in cells, where images are placed.
    pub fn preview_rect(&self) -> CellRect {
        match self.right {
            Some(r) if r.width > 2 && r.height > 2 => {
                CellRect::new(r.x + 1, r.y + 1, r.width - 2, r.height - 2)
            }
            _ => CellRect::default(),
        }
    }
}

/// Intersection of `rect` with `bounds`; an empty rect at the bottom edge
/// when they do not overlap.
fn clip(rect: Rect, bounds: Rect) -> Rect {
    let clipped = rect.intersection(bounds);
    if clipped.width == 0 || clipped.height == 0 {
        Rect::new(rect.x, bounds.bottom(), rect.width, 0)
    } else {
        clipped
    }
}
