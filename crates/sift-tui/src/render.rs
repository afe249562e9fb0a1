//! Frame composition: the base layer first, then at most one floating
//! window on top.

use ratatui::Frame;
use sift_core::{Mode, Side, SplitView};

use crate::app::App;
use crate::input::InputState;
use crate::layout::AppLayout;
use crate::ui::breadcrumb::render_header;
use crate::ui::command_bar::{render_command_bar, render_search_row, CommandBarProps};
use crate::ui::floating::render_floating;
use crate::ui::panel::render_pane;
use crate::ui::preview::{render_side_panel, PanelStyle, PanelView};
use crate::ui::statusbar::{render_statusbar, StatusBarProps};
use crate::ui::windows::window_for;

/// Main render function. Composes the full UI each frame.
pub fn render(f: &mut Frame, app: &App, input: &InputState) {
    let area = f.area();
    let layout = AppLayout::compute(area, app.split());
    let theme = app.theme();
    let pane = app.active_pane();

    render_header(f, layout.header, pane, theme);
    render_search_row(f, layout.search, app.mode(), app.editor(), pane.query(), theme);
    render_panes(f, app, &layout);

    let goto_input = (app.mode() == Mode::Goto).then(|| app.editor().text());
    let status = StatusBarProps {
        mode: app.mode(),
        selection: pane.selection(),
        total: pane.visible().len(),
        selected_entry: pane.selected(),
        sort_key: pane.sort_key(),
        message: app.notice().map(|n| (n.text.as_str(), n.is_error)),
        pending_keys: input.pending(),
        goto_input,
    };
    render_statusbar(f, layout.status, &status, theme);

    let bar = CommandBarProps {
        mode: app.mode(),
        editor: app.editor(),
        source: pane.selected().map(|e| e.name()),
        completions: app.completions(),
    };
    render_command_bar(f, layout.command, &bar, theme);

    if let Some(window) = window_for(app) {
        render_floating(f.buffer_mut(), area, &window, theme);
    }
}

fn render_panes(f: &mut Frame, app: &App, layout: &AppLayout) {
    let theme = app.theme();
    let panes = app.panes();
    let dual = app.split() == SplitView::Dual;

    // Outside dual split only the active pane is on screen.
    let left_side = if dual { Side::Left } else { panes.active_side() };
    render_pane(
        f,
        layout.left,
        panes.get(left_side),
        !dual || panes.active_side() == Side::Left,
        app.show_icons(),
        theme,
    );

    let Some(right) = layout.right else {
        return;
    };
    if dual {
        render_pane(
            f,
            right,
            panes.right(),
            panes.active_side() == Side::Right,
            app.show_icons(),
            theme,
        );
        return;
    }

    let view = match app.notice() {
        Some(notice) => PanelView::Output {
            text: &notice.text,
            is_error: notice.is_error,
        },
        None => PanelView::Preview(app.preview_content()),
    };
    let style = PanelStyle {
        syntax_theme: app.syntax_theme(),
        show_icons: app.show_icons(),
        columns: app.active_pane().columns(),
    };
    render_side_panel(f, right, &view, &style, theme);
}
