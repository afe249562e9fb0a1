use std::path::{Path, PathBuf};
use std::sync::Arc;

use ratatui::layout::Rect;
use sift_core::command::{self, CallableOutput, CommandContext, CommandEnv, CommandResult};
use sift_core::fs::path::home_dir;
use sift_core::nav::history::cycle_index;
use sift_core::{
    Action, ActionCategory, ActionRegistry, Column, CommandError, CommandHistory, Config, Edge,
    Effect, GraphicsSupport, Keymap, LoginShell, Mode, ModeState, Pane, Panes, PreviewContent,
    PreviewController, PreviewEffect, PreviewRequest, Shell, Side, SplitView, Theme, UserCommands,
    ViewMode,
};

use crate::editor::LineEditor;
use crate::input::InputAction;
use crate::layout::AppLayout;

/// Rows of the live settings window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Setting {
    Previews,
    SplitView,
    ViewMode,
    Icons,
}

impl Setting {
    pub const ALL: [Setting; 4] = [
        Setting::Previews,
        Setting::SplitView,
        Setting::ViewMode,
        Setting::Icons,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Self::Previews => "Previews",
            Self::SplitView => "Split view",
            Self::ViewMode => "View mode",
            Self::Icons => "Icons",
        }
    }
}

/// What a pending confirmation will do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    Remove(Vec<PathBuf>),
}

/// Text shown in place of the preview (command output or an error).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub is_error: bool,
}

/// Prefix completions for the command line, cycled with Tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Completions {
    pub matches: Vec<String>,
    pub index: Option<usize>,
}

/// The whole application state.
///
/// Transitions consume the app and return the next one; side effects for
/// the graphics layer are queued and collected with [`App::take_effects`].
pub struct App {
    mode: ModeState,
    panes: Panes,
    split: SplitView,
    previews_enabled: bool,
    show_icons: bool,
    editor: LineEditor,
    completions: Completions,
    history: CommandHistory,
    user_commands: UserCommands,
    shell: Arc<dyn Shell>,
    keymap: Keymap,
    theme: Theme,
    registry: ActionRegistry,
    syntax_theme: String,
    preview: PreviewController,
    last_request: Option<PreviewRequest>,
    effects: Vec<PreviewEffect>,
    area: Rect,
    layout: AppLayout,
    notice: Option<Notice>,
    help_scroll: usize,
    list_cursor: usize,
    confirm: Option<ConfirmAction>,
    should_quit: bool,
}

impl App {
    /// Creates the app with both panes showing `start_dir`.
    pub fn new(start_dir: &Path, config: &Config) -> Self {
        let general = &config.general;
        let pane = Pane::new(general.view_mode, general.sort_key(), general.column_set())
            .change_directory(start_dir);
        let split = general.split_view;

        Self {
            mode: ModeState::new(),
            panes: Panes::new(pane),
            split,
            previews_enabled: config.preview.enabled,
            show_icons: general.show_icons,
            editor: LineEditor::new(),
            completions: Completions::default(),
            history: CommandHistory::in_memory(),
            user_commands: user_commands(config),
            shell: Arc::new(LoginShell::from_env()),
            keymap: Keymap::default(),
            theme: Theme::default(),
            registry: ActionRegistry::new(),
            syntax_theme: config.preview.syntax_theme.clone(),
            preview: PreviewController::new(GraphicsSupport::Unknown, config.preview.limits()),
            last_request: None,
            effects: Vec::new(),
            area: Rect::new(0, 0, 80, 24),
            layout: AppLayout::compute(Rect::new(0, 0, 80, 24), split),
            notice: None,
            help_scroll: 0,
            list_cursor: 0,
            confirm: None,
            should_quit: false,
        }
    }

    pub fn with_keymap(self, keymap: Keymap) -> Self {
        Self { keymap, ..self }
    }

    pub fn with_theme(self, theme: Theme) -> Self {
        Self { theme, ..self }
    }

    pub fn with_history(self, history: CommandHistory) -> Self {
        Self { history, ..self }
    }

    pub fn with_shell(self, shell: Arc<dyn Shell>) -> Self {
        Self { shell, ..self }
    }

    /// Sets the probed graphics support; must be called before the first
    /// preview sync.
    pub fn with_graphics_support(mut self, support: GraphicsSupport, config: &Config) -> Self {
        self.preview = PreviewController::new(support, config.preview.limits());
        self.last_request = None;
        self.sync()
    }

    // --- accessors ---

    pub fn mode(&self) -> Mode {
        self.mode.current()
    }

    pub fn panes(&self) -> &Panes {
        &self.panes
    }

    pub fn active_pane(&self) -> &Pane {
        self.panes.active()
    }

    pub fn split(&self) -> SplitView {
        self.split
    }

    pub fn previews_enabled(&self) -> bool {
        self.previews_enabled
    }

    pub fn show_icons(&self) -> bool {
        self.show_icons
    }

    pub fn editor(&self) -> &LineEditor {
        &self.editor
    }

    pub fn completions(&self) -> &Completions {
        &self.completions
    }

    pub fn keymap(&self) -> &Keymap {
        &self.keymap
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn registry(&self) -> &ActionRegistry {
        &self.registry
    }

    pub fn syntax_theme(&self) -> &str {
        &self.syntax_theme
    }

    pub fn preview_content(&self) -> &PreviewContent {
        self.preview.content()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn layout(&self) -> &AppLayout {
        &self.layout
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn help_scroll(&self) -> usize {
        self.help_scroll
    }

    pub fn list_cursor(&self) -> usize {
        self.list_cursor
    }

    pub fn confirm(&self) -> Option<&ConfirmAction> {
        self.confirm.as_ref()
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Current value of a live setting, for display.
    pub fn setting_value(&self, setting: Setting) -> String {
        let on_off = |b: bool| if b { "on" } else { "off" }.to_string();
        match setting {
            Setting::Previews => on_off(self.previews_enabled),
            Setting::SplitView => self.split.label().to_string(),
            Setting::ViewMode => self.active_pane().view_mode().label().to_string(),
            Setting::Icons => on_off(self.show_icons),
        }
    }

    // --- event entry points ---

    /// Recomputes the layout for a new terminal size.
    pub fn resize(mut self, width: u16, height: u16) -> Self {
        self.area = Rect::new(0, 0, width, height);
        self.layout = AppLayout::compute(self.area, self.split);
        self.sync()
    }

    /// Applies one resolved key press.
    pub fn handle_input(mut self, input: InputAction) -> Self {
        if input == InputAction::None {
            return self;
        }
        if self.mode.is(Mode::Normal) {
            self.notice = None;
        }

        self = match self.mode() {
            Mode::Normal => self.handle_normal(input),
            Mode::Filter => self.handle_filter(input),
            Mode::Command => self.handle_command(input),
            Mode::Goto => self.handle_goto(input),
            Mode::Help => self.handle_help(input),
            Mode::Quit => self.handle_quit(input),
            Mode::Select => self.handle_select(input),
            Mode::Sort => self.handle_sort(input),
            Mode::ColumnVisibility => self.handle_columns(input),
            Mode::Settings => self.handle_settings(input),
            Mode::Confirm => self.handle_confirm(input),
            mode => self.handle_prompt(mode, input),
        };
        self.sync()
    }

    /// A debounce timer fired.
    pub fn on_timer(mut self, token: u64) -> Self {
        let effects = self.preview.on_timer(token);
        self.effects.extend(effects);
        self
    }

    /// The graphics worker finished a placement.
    pub fn on_place_finished(mut self, token: u64, result: Result<(), String>) -> Self {
        let effects = self.preview.on_place_finished(token, result);
        self.effects.extend(effects);
        self
    }

    /// Hands queued graphics effects to the event loop.
    pub fn take_effects(mut self) -> (Self, Vec<PreviewEffect>) {
        let effects = std::mem::take(&mut self.effects);
        (self, effects)
    }

    // --- per-mode handlers ---

    fn handle_normal(self, input: InputAction) -> Self {
        let InputAction::Action(action) = input else {
            return self;
        };
        match action {
            Action::Open => self.open_selected(),
            Action::GoParent => self.go_parent(),
            Action::GoHome => match home_dir() {
                Some(home) => self.update_active(|p| p.change_directory(&home)),
                None => self.with_error("cd: home directory is unknown"),
            },
            Action::Refresh => self.update_active(Pane::reload),
            Action::Filter => {
                let query = self.active_pane().query().to_string();
                self.enter_text_mode(Mode::Filter, &query)
            }
            Action::CommandLine => {
                let mut app = self.enter_text_mode(Mode::Command, "");
                app.history.reset_cursor();
                app.completions = Completions::default();
                app
            }
            Action::Goto => self.enter_text_mode(Mode::Goto, ""),
            Action::Rename => {
                let name = self
                    .active_pane()
                    .selected()
                    .map(|e| e.name().to_string())
                    .unwrap_or_default();
                self.enter_text_mode(Mode::Rename, &name)
            }
            Action::AddFile => self.enter_text_mode(Mode::AddFile, ""),
            Action::Mkdir => self.enter_text_mode(Mode::Mkdir, ""),
            Action::Remove => self.enter_text_mode(Mode::Remove, ""),
            Action::Move => self.enter_text_mode(Mode::Move, ""),
            Action::Copy => self.enter_text_mode(Mode::Copy, ""),
            Action::ChangeDir => self.enter_text_mode(Mode::ChangeDir, ""),
            Action::ViewAll => self.set_view_mode(ViewMode::All),
            Action::ViewList => self.set_view_mode(ViewMode::HideHidden),
            Action::ViewDirs => self.set_view_mode(ViewMode::DirsOnly),
            Action::ViewFiles => self.set_view_mode(ViewMode::FilesOnly),
            Action::TogglePreview => Self {
                previews_enabled: !self.previews_enabled,
                ..self
            },
            Action::ToggleSplit => self.toggle_split(),
            Action::SwapPane => self.swap_pane(),
            Action::Sort => {
                let current = self.active_pane().sort_key().column;
                let cursor = Column::ALL.iter().position(|c| *c == current).unwrap_or(0);
                self.enter_list_mode(Mode::Sort, cursor)
            }
            Action::Columns => self.enter_list_mode(Mode::ColumnVisibility, 0),
            Action::Settings => self.enter_list_mode(Mode::Settings, 0),
            Action::SelectMode => self.enter_mode(Mode::Select),
            Action::ToggleMark => self.toggle_mark(),
            Action::Help => Self {
                help_scroll: 0,
                ..self.enter_mode(Mode::Help)
            },
            Action::Quit => self.enter_mode(Mode::Quit),
            Action::Cancel => self,
            movement => self.move_selection(movement),
        }
    }

    fn handle_filter(mut self, input: InputAction) -> Self {
        match input {
            InputAction::Edit(key) => {
                if self.editor.apply(key) {
                    let query = self.editor.text().to_string();
                    self = self.update_active(|p| p.apply_filter(&query));
                }
                self
            }
            InputAction::Action(Action::Open) => {
                self.editor.clear();
                self.enter_mode(Mode::Normal)
            }
            InputAction::Action(Action::Cancel) => {
                self.editor.clear();
                self.mode.cancel();
                self.update_active(|p| p.apply_filter(""))
            }
            InputAction::Action(Action::SwapPane) => {
                let mut app = self.swap_pane();
                let query = app.active_pane().query().to_string();
                app.editor.set(&query);
                app
            }
            InputAction::Action(Action::Quit) => self.enter_mode(Mode::Quit),
            InputAction::Action(
                movement @ (Action::CursorUp | Action::CursorDown | Action::PageUp | Action::PageDown),
            ) => self.move_selection(movement),
            _ => self,
        }
    }

    fn handle_command(mut self, input: InputAction) -> Self {
        match input {
            InputAction::Edit(key) => {
                if self.editor.apply(key) {
                    self.history.reset_cursor();
                    self.completions = Completions {
                        matches: self.history.matches(self.editor.text()),
                        index: None,
                    };
                }
                self
            }
            InputAction::Action(Action::CursorUp) => {
                if let Some(line) = self.history.previous().map(str::to_string) {
                    self.editor.set(&line);
                }
                self
            }
            InputAction::Action(Action::CursorDown) => {
                if let Some(line) = self.history.next().map(str::to_string) {
                    self.editor.set(&line);
                }
                self
            }
            InputAction::Action(Action::SwapPane) => {
                let len = self.completions.matches.len();
                self.completions.index = cycle_index(self.completions.index, len, 1);
                if let Some(line) = self
                    .completions
                    .index
                    .and_then(|i| self.completions.matches.get(i))
                    .cloned()
                {
                    self.editor.set(&line);
                }
                self
            }
            InputAction::Action(Action::Open) => self.submit_command(),
            InputAction::Action(Action::Cancel) => {
                self.editor.clear();
                self.mode.cancel();
                self
            }
            InputAction::Action(Action::Quit) => self.enter_mode(Mode::Quit),
            _ => self,
        }
    }

    fn handle_goto(mut self, input: InputAction) -> Self {
        match input {
            InputAction::Edit(key) => {
                self.editor.apply(key);
                self
            }
            InputAction::Action(Action::Open) => {
                let delta = command::parse_relative_goto(self.editor.text());
                self.editor.clear();
                self.mode.cancel();
                match delta {
                    Some(delta) => self.update_active(|p| p.move_cursor(delta)),
                    None => self,
                }
            }
            InputAction::Action(Action::Cancel) => {
                self.editor.clear();
                self.mode.cancel();
                self
            }
            InputAction::Action(Action::Quit) => self.enter_mode(Mode::Quit),
            _ => self,
        }
    }

    fn handle_prompt(mut self, mode: Mode, input: InputAction) -> Self {
        match input {
            InputAction::Edit(key) => {
                self.editor.apply(key);
                self
            }
            InputAction::Action(Action::Open) => self.submit_prompt(mode),
            InputAction::Action(Action::Cancel) => {
                self.editor.clear();
                self.mode.cancel();
                self
            }
            InputAction::Action(Action::Quit) => self.enter_mode(Mode::Quit),
            _ => self,
        }
    }

    fn handle_help(mut self, input: InputAction) -> Self {
        let page = usize::from(self.layout.content_height);
        match input {
            InputAction::Action(Action::CursorDown) => self.help_scroll += 1,
            InputAction::Action(Action::CursorUp) => {
                self.help_scroll = self.help_scroll.saturating_sub(1)
            }
            InputAction::Action(Action::PageDown) => self.help_scroll += page,
            InputAction::Action(Action::PageUp) => {
                self.help_scroll = self.help_scroll.saturating_sub(page)
            }
            InputAction::Action(Action::CursorTop) => self.help_scroll = 0,
            InputAction::Action(Action::Cancel | Action::Help | Action::Quit) => self.mode.cancel(),
            _ => {}
        }
        self
    }

    fn handle_quit(mut self, input: InputAction) -> Self {
        match input {
            InputAction::Answer(true) | InputAction::Action(Action::Quit | Action::Open) => {
                self.should_quit = true;
            }
            InputAction::Answer(false) | InputAction::Action(Action::Cancel) => self.mode.cancel(),
            _ => {}
        }
        self
    }

    fn handle_select(self, input: InputAction) -> Self {
        let InputAction::Action(action) = input else {
            return self;
        };
        match action {
            Action::ToggleMark | Action::Open => self.toggle_mark().move_selection(Action::CursorDown),
            Action::Cancel | Action::SelectMode => {
                let mut app = self;
                app.mode.cancel();
                app
            }
            Action::Quit => self.enter_mode(Mode::Quit),
            Action::CursorUp
            | Action::CursorDown
            | Action::PageUp
            | Action::PageDown
            | Action::CursorTop
            | Action::CursorBottom => self.move_selection(action),
            _ => self,
        }
    }

    fn handle_sort(self, input: InputAction) -> Self {
        match input {
            InputAction::Action(Action::Open) => {
                let mut app = self.apply_sort();
                app.mode.cancel();
                app
            }
            InputAction::Action(Action::ToggleMark) => self.apply_sort(),
            other => self.handle_list(other, Column::ALL.len()),
        }
    }

    fn handle_columns(self, input: InputAction) -> Self {
        match input {
            InputAction::Action(Action::Open | Action::ToggleMark) => {
                let column = Column::ALL[self.list_cursor.min(Column::ALL.len() - 1)];
                self.update_active(|p| p.toggle_column(column))
            }
            other => self.handle_list(other, Column::ALL.len()),
        }
    }

    fn handle_settings(self, input: InputAction) -> Self {
        match input {
            InputAction::Action(Action::Open | Action::ToggleMark) => {
                let setting = Setting::ALL[self.list_cursor.min(Setting::ALL.len() - 1)];
                self.toggle_setting(setting)
            }
            other => self.handle_list(other, Setting::ALL.len()),
        }
    }

    /// Cursor movement and closing, shared by the list windows.
    fn handle_list(mut self, input: InputAction, len: usize) -> Self {
        let last = len.saturating_sub(1);
        match input {
            InputAction::Action(Action::CursorDown) => {
                self.list_cursor = (self.list_cursor + 1).min(last)
            }
            InputAction::Action(Action::CursorUp) => {
                self.list_cursor = self.list_cursor.saturating_sub(1)
            }
            InputAction::Action(Action::CursorTop) => self.list_cursor = 0,
            InputAction::Action(Action::CursorBottom) => self.list_cursor = last,
            InputAction::Action(Action::Cancel) => self.mode.cancel(),
            InputAction::Action(Action::Quit) => return self.enter_mode(Mode::Quit),
            _ => {}
        }
        self
    }

    fn handle_confirm(mut self, input: InputAction) -> Self {
        match input {
            InputAction::Answer(true) => {
                let pending = self.confirm.take();
                self.mode.reset();
                match pending {
                    Some(ConfirmAction::Remove(paths)) => self.remove_paths(&paths),
                    None => self,
                }
            }
            InputAction::Answer(false) | InputAction::Action(Action::Cancel) => {
                self.confirm = None;
                self.mode.cancel();
                self
            }
            _ => self,
        }
    }

    // --- commands ---

    fn submit_command(mut self) -> Self {
        let line = self.editor.text().trim().to_string();
        self.editor.clear();
        self.completions = Completions::default();
        self.mode.cancel();

        if let Some(delta) = command::parse_relative_goto(&line) {
            self.history.reset_cursor();
            return self.update_active(|p| p.move_cursor(delta));
        }

        let result = self.run(|env| command::execute(env, &line));
        if let Err(e) = self.history.append(&line) {
            tracing::warn!(error = %e, "failed to append to history");
        }
        self.apply_result(result)
    }

    fn submit_prompt(mut self, mode: Mode) -> Self {
        let text = self.editor.text().trim().to_string();
        self.editor.clear();

        let Some(name) = mode.prompt_command() else {
            self.mode.cancel();
            return self;
        };

        if mode == Mode::Remove && text.is_empty() {
            let targets = self.removal_targets();
            if targets.is_empty() {
                self.mode.cancel();
                return self.with_error("rm: nothing selected");
            }
            self.confirm = Some(ConfirmAction::Remove(targets));
            self.mode.cancel();
            return self.enter_mode(Mode::Confirm);
        }

        self.mode.cancel();
        let source = self
            .active_pane()
            .selected()
            .map(|e| e.path().display().to_string());
        let needs_source = matches!(mode, Mode::Move | Mode::Copy | Mode::Rename);

        let mut args: Vec<&str> = Vec::new();
        if needs_source {
            match &source {
                Some(src) => args.push(src),
                None => return self.with_error(&format!("{name}: nothing selected")),
            }
        }
        if !text.is_empty() {
            args.push(&text);
        }

        let result = self.run(|env| command::execute_args(env, name, &args));
        self.apply_result(result)
    }

    /// Marked paths, or else the selected one.
    fn removal_targets(&self) -> Vec<PathBuf> {
        let pane = self.active_pane();
        if !pane.marks().is_empty() {
            return pane.marks().iter().cloned().collect();
        }
        pane.selected()
            .map(|e| vec![e.path().to_path_buf()])
            .unwrap_or_default()
    }

    fn remove_paths(self, paths: &[PathBuf]) -> Self {
        let mut app = self;
        for path in paths {
            let arg = path.display().to_string();
            let result = app.run(|env| command::execute_args(env, "rm", &[arg.as_str()]));
            app = app.apply_result(result);
        }
        app.panes.update_both(Pane::clear_marks);
        app
    }

    fn run(&self, f: impl FnOnce(&CommandEnv<'_>) -> CommandResult) -> CommandResult {
        let pane = self.active_pane();
        let context = CommandContext::new(pane.cwd(), pane.selected());
        let env = CommandEnv {
            cwd: pane.cwd(),
            context: &context,
            user_commands: &self.user_commands,
            shell: self.shell.as_ref(),
        };
        f(&env)
    }

    fn apply_result(self, result: CommandResult) -> Self {
        match result {
            Ok(effect) => self.apply_effect(effect),
            Err(e) => {
                tracing::debug!(error = %e, "command failed");
                self.with_error(&e.to_string())
            }
        }
    }

    fn apply_effect(mut self, effect: Effect) -> Self {
        if let Some(dir) = &effect.cwd {
            self = self.update_active(|p| p.change_directory(dir));
        }
        if effect.refresh {
            self.panes.update_both(Pane::reload);
        }
        if let Some(view_mode) = effect.view_mode {
            self = self.set_view_mode(view_mode);
        }
        if let Some(text) = effect.output {
            self.notice = Some(Notice {
                text,
                is_error: false,
            });
        }
        if effect.open_help {
            self.help_scroll = 0;
            self.mode.enter(Mode::Help);
        }
        if effect.quit {
            self.should_quit = true;
        }
        self
    }

    // --- helpers ---

    fn enter_mode(mut self, mode: Mode) -> Self {
        self.mode.enter(mode);
        self
    }

    fn enter_text_mode(mut self, mode: Mode, initial: &str) -> Self {
        self.editor.set(initial);
        self.enter_mode(mode)
    }

    fn enter_list_mode(mut self, mode: Mode, cursor: usize) -> Self {
        self.list_cursor = cursor;
        self.enter_mode(mode)
    }

    fn with_error(mut self, text: &str) -> Self {
        self.notice = Some(Notice {
            text: text.to_string(),
            is_error: true,
        });
        self
    }

    fn update_active(mut self, f: impl FnOnce(Pane) -> Pane) -> Self {
        self.panes.update_active(f);
        self
    }

    fn move_selection(self, action: Action) -> Self {
        let page = isize::try_from(self.layout.content_height.max(1)).unwrap_or(1);
        match action {
            Action::CursorUp => self.update_active(|p| p.move_cursor(-1)),
            Action::CursorDown => self.update_active(|p| p.move_cursor(1)),
            Action::PageUp => self.update_active(|p| p.move_cursor(-page)),
            Action::PageDown => self.update_active(|p| p.move_cursor(page)),
            Action::CursorTop => self.update_active(|p| p.go_to(Edge::Top)),
            Action::CursorBottom => self.update_active(|p| p.go_to(Edge::Bottom)),
            _ => self,
        }
    }

    fn open_selected(self) -> Self {
        match self.active_pane().selected() {
            Some(entry) if entry.is_dir() => {
                let dir = entry.path().to_path_buf();
                self.update_active(|p| p.change_directory(&dir))
            }
            _ => self,
        }
    }

    fn go_parent(self) -> Self {
        let cwd = self.active_pane().cwd().to_path_buf();
        let Some(parent) = cwd.parent() else {
            return self;
        };
        let child = cwd
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.update_active(|p| p.change_directory(parent).select_name(&child))
    }

    fn set_view_mode(self, view_mode: ViewMode) -> Self {
        self.update_active(|p| p.set_view_mode(view_mode))
    }

    fn toggle_mark(self) -> Self {
        match self.active_pane().selected() {
            Some(entry) => {
                let path = entry.path().to_path_buf();
                self.update_active(|p| p.toggle_mark(&path))
            }
            None => self,
        }
    }

    fn toggle_split(mut self) -> Self {
        self.split = self.split.next();
        if self.split != SplitView::Dual && self.panes.active_side() != Side::Left {
            self.panes = self.panes.swap_active();
        }
        self.layout = AppLayout::compute(self.area, self.split);
        self
    }

    fn swap_pane(mut self) -> Self {
        if self.split == SplitView::Dual {
            self.panes = self.panes.swap_active();
        }
        self
    }

    fn apply_sort(self) -> Self {
        let column = Column::ALL[self.list_cursor.min(Column::ALL.len() - 1)];
        self.update_active(|p| p.set_sort(column))
    }

    fn toggle_setting(mut self, setting: Setting) -> Self {
        match setting {
            Setting::Previews => self.previews_enabled = !self.previews_enabled,
            Setting::SplitView => return self.toggle_split(),
            Setting::ViewMode => {
                let next = self.active_pane().view_mode().next();
                return self.set_view_mode(next);
            }
            Setting::Icons => self.show_icons = !self.show_icons,
        }
        self
    }

    /// Keeps the viewports and the side panel in step with the state.
    fn sync(mut self) -> Self {
        let height = usize::from(self.layout.content_height);
        self.panes.update_both(|p| p.scroll_into_view(height));

        let request = self.preview_request();
        if self.last_request.as_ref() != Some(&request) {
            let effects = self.preview.update(request.clone());
            self.effects.extend(effects);
            self.last_request = Some(request);
        }
        self
    }

    fn preview_request(&self) -> PreviewRequest {
        let pane = self.active_pane();
        let rect = self.layout.preview_rect();
        PreviewRequest {
            panel_visible: self.split == SplitView::Preview
                && self.notice.is_none()
                && !self.mode.current().is_floating(),
            previews_enabled: self.previews_enabled,
            selection: pane.selected().cloned(),
            load_error: pane.load_error().map(str::to_string),
            view_mode: pane.view_mode(),
            sort_key: pane.sort_key(),
            rect,
            text_height: usize::from(rect.height),
        }
    }
}

/// Aliases from `[commands]` plus the callables sift ships with.
///
/// A configured alias wins over a callable of the same name.
pub fn user_commands(config: &Config) -> UserCommands {
    let commands = UserCommands::new().with_callable("path", selected_path);
    config
        .commands
        .iter()
        .fold(commands, |commands, (name, target)| commands.with_alias(name, target))
}

/// `path`: prints the selected entry's full path, or the cwd.
fn selected_path(ctx: &CommandContext, _args: &[&str]) -> Result<CallableOutput, CommandError> {
    let path = ctx.selected.as_deref().unwrap_or(&ctx.cwd);
    Ok(CallableOutput::Text(path.display().to_string()))
}

/// Help window text: every action grouped by category with its keys.
pub fn help_lines(registry: &ActionRegistry, keymap: &Keymap) -> Vec<(String, String)> {
    let mut lines = Vec::new();
    for category in ActionCategory::ALL {
        lines.push((category.label().to_string(), String::new()));
        for desc in registry.in_category(category) {
            let keys = keymap
                .keys_for_action(desc.action)
                .map(|k| k.join(" "))
                .unwrap_or_default();
            lines.push((format!("  {keys}"), desc.description.to_string()));
        }
    }
    lines
}
