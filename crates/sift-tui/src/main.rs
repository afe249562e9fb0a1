//! sift: a vim-modal terminal file manager built with ratatui.
//!
//! This binary initialises the terminal, runs the main event loop,
//! and restores the terminal on exit or panic.

mod app;
mod background;
mod editor;
mod graphics;
mod icons;
mod input;
mod layout;
mod render;
mod ui;

use std::io;
use std::panic;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crossterm::{
    event::{self, Event},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use sift_core::{
    CommandHistory, Config, ConfigPaths, Keymap, LoginShell, PreviewEffect, Theme,
};
use tokio::sync::mpsc::{self, UnboundedSender};
use tracing_subscriber::EnvFilter;

use crate::app::App;
use crate::background::{drain, spawn_graphics_worker, GraphicsJob, LoopMessage, Timers};
use crate::graphics::{support_from_probe, KittenIcat};
use crate::input::{handle_key, InputState};
use crate::render::render;

type Tui = Terminal<CrosstermBackend<io::Stdout>>;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

fn setup_terminal() -> anyhow::Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> anyhow::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Installs a panic hook that restores the terminal before printing the panic.
fn install_panic_hook() {
    let original_hook = panic::take_hook();
    panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));
}

/// Logs go to a file so they never interfere with the screen. The level
/// comes from `SIFT_LOG` and defaults to `info`.
fn init_tracing() -> anyhow::Result<()> {
    let path = std::env::temp_dir().join("sift.log");
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let filter = EnvFilter::try_from_env("SIFT_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_env_filter(filter)
        .init();
    Ok(())
}

/// The directory given as the first argument, or the working directory.
fn start_dir() -> anyhow::Result<PathBuf> {
    if let Some(arg) = std::env::args().nth(1) {
        let dir = PathBuf::from(arg);
        if dir.is_dir() {
            return Ok(dir);
        }
        tracing::warn!(dir = %dir.display(), "start directory is not a directory");
    }
    Ok(std::env::current_dir()?)
}

fn build_app(terminal: &Tui) -> anyhow::Result<App> {
    // The probe talks to the terminal, so it runs after raw mode is on.
    let picker = match ratatui_image::picker::Picker::from_query_stdio() {
        Ok(p) => Some(p),
        Err(e) => {
            tracing::warn!("terminal graphics probe failed: {e}");
            None
        }
    };
    let support = support_from_probe(picker.as_ref());
    tracing::info!(?support, "graphics support");

    let start = start_dir()?;
    let app = match ConfigPaths::discover() {
        Some(paths) => {
            let config = Config::load_or_default(&paths.config());
            App::new(&start, &config)
                .with_keymap(Keymap::load_or_default(&paths.keymap()))
                .with_theme(Theme::load_or_default(&paths.theme()))
                .with_history(CommandHistory::load(&paths.history()))
                .with_graphics_support(support, &config)
        }
        None => {
            tracing::warn!("no config directory; using defaults");
            let config = Config::default();
            App::new(&start, &config).with_graphics_support(support, &config)
        }
    };

    let size = terminal.size()?;
    Ok(app
        .with_shell(Arc::new(LoginShell::from_env()))
        .resize(size.width, size.height))
}

/// Hands preview effects to the timers and the graphics worker.
fn dispatch_effects(
    effects: Vec<PreviewEffect>,
    timers: &mut Timers,
    loop_tx: &UnboundedSender<LoopMessage>,
    job_tx: &UnboundedSender<GraphicsJob>,
) {
    for effect in effects {
        match effect {
            PreviewEffect::ScheduleTimer { token, delay } => {
                timers.schedule(token, delay, loop_tx.clone());
            }
            PreviewEffect::CancelTimer { token } => timers.cancel(token),
            PreviewEffect::PlaceImage { token, path, rect } => {
                if job_tx.send(GraphicsJob::Place { token, path, rect }).is_err() {
                    tracing::error!("graphics worker is gone");
                }
            }
            PreviewEffect::ClearImages => {
                if job_tx.send(GraphicsJob::Clear).is_err() {
                    tracing::error!("graphics worker is gone");
                }
            }
        }
    }
}

async fn run(terminal: &mut Tui) -> anyhow::Result<()> {
    let mut app = build_app(terminal)?;
    let mut input_state = InputState::new();

    let (loop_tx, mut loop_rx) = mpsc::unbounded_channel::<LoopMessage>();
    let (job_tx, worker) = spawn_graphics_worker(Box::new(KittenIcat::new()), loop_tx.clone());
    let mut timers = Timers::new();

    loop {
        terminal.draw(|f| render(f, &app, &input_state))?;

        for message in drain(&mut loop_rx) {
            app = match message {
                LoopMessage::DebounceFired(token) => {
                    timers.fired(token);
                    app.on_timer(token)
                }
                LoopMessage::PlaceFinished { token, result } => {
                    app.on_place_finished(token, result)
                }
            };
        }

        let (next, effects) = app.take_effects();
        app = next;
        dispatch_effects(effects, &mut timers, &loop_tx, &job_tx);

        if app.should_quit() {
            break;
        }

        if event::poll(POLL_INTERVAL)? {
            match event::read()? {
                Event::Key(key) => {
                    let (action, new_state) =
                        handle_key(key, app.mode(), &input_state, app.keymap());
                    input_state = new_state;
                    app = app.handle_input(action);
                }
                Event::Resize(width, height) => {
                    app = app.resize(width, height);
                }
                _ => {}
            }
        }
    }

    // Images live outside ratatui's buffer, so they are cleared explicitly.
    let _ = job_tx.send(GraphicsJob::Clear);
    drop(job_tx);
    if let Err(e) = worker.await {
        tracing::warn!(error = %e, "graphics worker did not shut down cleanly");
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing()?;
    install_panic_hook();

    let mut terminal = setup_terminal()?;
    let result = run(&mut terminal).await;
    restore_terminal(&mut terminal)?;

    if let Err(e) = &result {
        tracing::error!("{e:#}");
    }
    tracing::info!("sift exited");
    result
}
