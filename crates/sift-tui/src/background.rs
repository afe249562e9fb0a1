//! Work that runs off the event loop: debounce timers and the graphics
//! worker.
//!
//! Both report back to the main loop through one unbounded mpsc channel of
//! [`LoopMessage`]s, which the loop drains with `try_recv` every frame.

use std::collections::HashMap;
use std::path::PathBuf;
use std::time::Duration;

use sift_core::fs::preview::make_thumbnail;
use sift_core::CellRect;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;

use crate::graphics::GraphicsBackend;

/// Messages sent from background tasks to the main event loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoopMessage {
    DebounceFired(u64),
    PlaceFinished {
        token: u64,
        result: Result<(), String>,
    },
}

/// A unit of work for the graphics worker, processed in submission order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GraphicsJob {
    Place {
        token: u64,
        path: PathBuf,
        rect: CellRect,
    },
    Clear,
}

/// Running debounce timers, keyed by token.
#[derive(Debug, Default)]
pub struct Timers {
    handles: HashMap<u64, JoinHandle<()>>,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a timer that posts [`LoopMessage::DebounceFired`] after `delay`.
    pub fn schedule(&mut self, token: u64, delay: Duration, tx: UnboundedSender<LoopMessage>) {
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(LoopMessage::DebounceFired(token));
        });
        if let Some(old) = self.handles.insert(token, handle) {
            old.abort();
        }
    }

    pub fn cancel(&mut self, token: u64) {
        if let Some(handle) = self.handles.remove(&token) {
            handle.abort();
        }
    }

    /// Forgets a timer that has already fired.
    pub fn fired(&mut self, token: u64) {
        self.handles.remove(&token);
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }
}

impl Drop for Timers {
    fn drop(&mut self) {
        for (_, handle) in self.handles.drain() {
            handle.abort();
        }
    }
}

/// Spawns the graphics worker on a blocking thread.
///
/// Place jobs thumbnail the image into a temp file (removed when the job
/// ends, whatever the outcome) and hand it to `backend`. Each place reports
/// a [`LoopMessage::PlaceFinished`]; clear failures are only logged.
pub fn spawn_graphics_worker(
    mut backend: Box<dyn GraphicsBackend>,
    tx: UnboundedSender<LoopMessage>,
) -> (UnboundedSender<GraphicsJob>, JoinHandle<()>) {
    let (job_tx, mut job_rx) = mpsc::unbounded_channel::<GraphicsJob>();
    let handle = tokio::task::spawn_blocking(move || {
        while let Some(job) = job_rx.blocking_recv() {
            match job {
                GraphicsJob::Place { token, path, rect } => {
                    let result = place_thumbnail(backend.as_mut(), &path, rect);
                    if let Err(message) = &result {
                        tracing::error!(path = %path.display(), %message, "image placement failed");
                    }
                    if tx.send(LoopMessage::PlaceFinished { token, result }).is_err() {
                        break;
                    }
                }
                GraphicsJob::Clear => {
                    if let Err(e) = backend.clear() {
                        tracing::warn!(error = %format!("{e:#}"), "clearing images failed");
                    }
                }
            }
        }
        tracing::debug!("graphics worker stopped");
    });
    (job_tx, handle)
}

fn place_thumbnail(
    backend: &mut dyn GraphicsBackend,
    path: &std::path::Path,
    rect: CellRect,
) -> Result<(), String> {
    let thumbnail = make_thumbnail(path).map_err(|e| e.to_string())?;
    backend
        .place(thumbnail.path(), rect)
        .map_err(|e| format!("{e:#}"))
}

/// Drains every message currently queued on `rx`.
pub fn drain(rx: &mut UnboundedReceiver<LoopMessage>) -> Vec<LoopMessage> {
    let mut messages = Vec::new();
    while let Ok(msg) = rx.try_recv() {
        messages.push(msg);
    }
    messages
}
