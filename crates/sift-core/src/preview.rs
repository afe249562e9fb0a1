//! Side-panel preview controller.
//!
//! [`PreviewController`] is a pure state machine. The UI feeds it a
//! [`PreviewRequest`] whenever the selection (or anything else that affects
//! the side panel) changes, plus timer and graphics completions, and carries
//! out the returned [`PreviewEffect`]s. Image previews are debounced; at most
//! one image is pending or on screen at a time, and an on-screen image is
//! cleared exactly once when it goes stale.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::fs::entry::FileEntry;
use crate::fs::ops::read_directory;
use crate::fs::preview::{self as file_preview, EntryInfo};
use crate::nav::filter::{filter_entries, SortKey, ViewMode};

/// Default delay between a selection change and an image placement.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// Text shown after the terminal turned out not to handle images.
pub const DEGRADED_MESSAGE: &str = "Image previews are off for this session: \
the terminal did not answer the graphics protocol. Showing file info instead.";

const DEGRADATION_MARKERS: &[&str] = &["does not support the graphics protocol", "i/o timeout"];

/// A rectangle in terminal cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash)]
pub struct CellRect {
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

impl CellRect {
    pub fn new(x: u16, y: u16, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// What the terminal can do with images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GraphicsSupport {
    Compatible,
    Unsupported,
    /// The probe failed or placements stopped working.
    #[default]
    Unknown,
}

/// Limits that shape preview content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreviewLimits {
    pub max_text_lines: usize,
    pub max_image_bytes: u64,
    pub debounce: Duration,
}

impl Default for PreviewLimits {
    fn default() -> Self {
        Self {
            max_text_lines: file_preview::MAX_TEXT_LINES,
            max_image_bytes: file_preview::MAX_IMAGE_BYTES,
            debounce: DEBOUNCE,
        }
    }
}

/// Snapshot of everything the side panel depends on.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PreviewRequest {
    /// The side panel is on screen.
    pub panel_visible: bool,
    /// Previews are enabled; otherwise the info block is shown.
    pub previews_enabled: bool,
    pub selection: Option<FileEntry>,
    /// Error from reading the active pane's directory.
    pub load_error: Option<String>,
    pub view_mode: ViewMode,
    pub sort_key: SortKey,
    /// Preview area in cells, used for image placement.
    pub rect: CellRect,
    /// Rows available for text.
    pub text_height: usize,
}

impl PreviewRequest {
    fn selected_path(&self) -> Option<&Path> {
        self.selection.as_ref().map(FileEntry::path)
    }
}

/// Content of the side panel.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PreviewContent {
    #[default]
    None,
    Info(EntryInfo),
    Directory(Vec<FileEntry>),
    Text {
        path: PathBuf,
        lines: Vec<String>,
    },
    /// An image is pending or placed; the panel itself stays blank.
    Image {
        path: PathBuf,
    },
    Binary(String),
    Error(String),
    Degraded,
}

impl PreviewContent {
    /// Plain-text rendering for the kinds that are just text.
    pub fn message_lines(&self) -> Vec<String> {
        match self {
            Self::Info(info) => info.to_lines(),
            Self::Binary(summary) => vec![summary.clone()],
            Self::Error(message) => {
                let mut lines = vec!["Error".to_string(), String::new()];
                lines.extend(message.lines().map(str::to_string));
                lines
            }
            Self::Degraded => vec![DEGRADED_MESSAGE.to_string()],
            Self::Directory(entries) if entries.is_empty() => vec!["Empty directory.".to_string()],
            Self::Text { lines, .. } => lines.clone(),
            Self::None | Self::Directory(_) | Self::Image { .. } => Vec::new(),
        }
    }
}

/// Side effects the event loop must carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewEffect {
    /// Start a timer that reports back with `token` after `delay`.
    ScheduleTimer { token: u64, delay: Duration },
    CancelTimer { token: u64 },
    /// Thumbnail `path` and place it at `rect`; report back with `token`.
    PlaceImage {
        token: u64,
        path: PathBuf,
        rect: CellRect,
    },
    ClearImages,
}

#[derive(Debug, Clone)]
struct Pending {
    token: u64,
    path: PathBuf,
    /// The timer fired while another place was in flight.
    fired: bool,
}

#[derive(Debug, Clone, Copy)]
struct InFlight {
    token: u64,
    /// The selection moved on after the place was issued.
    stale: bool,
}

/// Debounced preview state machine.
#[derive(Debug, Clone)]
pub struct PreviewController {
    support: GraphicsSupport,
    degraded: bool,
    limits: PreviewLimits,
    next_token: u64,
    request: PreviewRequest,
    pending: Option<Pending>,
    in_flight: Option<InFlight>,
    active: bool,
    content: PreviewContent,
}

impl PreviewController {
    pub fn new(support: GraphicsSupport, limits: PreviewLimits) -> Self {
        Self {
            support,
            degraded: false,
            limits,
            next_token: 1,
            request: PreviewRequest::default(),
            pending: None,
            in_flight: None,
            active: false,
            content: PreviewContent::None,
        }
    }

    pub fn content(&self) -> &PreviewContent {
        &self.content
    }

    pub fn support(&self) -> GraphicsSupport {
        self.support
    }

    /// An image is placed on screen.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn pending_path(&self) -> Option<&Path> {
        self.pending.as_ref().map(|p| p.path.as_path())
    }

    /// Recomputes the panel for a new request.
    ///
    /// Cancels any pending timer and clears an on-screen image before
    /// deciding what to show.
    pub fn update(&mut self, request: PreviewRequest) -> Vec<PreviewEffect> {
        let mut effects = Vec::new();
        self.request = request;

        if let Some(pending) = self.pending.take().filter(|p| !p.fired) {
            effects.push(PreviewEffect::CancelTimer {
                token: pending.token,
            });
        }
        if let Some(in_flight) = self.in_flight.as_mut() {
            in_flight.stale = true;
        }
        if self.active {
            self.active = false;
            effects.push(PreviewEffect::ClearImages);
        }

        self.content = self.compute_content();

        let image_path = match &self.content {
            PreviewContent::Image { path } => Some(path.clone()),
            _ => None,
        };
        if let Some(path) = image_path {
            let token = self.take_token();
            tracing::debug!(path = %path.display(), token, "image preview scheduled");
            self.pending = Some(Pending {
                token,
                path,
                fired: false,
            });
            effects.push(PreviewEffect::ScheduleTimer {
                token,
                delay: self.limits.debounce,
            });
        }

        effects
    }

    /// A debounce timer fired.
    ///
    /// While an earlier place is still running the image stays pending and
    /// is placed once that place returns.
    pub fn on_timer(&mut self, token: u64) -> Vec<PreviewEffect> {
        let Some(pending) = self.pending.take_if(|p| p.token == token && !p.fired) else {
            tracing::debug!(token, "discarding stale preview timer");
            return Vec::new();
        };
        if self.request.selected_path() != Some(pending.path.as_path()) {
            return Vec::new();
        }

        if self.in_flight.is_some() {
            tracing::debug!(token, "place in flight, holding image");
            self.pending = Some(Pending {
                fired: true,
                ..pending
            });
            return Vec::new();
        }
        self.place(pending)
    }

    /// The graphics worker finished the placement issued with `token`.
    pub fn on_place_finished(&mut self, token: u64, result: Result<(), String>) -> Vec<PreviewEffect> {
        let Some(in_flight) = self.in_flight.take_if(|f| f.token == token) else {
            return Vec::new();
        };

        let mut effects = self.finish_place(in_flight, result);
        if let Some(held) = self.pending.take_if(|p| p.fired) {
            if self.degraded {
                self.content = PreviewContent::Degraded;
            } else if self.request.selected_path() == Some(held.path.as_path()) {
                effects.extend(self.place(held));
            }
        }
        effects
    }

    fn place(&mut self, pending: Pending) -> Vec<PreviewEffect> {
        self.in_flight = Some(InFlight {
            token: pending.token,
            stale: false,
        });
        vec![PreviewEffect::PlaceImage {
            token: pending.token,
            path: pending.path,
            rect: self.request.rect,
        }]
    }

    fn finish_place(&mut self, in_flight: InFlight, result: Result<(), String>) -> Vec<PreviewEffect> {
        match result {
            Ok(()) if in_flight.stale => vec![PreviewEffect::ClearImages],
            Ok(()) => {
                self.active = true;
                Vec::new()
            }
            Err(message) if is_degradation(&message) => {
                tracing::warn!(%message, "graphics protocol unavailable, disabling image previews");
                self.support = GraphicsSupport::Unknown;
                self.degraded = true;
                if !in_flight.stale {
                    self.content = PreviewContent::Degraded;
                }
                Vec::new()
            }
            Err(message) => {
                if !in_flight.stale {
                    self.content = PreviewContent::Error(message);
                }
                Vec::new()
            }
        }
    }

    fn take_token(&mut self) -> u64 {
        let token = self.next_token;
        self.next_token += 1;
        token
    }

    fn compute_content(&self) -> PreviewContent {
        let req = &self.request;
        if !req.panel_visible {
            return PreviewContent::None;
        }
        if let Some(err) = &req.load_error {
            return PreviewContent::Error(err.clone());
        }
        let Some(entry) = &req.selection else {
            return PreviewContent::None;
        };
        if !req.previews_enabled {
            return PreviewContent::Info(EntryInfo::from_entry(entry));
        }

        if entry.is_dir() {
            return match read_directory(entry.path()) {
                Ok(entries) => PreviewContent::Directory(filter_entries(
                    &entries,
                    req.view_mode,
                    "",
                    req.sort_key,
                )),
                Err(e) => PreviewContent::Error(e.to_string()),
            };
        }

        if file_preview::is_image_path(entry.path()) {
            if self.degraded {
                return PreviewContent::Degraded;
            }
            if self.support == GraphicsSupport::Compatible
                && entry.size() <= self.limits.max_image_bytes
            {
                return PreviewContent::Image {
                    path: entry.path().to_path_buf(),
                };
            }
        }

        if file_preview::is_text(entry.path()) {
            let max = req.text_height.min(self.limits.max_text_lines);
            return match file_preview::read_text_lines(entry.path(), max) {
                Ok(lines) => PreviewContent::Text {
                    path: entry.path().to_path_buf(),
                    lines,
                },
                Err(e) => PreviewContent::Error(e.to_string()),
            };
        }

        PreviewContent::Binary(file_preview::binary_summary(entry))
    }
}

/// Whether a graphics error means the terminal cannot show images at all.
pub fn is_degradation(message: &str) -> bool {
    DEGRADATION_MARKERS.iter().any(|m| message.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fs::entry::FileEntry;
    use std::fs;
    use tempfile::TempDir;

    const RECT: CellRect = CellRect {
        x: 40,
        y: 3,
        width: 38,
        height: 20,
    };

    struct Fixture {
        tmp: TempDir,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            fs::write(tmp.path().join("a.png"), b"\x89PNG\r\n\x1a\n\0\0").unwrap();
            fs::write(tmp.path().join("b.png"), b"\x89PNG\r\n\x1a\n\0\0").unwrap();
            fs::write(tmp.path().join("c.png"), b"\x89PNG\r\n\x1a\n\0\0").unwrap();
            fs::write(tmp.path().join("notes.txt"), "one\ntwo\nthree\n").unwrap();
            fs::write(tmp.path().join("blob.bin"), b"\0\x01\x02").unwrap();
            fs::create_dir(tmp.path().join("dir")).unwrap();
            fs::write(tmp.path().join("dir").join("inner.txt"), "x").unwrap();
            fs::create_dir(tmp.path().join("empty")).unwrap();
            Self { tmp }
        }

        fn entry(&self, name: &str) -> FileEntry {
            let path = self.tmp.path().join(name);
            let meta = fs::symlink_metadata(&path).unwrap();
            FileEntry::new(path, &meta)
        }

        fn request(&self, name: Option<&str>) -> PreviewRequest {
            PreviewRequest {
                panel_visible: true,
                previews_enabled: true,
                selection: name.map(|n| self.entry(n)),
                load_error: None,
                view_mode: ViewMode::All,
                sort_key: SortKey::default(),
                rect: RECT,
                text_height: 30,
            }
        }
    }

    fn controller() -> PreviewController {
        PreviewController::new(GraphicsSupport::Compatible, PreviewLimits::default())
    }

    fn count_places(effects: &[PreviewEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, PreviewEffect::PlaceImage { .. }))
            .count()
    }

    fn count_clears(effects: &[PreviewEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, PreviewEffect::ClearImages))
            .count()
    }

    fn scheduled_token(effects: &[PreviewEffect]) -> u64 {
        effects
            .iter()
            .find_map(|e| match e {
                PreviewEffect::ScheduleTimer { token, .. } => Some(*token),
                _ => None,
            })
            .expect("a timer should be scheduled")
    }

    #[test]
    fn image_selection_schedules_debounce_without_placing() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let effects = ctl.update(fx.request(Some("a.png")));

        assert_eq!(count_places(&effects), 0);
        assert!(matches!(
            effects.as_slice(),
            [PreviewEffect::ScheduleTimer { delay, .. }] if *delay == DEBOUNCE
        ));
        assert_eq!(ctl.pending_path(), Some(fx.tmp.path().join("a.png").as_path()));
    }

    #[test]
    fn debounce_places_only_the_last_image() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let mut all = Vec::new();

        // t=0: A
        let first = ctl.update(fx.request(Some("a.png")));
        let token_a = scheduled_token(&first);
        all.extend(first);

        // t=50: B cancels A
        let second = ctl.update(fx.request(Some("b.png")));
        assert!(second.contains(&PreviewEffect::CancelTimer { token: token_a }));
        let token_b = scheduled_token(&second);
        all.extend(second);

        // A's timer might still be delivered; it must be ignored.
        all.extend(ctl.on_timer(token_a));
        // t=250: B fires
        let fired = ctl.on_timer(token_b);
        all.extend(fired.clone());

        assert_eq!(count_places(&all), 1);
        assert_eq!(
            fired,
            vec![PreviewEffect::PlaceImage {
                token: token_b,
                path: fx.tmp.path().join("b.png"),
                rect: RECT,
            }]
        );
    }

    #[test]
    fn clear_is_deferred_until_in_flight_place_returns() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("b.png"))));
        assert_eq!(count_places(&ctl.on_timer(token)), 1);

        // t=300: a text file is selected while B is still being placed.
        let moved = ctl.update(fx.request(Some("notes.txt")));
        assert_eq!(count_clears(&moved), 0);
        assert!(matches!(ctl.content(), PreviewContent::Text { .. }));

        let done = ctl.on_place_finished(token, Ok(()));
        assert_eq!(done, vec![PreviewEffect::ClearImages]);
        assert!(!ctl.is_active());
        assert!(matches!(ctl.content(), PreviewContent::Text { .. }));
    }

    #[test]
    fn second_place_waits_for_the_one_in_flight() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token_b = scheduled_token(&ctl.update(fx.request(Some("b.png"))));
        assert_eq!(count_places(&ctl.on_timer(token_b)), 1);

        // C's timer fires while B is still being placed.
        let token_c = scheduled_token(&ctl.update(fx.request(Some("c.png"))));
        assert!(ctl.on_timer(token_c).is_empty());

        let done = ctl.on_place_finished(token_b, Ok(()));
        assert_eq!(
            done,
            vec![
                PreviewEffect::ClearImages,
                PreviewEffect::PlaceImage {
                    token: token_c,
                    path: fx.tmp.path().join("c.png"),
                    rect: RECT,
                },
            ]
        );
        assert!(ctl.on_place_finished(token_c, Ok(())).is_empty());
        assert!(ctl.is_active());
    }

    #[test]
    fn held_image_dropped_when_text_is_selected() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let mut all = Vec::new();
        let token_b = scheduled_token(&ctl.update(fx.request(Some("b.png"))));
        all.extend(ctl.on_timer(token_b));
        let token_c = scheduled_token(&ctl.update(fx.request(Some("c.png"))));
        all.extend(ctl.on_timer(token_c));
        all.extend(ctl.update(fx.request(Some("notes.txt"))));
        all.extend(ctl.on_place_finished(token_b, Ok(())));
        all.extend(ctl.on_place_finished(token_c, Err("late".to_string())));

        assert_eq!(count_places(&all), 1);
        assert_eq!(count_clears(&all), 1);
        assert!(!ctl.is_active());
        assert!(matches!(ctl.content(), PreviewContent::Text { .. }));
    }

    #[test]
    fn active_image_is_cleared_exactly_once() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("a.png"))));
        ctl.on_timer(token);
        assert!(ctl.on_place_finished(token, Ok(())).is_empty());
        assert!(ctl.is_active());

        let mut effects = ctl.update(fx.request(Some("notes.txt")));
        effects.extend(ctl.update(fx.request(Some("blob.bin"))));
        effects.extend(ctl.update(fx.request(None)));

        assert_eq!(count_clears(&effects), 1);
        assert!(!ctl.is_active());
    }

    #[test]
    fn hiding_the_panel_cancels_and_clears() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("a.png"))));
        ctl.on_timer(token);
        ctl.on_place_finished(token, Ok(()));

        let hidden = PreviewRequest {
            panel_visible: false,
            ..fx.request(Some("a.png"))
        };
        let effects = ctl.update(hidden);
        assert_eq!(effects, vec![PreviewEffect::ClearImages]);
        assert_eq!(ctl.content(), &PreviewContent::None);
    }

    #[test]
    fn stale_timer_after_selection_left_is_ignored() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("a.png"))));
        let effects = ctl.update(fx.request(Some("notes.txt")));
        assert_eq!(effects, vec![PreviewEffect::CancelTimer { token }]);
        assert!(ctl.on_timer(token).is_empty());
    }

    #[test]
    fn degradation_disables_images_for_the_session() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("a.png"))));
        ctl.on_timer(token);

        let effects = ctl.on_place_finished(token, Err("kitten: i/o timeout".to_string()));
        assert!(effects.is_empty());
        assert_eq!(ctl.support(), GraphicsSupport::Unknown);
        assert_eq!(ctl.content(), &PreviewContent::Degraded);
        assert!(!ctl.is_active());

        let later = ctl.update(fx.request(Some("b.png")));
        assert!(later.is_empty());
        assert_eq!(ctl.content(), &PreviewContent::Degraded);
        assert!(ctl.pending_path().is_none());
    }

    #[test]
    fn other_graphics_errors_become_error_content() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let token = scheduled_token(&ctl.update(fx.request(Some("a.png"))));
        ctl.on_timer(token);
        ctl.on_place_finished(token, Err("image error: bad header".to_string()));

        assert_eq!(
            ctl.content(),
            &PreviewContent::Error("image error: bad header".to_string())
        );
        assert_eq!(ctl.support(), GraphicsSupport::Compatible);
        assert_eq!(
            ctl.content().message_lines(),
            vec!["Error", "", "image error: bad header"]
        );
    }

    #[test]
    fn unsupported_terminal_never_schedules() {
        let fx = Fixture::new();
        let mut ctl = PreviewController::new(GraphicsSupport::Unsupported, PreviewLimits::default());
        let effects = ctl.update(fx.request(Some("a.png")));
        assert!(effects.is_empty());
        assert!(matches!(ctl.content(), PreviewContent::Binary(_)));
    }

    #[test]
    fn oversized_image_is_not_previewed() {
        let fx = Fixture::new();
        let limits = PreviewLimits {
            max_image_bytes: 4,
            ..PreviewLimits::default()
        };
        let mut ctl = PreviewController::new(GraphicsSupport::Compatible, limits);
        assert!(ctl.update(fx.request(Some("a.png"))).is_empty());
    }

    #[test]
    fn text_preview_is_bounded_by_height() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let req = PreviewRequest {
            text_height: 2,
            ..fx.request(Some("notes.txt"))
        };
        ctl.update(req);
        match ctl.content() {
            PreviewContent::Text { lines, .. } => assert_eq!(lines, &["one", "two"]),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn directory_and_empty_directory() {
        let fx = Fixture::new();
        let mut ctl = controller();
        ctl.update(fx.request(Some("dir")));
        match ctl.content() {
            PreviewContent::Directory(entries) => {
                assert_eq!(entries.len(), 1);
                assert_eq!(entries[0].name(), "inner.txt");
            }
            other => panic!("expected directory, got {other:?}"),
        }

        ctl.update(fx.request(Some("empty")));
        assert_eq!(ctl.content().message_lines(), vec!["Empty directory."]);
    }

    #[test]
    fn disabled_previews_show_info() {
        let fx = Fixture::new();
        let mut ctl = controller();
        let req = PreviewRequest {
            previews_enabled: false,
            ..fx.request(Some("a.png"))
        };
        assert!(ctl.update(req).is_empty());
        assert!(matches!(ctl.content(), PreviewContent::Info(_)));
    }

    #[test]
    fn no_selection_and_load_errors() {
        let fx = Fixture::new();
        let mut ctl = controller();
        ctl.update(fx.request(None));
        assert_eq!(ctl.content(), &PreviewContent::None);

        let req = PreviewRequest {
            load_error: Some("permission denied: /root".to_string()),
            ..fx.request(None)
        };
        ctl.update(req);
        assert_eq!(
            ctl.content(),
            &PreviewContent::Error("permission denied: /root".to_string())
        );
    }

    #[test]
    fn degradation_markers() {
        assert!(is_degradation("terminal does not support the graphics protocol"));
        assert!(is_degradation("read: i/o timeout"));
        assert!(!is_degradation("no such file"));
    }
}
