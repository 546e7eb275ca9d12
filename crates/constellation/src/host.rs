//! The terminal as a host environment for the renderer.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use constellation_background::{FrameHandle, Host, ListenerId, TerminalCanvas};
use constellation_config::Config;
use constellation_core::Theme;

/// Terminal host: the whole window is the container, and frames fire on a
/// fixed interval from the event loop.
#[derive(Debug)]
pub struct TerminalHost {
    /// Terminal size in cells.
    cols: u16,
    rows: u16,
    /// Logical pixels per cell.
    cell_width: f64,
    cell_height: f64,
    /// Reported device pixel ratio.
    pixel_ratio: f64,
    reduced_motion: bool,
    /// Delay between frames.
    frame_interval: Duration,
    /// Scheduled frame and when it becomes due.
    pending: Option<(FrameHandle, Instant)>,
    listeners: BTreeSet<u64>,
    next_id: u64,
    canvas: TerminalCanvas,
}

impl TerminalHost {
    /// Create a host for a terminal of `cols` x `rows` cells.
    pub fn new(config: &Config, theme: Theme, cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cell_width: config.cell_width,
            cell_height: config.cell_height,
            pixel_ratio: config.pixel_ratio,
            reduced_motion: config.reduced_motion,
            frame_interval: Duration::from_millis(config.frame_interval_ms),
            pending: None,
            listeners: BTreeSet::new(),
            next_id: 1,
            canvas: TerminalCanvas::new(theme.palette().background),
        }
    }

    /// Record a new terminal size.
    pub fn set_size(&mut self, cols: u16, rows: u16) {
        self.cols = cols;
        self.rows = rows;
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Whether anyone wants resize notifications.
    pub fn has_resize_listener(&self) -> bool {
        !self.listeners.is_empty()
    }

    /// Time until the scheduled frame is due, if one is scheduled.
    pub fn time_until_frame(&self, now: Instant) -> Option<Duration> {
        self.pending
            .map(|(_, due)| due.saturating_duration_since(now))
    }

    /// Hand out the scheduled frame if it is due.
    pub fn take_due_frame(&mut self, now: Instant) -> Option<FrameHandle> {
        match self.pending {
            Some((handle, due)) if due <= now => {
                self.pending = None;
                Some(handle)
            }
            _ => None,
        }
    }

    /// The canvas, for rendering.
    pub fn canvas_view(&self) -> &TerminalCanvas {
        &self.canvas
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl Host for TerminalHost {
    type Canvas = TerminalCanvas;

    fn container_size(&self) -> Option<(f64, f64)> {
        if self.cols == 0 || self.rows == 0 {
            return None;
        }
        Some((
            f64::from(self.cols) * self.cell_width,
            f64::from(self.rows) * self.cell_height,
        ))
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.pixel_ratio
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        let handle = FrameHandle(self.next());
        self.pending = Some((handle, Instant::now() + self.frame_interval));
        Some(handle)
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        if matches!(self.pending, Some((pending, _)) if pending == handle) {
            self.pending = None;
        }
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = self.next();
        self.listeners.insert(id);
        ListenerId(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id.0);
    }

    fn canvas(&mut self) -> &mut TerminalCanvas {
        &mut self.canvas
    }
}
