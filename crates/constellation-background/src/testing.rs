//! Headless host and recording canvas for driving the renderer without a
//! display.
//!
//! Only built for this crate's tests or with the `testing` feature.

use std::collections::BTreeSet;

use crate::host::{DrawContext, FrameHandle, Host, ListenerId, Paint, Point};
use crate::surface::Transform;

/// One recorded drawing call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Op {
    Resize { width: u32, height: u32 },
    Clear { x: f64, y: f64, width: f64, height: f64 },
    Line { from: Point, to: Point, paint: Paint, width: f64 },
    Circle { center: Point, radius: f64, paint: Paint },
}

/// A [`DrawContext`] that records every call.
#[derive(Debug, Clone, Default)]
pub struct RecordingCanvas {
    pub ops: Vec<Op>,
    pub backing: (u32, u32),
    pub display: (f64, f64),
    pub transform: Transform,
}

impl RecordingCanvas {
    /// Number of clears recorded, one per drawn frame.
    pub fn count_clears(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Clear { .. }))
            .count()
    }

    pub fn count_lines(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Line { .. }))
            .count()
    }

    pub fn count_circles(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, Op::Circle { .. }))
            .count()
    }
}

impl DrawContext for RecordingCanvas {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.ops.push(Op::Resize { width, height });
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        self.ops.push(Op::Clear {
            x,
            y,
            width,
            height,
        });
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, line_width: f64) {
        self.ops.push(Op::Line {
            from,
            to,
            paint,
            width: line_width,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: Paint) {
        self.ops.push(Op::Circle {
            center,
            radius,
            paint,
        });
    }
}

/// A [`Host`] whose environment is set by hand.
///
/// Frames are only delivered when the caller takes them with
/// [`ManualHost::take_frame`]. Drawing goes to a [`RecordingCanvas`] unless
/// another canvas is swapped in with [`ManualHost::with_canvas`].
#[derive(Debug, Clone)]
pub struct ManualHost<C = RecordingCanvas> {
    pub size: Option<(f64, f64)>,
    pub dpr: f64,
    pub reduced_motion: bool,
    /// When false, [`Host::request_frame`] reports no scheduler.
    pub can_schedule: bool,
    pub canvas: C,
    pending: BTreeSet<u64>,
    listeners: BTreeSet<u64>,
    next_id: u64,
    /// Number of cancel calls received, including for unknown handles.
    pub cancellations: usize,
}

impl ManualHost {
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            size: Some((width, height)),
            dpr: 1.0,
            reduced_motion: false,
            can_schedule: true,
            canvas: RecordingCanvas::default(),
            pending: BTreeSet::new(),
            listeners: BTreeSet::new(),
            next_id: 1,
            cancellations: 0,
        }
    }
}

impl<C> ManualHost<C> {
    /// Draw onto `canvas` instead.
    pub fn with_canvas<D: DrawContext>(self, canvas: D) -> ManualHost<D> {
        ManualHost {
            size: self.size,
            dpr: self.dpr,
            reduced_motion: self.reduced_motion,
            can_schedule: self.can_schedule,
            canvas,
            pending: self.pending,
            listeners: self.listeners,
            next_id: self.next_id,
            cancellations: self.cancellations,
        }
    }

    pub fn with_dpr(mut self, dpr: f64) -> Self {
        self.dpr = dpr;
        self
    }

    pub fn with_reduced_motion(mut self) -> Self {
        self.reduced_motion = true;
        self
    }

    pub fn without_scheduler(mut self) -> Self {
        self.can_schedule = false;
        self
    }

    /// Pop the oldest pending frame, as the display would deliver it.
    pub fn take_frame(&mut self) -> Option<FrameHandle> {
        self.pending.pop_first().map(FrameHandle)
    }

    pub fn pending_frames(&self) -> usize {
        self.pending.len()
    }

    pub fn resize_listeners(&self) -> usize {
        self.listeners.len()
    }

    fn next(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

impl<C: DrawContext> Host for ManualHost<C> {
    type Canvas = C;

    fn container_size(&self) -> Option<(f64, f64)> {
        self.size
    }

    fn device_pixel_ratio(&self) -> f64 {
        self.dpr
    }

    fn prefers_reduced_motion(&self) -> bool {
        self.reduced_motion
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        if !self.can_schedule {
            return None;
        }
        let id = self.next();
        self.pending.insert(id);
        Some(FrameHandle(id))
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        self.cancellations += 1;
        self.pending.remove(&handle.0);
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        let id = self.next();
        self.listeners.insert(id);
        ListenerId(id)
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id.0);
    }

    fn canvas(&mut self) -> &mut C {
        &mut self.canvas
    }
}
