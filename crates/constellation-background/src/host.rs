//! Seams between the renderer and its environment.

use constellation_core::Rgb;

use crate::surface::Transform;

/// A point in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A color with the opacity it should be composited at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    pub color: Rgb,
    pub alpha: f32,
}

/// Token for a scheduled frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameHandle(pub u64);

/// Token for a registered resize listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub u64);

/// A 2D drawing surface with a backing buffer and a current transform.
///
/// Coordinates passed to the drawing calls are in user space and are mapped
/// through the transform set by [`DrawContext::set_transform`].
pub trait DrawContext {
    /// Resize the physical backing buffer. Discards its contents.
    fn resize_backing(&mut self, width: u32, height: u32);

    /// Set the displayed size of the surface in logical pixels.
    fn set_display_size(&mut self, width: f64, height: f64);

    /// Replace the current transform.
    fn set_transform(&mut self, transform: Transform);

    /// Clear a rectangle to full transparency.
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);

    /// Stroke a straight line segment.
    fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, line_width: f64);

    /// Fill a circle.
    fn fill_circle(&mut self, center: Point, radius: f64, paint: Paint);
}

/// Everything the renderer consumes from the environment it is mounted in.
///
/// All queries are read-only; the renderer never mutates host state other
/// than through frame and listener registration.
pub trait Host {
    type Canvas: DrawContext;

    /// Content-box size of the container in logical pixels, if measurable.
    fn container_size(&self) -> Option<(f64, f64)>;

    /// Reported ratio of physical to logical pixels.
    fn device_pixel_ratio(&self) -> f64;

    /// Whether the user asked for reduced motion.
    fn prefers_reduced_motion(&self) -> bool;

    /// Ask for a callback on the next display frame.
    ///
    /// Returns `None` if the host cannot schedule frames.
    fn request_frame(&mut self) -> Option<FrameHandle>;

    /// Cancel a previously requested frame. Unknown handles are ignored.
    fn cancel_frame(&mut self, handle: FrameHandle);

    /// Start delivering resize notifications.
    fn add_resize_listener(&mut self) -> ListenerId;

    /// Stop delivering resize notifications for `id`.
    fn remove_resize_listener(&mut self, id: ListenerId);

    /// The drawing context of the surface element.
    fn canvas(&mut self) -> &mut Self::Canvas;
}

impl<H: Host + ?Sized> Host for &mut H {
    type Canvas = H::Canvas;

    fn container_size(&self) -> Option<(f64, f64)> {
        (**self).container_size()
    }

    fn device_pixel_ratio(&self) -> f64 {
        (**self).device_pixel_ratio()
    }

    fn prefers_reduced_motion(&self) -> bool {
        (**self).prefers_reduced_motion()
    }

    fn request_frame(&mut self) -> Option<FrameHandle> {
        (**self).request_frame()
    }

    fn cancel_frame(&mut self, handle: FrameHandle) {
        (**self).cancel_frame(handle)
    }

    fn add_resize_listener(&mut self) -> ListenerId {
        (**self).add_resize_listener()
    }

    fn remove_resize_listener(&mut self, id: ListenerId) {
        (**self).remove_resize_listener(id)
    }

    fn canvas(&mut self) -> &mut Self::Canvas {
        (**self).canvas()
    }
}
