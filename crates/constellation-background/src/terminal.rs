//! Rasterizing the constellation onto a terminal.
//!
//! The canvas keeps a display list in physical backing-buffer pixels and
//! renders it through ratatui's Braille canvas, which maps the backing
//! buffer onto whatever cell area it is given. Terminals have no alpha, so
//! translucent paint is pre-blended toward a backdrop color; the cells'
//! own background is never touched.

use constellation_core::Rgb;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    symbols::Marker,
    widgets::{
        Widget,
        canvas::{Canvas, Circle, Line, Points},
    },
};

use crate::host::{DrawContext, Paint, Point};
use crate::surface::Transform;

/// A shape in physical pixel coordinates, ready to rasterize.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Shape {
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Rgb,
    },
    Dot {
        x: f64,
        y: f64,
        radius: f64,
        color: Rgb,
    },
}

impl Shape {
    /// Bounding box as `(left, top, right, bottom)`.
    fn bounds(&self) -> (f64, f64, f64, f64) {
        match *self {
            Shape::Line { x1, y1, x2, y2, .. } => (x1.min(x2), y1.min(y2), x1.max(x2), y1.max(y2)),
            Shape::Dot { x, y, radius, .. } => (x - radius, y - radius, x + radius, y + radius),
        }
    }

    fn overlaps(&self, left: f64, top: f64, right: f64, bottom: f64) -> bool {
        let (l, t, r, b) = self.bounds();
        l <= right && r >= left && t <= bottom && b >= top
    }
}

/// A [`DrawContext`] backed by a display list and drawn as a ratatui widget.
#[derive(Debug, Clone)]
pub struct TerminalCanvas {
    /// Color translucent paint is blended toward.
    backdrop: Rgb,
    /// Physical backing buffer size.
    backing: (u32, u32),
    /// Displayed size in logical pixels.
    display: (f64, f64),
    transform: Transform,
    shapes: Vec<Shape>,
}

impl TerminalCanvas {
    /// Create an empty canvas that blends toward `backdrop`.
    pub fn new(backdrop: Rgb) -> Self {
        Self {
            backdrop,
            backing: (0, 0),
            display: (0.0, 0.0),
            transform: Transform::IDENTITY,
            shapes: Vec::new(),
        }
    }

    pub fn backdrop(&self) -> Rgb {
        self.backdrop
    }

    pub fn backing_size(&self) -> (u32, u32) {
        self.backing
    }

    pub fn display_size(&self) -> (f64, f64) {
        self.display
    }

    pub fn transform(&self) -> Transform {
        self.transform
    }

    /// Shapes currently on the canvas, in drawing order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    fn blend(&self, paint: Paint) -> Option<Rgb> {
        (paint.alpha > 0.0).then(|| paint.color.over(self.backdrop, paint.alpha))
    }

    /// Add a shape unless it lies entirely off the backing buffer.
    fn push(&mut self, shape: Shape) {
        let (bw, bh) = self.backing;
        if shape.overlaps(0.0, 0.0, f64::from(bw), f64::from(bh)) {
            self.shapes.push(shape);
        }
    }
}

impl DrawContext for TerminalCanvas {
    fn resize_backing(&mut self, width: u32, height: u32) {
        self.backing = (width, height);
        self.shapes.clear();
    }

    fn set_display_size(&mut self, width: f64, height: f64) {
        self.display = (width, height);
    }

    fn set_transform(&mut self, transform: Transform) {
        self.transform = transform;
    }

    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let a = self.transform.apply(Point::new(x, y));
        let b = self.transform.apply(Point::new(x + width, y + height));
        let (left, right) = (a.x.min(b.x), a.x.max(b.x));
        let (top, bottom) = (a.y.min(b.y), a.y.max(b.y));
        let (bw, bh) = self.backing;
        if left <= 0.0 && top <= 0.0 && right >= f64::from(bw) && bottom >= f64::from(bh) {
            self.shapes.clear();
            return;
        }
        // Anything touching the cleared pixels is gone, even if it was
        // centred outside them.
        self.shapes
            .retain(|shape| !shape.overlaps(left, top, right, bottom));
    }

    fn stroke_line(&mut self, from: Point, to: Point, paint: Paint, _line_width: f64) {
        // Braille dots are the thinnest stroke a terminal has.
        let Some(color) = self.blend(paint) else {
            return;
        };
        let from = self.transform.apply(from);
        let to = self.transform.apply(to);
        self.push(Shape::Line {
            x1: from.x,
            y1: from.y,
            x2: to.x,
            y2: to.y,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, paint: Paint) {
        let Some(color) = self.blend(paint) else {
            return;
        };
        let center = self.transform.apply(center);
        self.push(Shape::Dot {
            x: center.x,
            y: center.y,
            radius: radius * self.transform.length_scale(),
            color,
        });
    }
}

impl Widget for &TerminalCanvas {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let (bw, bh) = self.backing;
        if bw == 0 || bh == 0 || area.is_empty() {
            return;
        }
        let height = f64::from(bh);
        // Physical pixels covered by one Braille dot, 2x4 dots per cell.
        let dot_size = (f64::from(bw) / (f64::from(area.width) * 2.0))
            .max(height / (f64::from(area.height) * 4.0));

        Canvas::default()
            .marker(Marker::Braille)
            .x_bounds([0.0, f64::from(bw)])
            .y_bounds([0.0, height])
            .paint(|ctx| {
                // Canvas y grows upward; the backing buffer's grows downward.
                for shape in &self.shapes {
                    match *shape {
                        Shape::Line {
                            x1,
                            y1,
                            x2,
                            y2,
                            color,
                        } => ctx.draw(&Line::new(x1, height - y1, x2, height - y2, color.into())),
                        Shape::Dot {
                            x,
                            y,
                            radius,
                            color,
                        } => {
                            ctx.draw(&Circle {
                                x,
                                y: height - y,
                                radius,
                                color: color.into(),
                            });
                            if radius < dot_size {
                                ctx.draw(&Points {
                                    coords: &[(x, height - y)],
                                    color: color.into(),
                                });
                            }
                        }
                    }
                }
            })
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use constellation_core::Palette;

    fn paint(alpha: f32) -> Paint {
        Paint {
            color: Rgb::new(255, 255, 255),
            alpha,
        }
    }

    #[test]
    fn test_shapes_use_physical_pixels() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(200, 100);
        canvas.set_transform(Transform::scale(2.0));
        canvas.fill_circle(Point::new(10.0, 20.0), 3.0, paint(1.0));
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(5.0, 5.0), paint(1.0), 0.6);
        assert_eq!(
            canvas.shapes(),
            &[
                Shape::Dot {
                    x: 20.0,
                    y: 40.0,
                    radius: 6.0,
                    color: Rgb::new(255, 255, 255)
                },
                Shape::Line {
                    x1: 0.0,
                    y1: 0.0,
                    x2: 10.0,
                    y2: 10.0,
                    color: Rgb::new(255, 255, 255)
                },
            ]
        );
    }

    #[test]
    fn test_alpha_blends_toward_backdrop() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(10, 10);
        canvas.fill_circle(Point::new(1.0, 1.0), 1.0, paint(0.5));
        match canvas.shapes()[0] {
            Shape::Dot { color, .. } => assert_eq!(color, Rgb::new(128, 128, 128)),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_transparent_paint_is_skipped() {
        let mut canvas = TerminalCanvas::new(Palette::DARK.background);
        canvas.stroke_line(Point::new(0.0, 0.0), Point::new(1.0, 1.0), paint(0.0), 0.6);
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_clear_rect_in_user_space() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(400, 400);
        canvas.set_transform(Transform::scale(2.0));
        canvas.fill_circle(Point::new(10.0, 10.0), 1.0, paint(1.0));
        canvas.fill_circle(Point::new(150.0, 150.0), 1.0, paint(1.0));
        canvas.clear_rect(0.0, 0.0, 100.0, 100.0);
        assert_eq!(canvas.shapes().len(), 1);
        canvas.clear_rect(0.0, 0.0, 200.0, 200.0);
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_clear_removes_dot_centred_in_margin() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(100, 100);
        canvas.fill_circle(Point::new(-5.0, 20.0), 6.0, paint(1.0));
        canvas.fill_circle(Point::new(80.0, 20.0), 1.0, paint(1.0));
        canvas.clear_rect(0.0, 0.0, 50.0, 100.0);
        assert_eq!(canvas.shapes().len(), 1);
        assert!(matches!(canvas.shapes()[0], Shape::Dot { x, .. } if x == 80.0));
    }

    #[test]
    fn test_clear_removes_line_crossing_into_rect() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(100, 100);
        canvas.stroke_line(Point::new(-8.0, 10.0), Point::new(30.0, 10.0), paint(1.0), 0.6);
        canvas.clear_rect(0.0, 0.0, 20.0, 20.0);
        assert!(canvas.shapes().is_empty());
    }

    #[test]
    fn test_repeated_frames_with_margin_dot_stay_bounded() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(100, 100);
        for _ in 0..1000 {
            canvas.clear_rect(0.0, 0.0, 100.0, 100.0);
            canvas.fill_circle(Point::new(-5.0, 50.0), 6.0, paint(1.0));
            canvas.fill_circle(Point::new(50.0, 50.0), 6.0, paint(1.0));
        }
        assert_eq!(canvas.shapes().len(), 2);
    }

    #[test]
    fn test_shapes_off_the_backing_are_dropped() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(100, 100);
        canvas.fill_circle(Point::new(-9.0, 50.0), 1.0, paint(1.0));
        canvas.fill_circle(Point::new(50.0, 108.0), 2.0, paint(1.0));
        canvas.stroke_line(Point::new(-10.0, -10.0), Point::new(-2.0, 40.0), paint(1.0), 0.6);
        assert!(canvas.shapes().is_empty());

        // Partly visible shapes are kept.
        canvas.fill_circle(Point::new(-1.0, 50.0), 2.0, paint(1.0));
        assert_eq!(canvas.shapes().len(), 1);
    }

    #[test]
    fn test_resize_discards_contents() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(10, 10);
        canvas.fill_circle(Point::new(1.0, 1.0), 1.0, paint(1.0));
        assert_eq!(canvas.shapes().len(), 1);
        canvas.resize_backing(20, 20);
        assert!(canvas.shapes().is_empty());
        assert_eq!(canvas.backing_size(), (20, 20));
    }

    #[test]
    fn test_render_leaves_cell_background_alone() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(80, 80);
        canvas.fill_circle(Point::new(40.0, 40.0), 4.0, paint(1.0));
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);

        let painted = buf
            .content()
            .iter()
            .filter(|cell| cell.symbol() != " ")
            .count();
        assert!(painted > 0);
        assert!(
            buf.content()
                .iter()
                .all(|cell| cell.bg == ratatui::style::Color::Reset)
        );
    }

    #[test]
    fn test_large_dot_has_no_centre_pixel() {
        let mut canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        canvas.resize_backing(80, 80);
        canvas.fill_circle(Point::new(40.0, 40.0), 30.0, paint(1.0));
        let area = Rect::new(0, 0, 10, 5);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);

        assert!(buf.content().iter().any(|cell| cell.symbol() != " "));
        assert_eq!(buf[(4, 2)].symbol(), " ");
    }

    #[test]
    fn test_render_empty_backing_is_noop() {
        let canvas = TerminalCanvas::new(Rgb::new(0, 0, 0));
        let area = Rect::new(0, 0, 4, 2);
        let mut buf = Buffer::empty(area);
        (&canvas).render(area, &mut buf);
        assert!(buf.content().iter().all(|cell| cell.symbol() == " "));
    }
}
