//! Logical drawing area and its device-pixel-ratio mapping.

use crate::host::{DrawContext, Point};

/// A 2D affine transform in canvas `setTransform(a, b, c, d, e, f)` order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub d: f64,
    pub e: f64,
    pub f: f64,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// Uniform scale about the origin.
    pub const fn scale(factor: f64) -> Self {
        Transform {
            a: factor,
            b: 0.0,
            c: 0.0,
            d: factor,
            e: 0.0,
            f: 0.0,
        }
    }

    /// Map a point through the transform.
    pub fn apply(&self, p: Point) -> Point {
        Point::new(
            self.a * p.x + self.c * p.y + self.e,
            self.b * p.x + self.d * p.y + self.f,
        )
    }

    /// Scale factor applied to lengths, assuming no shear.
    pub fn length_scale(&self) -> f64 {
        (self.a.abs() * self.d.abs()).sqrt()
    }
}

/// The drawing area: logical size plus device pixel ratio.
///
/// The transform is always `scale(dpr)`, so one logical unit covers `dpr`
/// physical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    width: f64,
    height: f64,
    dpr: f64,
}

impl Surface {
    /// Build a surface from a raw measurement and reported pixel ratio.
    ///
    /// Missing, negative or non-finite sizes become zero. The ratio is
    /// clamped to at least 1.
    pub fn new(size: Option<(f64, f64)>, reported_dpr: f64) -> Self {
        let (width, height) = size.unwrap_or((0.0, 0.0));
        Self {
            width: sanitize_extent(width),
            height: sanitize_extent(height),
            dpr: effective_dpr(reported_dpr),
        }
    }

    /// Logical width in CSS pixels.
    pub fn width(&self) -> f64 {
        self.width
    }

    /// Logical height in CSS pixels.
    pub fn height(&self) -> f64 {
        self.height
    }

    /// Device pixel ratio in use.
    pub fn dpr(&self) -> f64 {
        self.dpr
    }

    /// Logical area in square pixels.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// Physical backing buffer size.
    pub fn backing_size(&self) -> (u32, u32) {
        (
            (self.width * self.dpr).floor() as u32,
            (self.height * self.dpr).floor() as u32,
        )
    }

    /// The logical-to-physical transform.
    pub fn transform(&self) -> Transform {
        Transform::scale(self.dpr)
    }

    /// Adopt a new measurement, keeping the pixel ratio.
    pub fn remeasure(&mut self, size: Option<(f64, f64)>) {
        let (width, height) = size.unwrap_or((0.0, 0.0));
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
    }

    /// Size the backing buffer and install the transform on `ctx`.
    pub fn apply<C: DrawContext + ?Sized>(&self, ctx: &mut C) {
        let (bw, bh) = self.backing_size();
        ctx.resize_backing(bw, bh);
        ctx.set_display_size(self.width, self.height);
        ctx.set_transform(self.transform());
    }
}

fn sanitize_extent(v: f64) -> f64 {
    if v.is_finite() && v > 0.0 { v } else { 0.0 }
}

fn effective_dpr(reported: f64) -> f64 {
    if reported.is_finite() {
        reported.max(1.0)
    } else {
        1.0
    }
}
