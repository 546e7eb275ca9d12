//! Drawing the proximity graph and the dots.

use constellation_core::Palette;

use crate::host::{DrawContext, Paint, Point};
use crate::particle::Particle;

/// Stroke width of connecting lines, in logical pixels.
pub const LINE_WIDTH: f64 = 0.6;

/// Share of the longer viewport side within which particles connect.
const LINK_FRACTION: f64 = 0.12;

/// Upper bound on the connection distance, in logical pixels.
const LINK_CAP: f64 = 180.0;

/// Longest distance at which two particles are joined by a line.
pub fn max_connection_distance(width: f64, height: f64) -> f64 {
    (width.max(height) * LINK_FRACTION).min(LINK_CAP)
}

/// Opacity multiplier for a line between two particles.
///
/// Falls linearly from 1 at distance zero to 0 at the cutoff, and is 0
/// beyond it.
pub fn line_fade(dist_sq: f64, max_dist_sq: f64) -> f64 {
    if max_dist_sq <= 0.0 || dist_sq > max_dist_sq {
        return 0.0;
    }
    1.0 - dist_sq / max_dist_sq
}

/// Draw one frame: clear, lines between close pairs, then dots on top.
pub(crate) fn draw<C: DrawContext + ?Sized>(
    ctx: &mut C,
    particles: &[Particle],
    palette: &Palette,
    width: f64,
    height: f64,
    max_dist_sq: f64,
) {
    ctx.clear_rect(0.0, 0.0, width, height);

    for (i, p) in particles.iter().enumerate() {
        for q in &particles[i + 1..] {
            let dx = p.x - q.x;
            let dy = p.y - q.y;
            let dist_sq = dx * dx + dy * dy;
            if dist_sq <= max_dist_sq {
                let fade = line_fade(dist_sq, max_dist_sq);
                ctx.stroke_line(
                    Point::new(p.x, p.y),
                    Point::new(q.x, q.y),
                    Paint {
                        color: palette.dot,
                        alpha: palette.line_alpha * fade as f32,
                    },
                    LINE_WIDTH,
                );
            }
        }
    }

    for p in particles {
        ctx.fill_circle(
            Point::new(p.x, p.y),
            p.r,
            Paint {
                color: palette.dot_color(p.alternate),
                alpha: palette.dot_alpha,
            },
        );
    }
}
