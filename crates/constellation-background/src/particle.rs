//! Particle state, population sizing and motion.

use constellation_core::Palette;
use rand::Rng;

/// Viewport area covered by one particle, in square logical pixels.
const AREA_PER_PARTICLE: f64 = 60_000.0;

/// Fewest particles in a non-empty viewport.
pub const MIN_PARTICLES: usize = 18;

/// Most particles in any viewport.
pub const MAX_PARTICLES: usize = 180;

/// Width of the initial velocity distribution, centered on zero.
const VELOCITY_SPREAD: f64 = 0.2;

/// Width of the per-frame random walk added on each axis.
const JITTER_SPREAD: f64 = 0.15;

/// Unit samples above this pick the alternate color.
const ALTERNATE_THRESHOLD: f64 = 0.86;

/// How far past an edge a particle may drift before wrapping.
pub const WRAP_MARGIN: f64 = 10.0;

/// A single drifting dot.
#[derive(Debug, Clone, PartialEq)]
pub struct Particle {
    /// Horizontal position in logical pixels.
    pub x: f64,
    /// Vertical position in logical pixels.
    pub y: f64,
    /// Horizontal drift per frame.
    pub vx: f64,
    /// Vertical drift per frame.
    pub vy: f64,
    /// Radius in logical pixels.
    pub r: f64,
    /// Draw with the palette's alternate color.
    pub alternate: bool,
}

/// Number of particles for a viewport.
///
/// Zero for an empty viewport, otherwise one per 60 000 px², rounded and
/// clamped to `[18, 180]`.
pub fn particle_count(width: f64, height: f64) -> usize {
    let area = width * height;
    if !area.is_finite() || area <= 0.0 {
        return 0;
    }
    let base = (area / AREA_PER_PARTICLE).round() as usize;
    base.clamp(MIN_PARTICLES, MAX_PARTICLES)
}

fn unit<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    rng.gen_range(0.0..1.0)
}

/// Generate the particle population for a viewport.
pub(crate) fn spawn<R: Rng + ?Sized>(
    rng: &mut R,
    width: f64,
    height: f64,
    palette: &Palette,
) -> Vec<Particle> {
    let count = particle_count(width, height);
    (0..count)
        .map(|_| Particle {
            x: unit(rng) * width,
            y: unit(rng) * height,
            vx: (unit(rng) - 0.5) * VELOCITY_SPREAD,
            vy: (unit(rng) - 0.5) * VELOCITY_SPREAD,
            r: palette.radius.lerp(unit(rng)),
            alternate: unit(rng) > ALTERNATE_THRESHOLD,
        })
        .collect()
}

/// Advance every particle by one frame and wrap it around the viewport.
pub(crate) fn advance<R: Rng + ?Sized>(
    particles: &mut [Particle],
    rng: &mut R,
    width: f64,
    height: f64,
) {
    for p in particles {
        p.x += p.vx + (unit(rng) - 0.5) * JITTER_SPREAD;
        p.y += p.vy + (unit(rng) - 0.5) * JITTER_SPREAD;
        p.x = wrap(p.x, width);
        p.y = wrap(p.y, height);
    }
}

/// Toroidal wrap with a margin on both sides.
fn wrap(v: f64, bound: f64) -> f64 {
    let mut v = v;
    if v < -WRAP_MARGIN {
        v = bound + WRAP_MARGIN;
    }
    if v > bound + WRAP_MARGIN {
        v = -WRAP_MARGIN;
    }
    v
}
