//! Animated constellation background.
//!
//! A field of slowly drifting dots, joined by faint lines whenever two of
//! them come close, drawn onto a host-provided surface. The renderer owns
//! its particles and its frame loop; everything it needs from the outside
//! world (container size, pixel density, reduced-motion preference, frame
//! scheduling, resize notifications, a drawing context) comes through the
//! [`Host`] and [`DrawContext`] traits.
//!
//! [`TerminalCanvas`] is a [`DrawContext`] that rasterizes onto a ratatui
//! Braille canvas. The `testing` feature adds a headless host and a
//! recording canvas in the `testing` module.

mod constellation;
mod host;
mod particle;
mod state;
mod surface;
mod terminal;
#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use constellation::{LINE_WIDTH, line_fade, max_connection_distance};
pub use host::{DrawContext, FrameHandle, Host, ListenerId, Paint, Point};
pub use particle::{MAX_PARTICLES, MIN_PARTICLES, Particle, WRAP_MARGIN, particle_count};
pub use state::{ConstellationBackground, LoopState, MountOptions};
pub use surface::{Surface, Transform};
pub use terminal::{Shape, TerminalCanvas};
