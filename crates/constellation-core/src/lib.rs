//! Core types shared by the constellation crates.
//!
//! Holds the closed [`Theme`] enumeration and the immutable [`Palette`]
//! record each theme maps to.

mod color;
mod theme;

pub use color::Rgb;
pub use theme::{Palette, RadiusRange, Theme};
