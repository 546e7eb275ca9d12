//! Theme selection and the palette each theme maps to.

use serde::{Deserialize, Serialize};

use crate::color::Rgb;

/// Visual theme of the background.
///
/// Parsing is total: `"dark"` selects [`Theme::Dark`] and every other name
/// selects [`Theme::Light`]. An omitted theme defaults to dark.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Theme {
    /// Neon dots on a near-black page.
    #[default]
    Dark,
    /// Pastel dots on a pale page.
    Light,
}

impl Theme {
    /// Resolve a theme name. Anything other than `"dark"` is light.
    pub fn from_name(name: &str) -> Self {
        if name == "dark" {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    /// Canonical name of the theme.
    pub fn name(self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Switch to the other theme.
    pub fn toggle(self) -> Self {
        match self {
            Theme::Dark => Theme::Light,
            Theme::Light => Theme::Dark,
        }
    }

    /// The palette for this theme.
    pub fn palette(self) -> Palette {
        match self {
            Theme::Dark => Palette::DARK,
            Theme::Light => Palette::LIGHT,
        }
    }
}

impl From<String> for Theme {
    fn from(name: String) -> Self {
        Theme::from_name(&name)
    }
}

impl From<Theme> for String {
    fn from(theme: Theme) -> Self {
        theme.name().to_string()
    }
}

impl std::fmt::Display for Theme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Half-open range `[min, max)` that particle radii are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RadiusRange {
    pub min: f64,
    pub max: f64,
}

impl RadiusRange {
    /// Map a unit sample in `[0, 1)` onto the range.
    pub fn lerp(self, t: f64) -> f64 {
        self.min + t * (self.max - self.min)
    }
}

/// Colors and opacities used to draw the constellation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    /// Page color underneath the canvas. Never painted; only used to
    /// approximate alpha on hosts without real transparency.
    pub background: Rgb,
    /// Primary dot color, also used for lines.
    pub dot: Rgb,
    /// Alternate dot color for the occasional accent particle.
    pub dot_alt: Rgb,
    /// Fill opacity of every dot.
    pub dot_alpha: f32,
    /// Opacity of a line between two coincident particles.
    pub line_alpha: f32,
    /// Particle radius range in logical pixels.
    pub radius: RadiusRange,
}

impl Palette {
    /// Cyan and mint on charcoal.
    pub const DARK: Palette = Palette {
        background: Rgb::new(0x14, 0x14, 0x1a),
        dot: Rgb::new(0x16, 0xe6, 0xf5),
        dot_alt: Rgb::new(0x5d, 0xf6, 0xb0),
        dot_alpha: 0.4,
        line_alpha: 0.2,
        radius: RadiusRange { min: 1.1, max: 2.7 },
    };

    /// Lavender on lilac. Larger dots and stronger lines keep the pale
    /// field visible.
    pub const LIGHT: Palette = Palette {
        background: Rgb::new(0xf3, 0xe9, 0xf9),
        dot: Rgb::new(0x9a, 0x7a, 0xd1),
        dot_alt: Rgb::new(0xbf, 0xa8, 0xee),
        dot_alpha: 0.34,
        line_alpha: 0.32,
        radius: RadiusRange { min: 2.8, max: 6.8 },
    };

    /// Fill color for a particle.
    pub fn dot_color(&self, alternate: bool) -> Rgb {
        if alternate { self.dot_alt } else { self.dot }
    }
}
