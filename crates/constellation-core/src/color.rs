//! Plain RGB colors with alpha blending.

use ratatui::style::Color;

/// An opaque 24-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    /// Create a color from its channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse a `#rrggbb` hex string.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Composite this color at `alpha` over `backdrop`.
    ///
    /// Alpha is clamped to `[0, 1]`; `0.0` yields the backdrop unchanged.
    pub fn over(self, backdrop: Rgb, alpha: f32) -> Rgb {
        let a = if alpha.is_nan() { 0.0 } else { alpha.clamp(0.0, 1.0) };
        let mix = |fg: u8, bg: u8| (bg as f32 + (fg as f32 - bg as f32) * a).round() as u8;
        Rgb::new(
            mix(self.r, backdrop.r),
            mix(self.g, backdrop.g),
            mix(self.b, backdrop.b),
        )
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Rgb(rgb.r, rgb.g, rgb.b)
    }
}

impl std::fmt::Display for Rgb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex() {
        assert_eq!(Rgb::from_hex("#16e6f5"), Some(Rgb::new(0x16, 0xe6, 0xf5)));
        assert_eq!(Rgb::from_hex("9a7ad1"), Some(Rgb::new(0x9a, 0x7a, 0xd1)));
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
    }

    #[test]
    fn test_display_roundtrips_hex() {
        let c = Rgb::new(0x5d, 0xf6, 0xb0);
        assert_eq!(c.to_string(), "#5df6b0");
    }

    #[test]
    fn test_over_extremes() {
        let fg = Rgb::new(200, 100, 0);
        let bg = Rgb::new(0, 0, 0);
        assert_eq!(fg.over(bg, 0.0), bg);
        assert_eq!(fg.over(bg, 1.0), fg);
        assert_eq!(fg.over(bg, 0.5), Rgb::new(100, 50, 0));
        assert_eq!(fg.over(bg, 7.0), fg);
        assert_eq!(fg.over(bg, f32::NAN), bg);
    }

    #[test]
    fn test_into_ratatui_color() {
        let color: Color = Rgb::new(1, 2, 3).into();
        assert_eq!(color, Color::Rgb(1, 2, 3));
    }
}
