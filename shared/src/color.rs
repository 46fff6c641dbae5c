use std::fmt;

use serde::{Deserialize, Serialize};

/// An HSL color with an alpha channel.
///
/// Hue is in degrees and always wrapped into `0..360`, saturation and lightness are percentages.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
    pub alpha: f64,
}

impl Color {
    /// Pure white, used for the hot core of default particles.
    pub const WHITE: Color = Color {
        hue: 0.0,
        saturation: 0.0,
        lightness: 100.0,
        alpha: 1.0,
    };

    /// Fully transparent black, the outer stop of every glow.
    pub const TRANSPARENT: Color = Color {
        hue: 0.0,
        saturation: 0.0,
        lightness: 0.0,
        alpha: 0.0,
    };

    /// Black, used to clear the frame.
    pub const BLACK: Color = Color {
        hue: 0.0,
        saturation: 0.0,
        lightness: 0.0,
        alpha: 1.0,
    };

    /// Instantiates an opaque [`Color`] from HSL components.
    pub fn hsl(hue: f64, saturation: f64, lightness: f64) -> Color {
        Color {
            hue: hue.rem_euclid(360.0),
            saturation: saturation.clamp(0.0, 100.0),
            lightness: lightness.clamp(0.0, 100.0),
            alpha: 1.0,
        }
    }

    /// The same color with a different alpha.
    pub fn with_alpha(&self, alpha: f64) -> Color {
        Color {
            alpha: alpha.clamp(0.0, 1.0),
            ..*self
        }
    }

    /// Converts into 8-bit RGB channels plus the untouched alpha.
    pub fn to_rgba(&self) -> (u8, u8, u8, f64) {
        let h = self.hue.rem_euclid(360.0);
        let s = self.saturation / 100.0;
        let l = self.lightness / 100.0;

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match (h / 60.0) as u8 {
            0 => (c, x, 0.0),
            1 => (x, c, 0.0),
            2 => (0.0, c, x),
            3 => (0.0, x, c),
            4 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        let channel = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;

        (channel(r), channel(g), channel(b), self.alpha)
    }

    /// CSS `rgba(...)` form, safe to hand to gradient color stops.
    pub fn css(&self) -> String {
        self.to_string()
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (r, g, b, a) = self.to_rgba();
        write!(f, "rgba({r}, {g}, {b}, {a})")
    }
}
