use palette::IntoColor;
use std::{fmt, str::FromStr};
use thiserror::Error;

/// An opaque 8-bit sRGB color.
///
/// The derived ordering compares `r`, then `g`, then `b`. It only exists so colors can be used as map and set keys and
/// says nothing about how the colors relate perceptually.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

/// A color in hue/saturation/lightness form. Hue is in degrees in `[0, 360)`, saturation and lightness in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub hue: f32,
    pub saturation: f32,
    pub lightness: f32,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseRgbError {
    #[error("expected 6 hex digits, got {0}")]
    InvalidLength(usize),
    #[error("invalid hex digit in {0:?}")]
    InvalidDigit(String),
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Saturation and lightness come straight from the channel extremes in single precision. Only the hue goes
    /// through `palette`.
    pub fn hsl(self) -> Hsl {
        let raw = palette::Srgb::new(self.r, self.g, self.b);
        let raw_float: palette::Srgb<f32> = raw.into_format();
        let palette_hsl: palette::Hsl = raw_float.into_color();
        let hue = palette_hsl.hue;

        let (r, g, b) = (self.r as f32 / 255.0, self.g as f32 / 255.0, self.b as f32 / 255.0);
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let lightness = (max + min) / 2.0;

        let saturation = if max == min {
            0.0
        } else if lightness > 0.5 {
            (max - min) / (2.0 - max - min)
        } else {
            (max - min) / (max + min)
        };

        Hsl {
            hue: hue.into_positive_degrees(),
            saturation,
            lightness,
        }
    }

    /// Squared straight-line distance between two colors, treating the channels as orthogonal axes.
    ///
    /// Comparing squared distances orders colors the same way as comparing the actual distances, without any rounding.
    pub fn distance_squared(self, other: Rgb) -> u32 {
        let dr = self.r.abs_diff(other.r) as u32;
        let dg = self.g.abs_diff(other.g) as u32;
        let db = self.b.abs_diff(other.b) as u32;

        dr * dr + dg * dg + db * db
    }

    pub fn distance(self, other: Rgb) -> f32 {
        (self.distance_squared(other) as f32).sqrt()
    }
}

impl From<(u8, u8, u8)> for Rgb {
    fn from((r, g, b): (u8, u8, u8)) -> Self {
        Self::new(r, g, b)
    }
}

impl From<Rgb> for (u8, u8, u8) {
    fn from(rgb: Rgb) -> Self {
        (rgb.r, rgb.g, rgb.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Rgb {
    type Err = ParseRgbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix('#').unwrap_or(s);

        if digits.len() != 6 {
            return Err(ParseRgbError::InvalidLength(digits.len()));
        }

        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(ParseRgbError::InvalidDigit(s.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            digits
                .get(range)
                .and_then(|hex| u8::from_str_radix(hex, 16).ok())
                .ok_or_else(|| ParseRgbError::InvalidDigit(s.to_string()))
        };

        Ok(Self::new(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}
