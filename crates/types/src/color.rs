//! sRGB colors, their canonical hex form, and the HSL working space.
//!
//! Every color that enters the system goes through [`Color::parse_hex`] (or is
//! built from channels directly), so the only textual form that is ever stored
//! or compared is the canonical uppercase `#RRGGBB`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Luma threshold above which a background counts as "light".
const LIGHT_LUMA_THRESHOLD: f64 = 160.0;

/// Text color used on top of light backgrounds.
pub const DARK_TEXT: Color = Color::new(0x11, 0x11, 0x11);

/// Text color used on top of dark backgrounds.
pub const LIGHT_TEXT: Color = Color::new(0xFF, 0xFF, 0xFF);

/// Mid gray, the seed color when nothing else is known.
pub const DEFAULT_BASE_COLOR: Color = Color::new(0x80, 0x80, 0x80);

/// Errors produced when parsing hex color text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColorParseError {
    /// Input was empty after trimming and removing the `#` prefix.
    #[error("empty color input")]
    Empty,
    /// Input had a digit count other than 3 or 6.
    #[error("expected 3 or 6 hex digits, found {0}")]
    Length(usize),
    /// Input contained a character outside `[0-9a-fA-F]`.
    #[error("invalid hex digit '{0}'")]
    Digit(char),
}

/// An sRGB color with 8-bit channels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build a color from the low 24 bits of `value` (`0xRRGGBB`).
    pub const fn from_u24(value: u32) -> Self {
        Self {
            r: ((value >> 16) & 0xFF) as u8,
            g: ((value >> 8) & 0xFF) as u8,
            b: (value & 0xFF) as u8,
        }
    }

    /// Parse `#RGB`, `#RRGGBB`, `RGB` or `RRGGBB` (any case, surrounding
    /// whitespace ignored). Short forms expand by digit duplication.
    pub fn parse_hex(input: &str) -> Result<Self, ColorParseError> {
        let trimmed = input.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(ColorParseError::Digit(bad));
        }

        let nibbles: Vec<u8> = digits
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();
        match nibbles.as_slice() {
            [r, g, b] => Ok(Self::new(r * 17, g * 17, b * 17)),
            [r1, r0, g1, g0, b1, b0] => Ok(Self::new(r1 * 16 + r0, g1 * 16 + g0, b1 * 16 + b0)),
            other => Err(ColorParseError::Length(other.len())),
        }
    }

    /// Canonical `#RRGGBB` form.
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_u24(&self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    /// Weighted luma on the 0..=255 scale.
    pub fn luma(&self) -> f64 {
        f64::from(self.r) * 0.299 + f64::from(self.g) * 0.587 + f64::from(self.b) * 0.114
    }

    pub fn is_light(&self) -> bool {
        self.luma() > LIGHT_LUMA_THRESHOLD
    }

    /// Text color that stays readable on top of this color.
    pub fn text_color(&self) -> Color {
        if self.is_light() { DARK_TEXT } else { LIGHT_TEXT }
    }

    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        // Grays have no hue; report 0 rather than NaN.
        if max == min {
            return Hsl::new(0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 { d / (2.0 - max - min) } else { d / (max + min) };
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Hsl::new(h / 6.0 * 360.0, s * 100.0, l * 100.0)
    }
}

impl Default for Color {
    fn default() -> Self {
        DEFAULT_BASE_COLOR
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_hex(s)
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_hex(&value)
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

/// A color in HSL space: hue in degrees `[0, 360)`, saturation and lightness
/// in percent `[0, 100]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    /// Build a triple, wrapping the hue and clamping saturation/lightness.
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self {
            h: wrap_hue(h),
            s: clamp_percent(s),
            l: clamp_percent(l),
        }
    }

    pub fn to_color(&self) -> Color {
        let h = wrap_hue(self.h) / 360.0;
        let s = clamp_percent(self.s) / 100.0;
        let l = clamp_percent(self.l) / 100.0;

        let (r, g, b) = if s == 0.0 {
            (l, l, l)
        } else {
            let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
            let p = 2.0 * l - q;
            (
                hue_to_channel(p, q, h + 1.0 / 3.0),
                hue_to_channel(p, q, h),
                hue_to_channel(p, q, h - 1.0 / 3.0),
            )
        };

        Color::new(to_channel(r), to_channel(g), to_channel(b))
    }
}

fn hue_to_channel(p: f64, q: f64, t: f64) -> f64 {
    let t = if t < 0.0 {
        t + 1.0
    } else if t > 1.0 {
        t - 1.0
    } else {
        t
    };
    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 0.5 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn to_channel(unit: f64) -> u8 {
    (unit * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Wrap any hue, negative or past a full turn, into `[0, 360)`.
/// Non-finite input maps to 0.
pub fn wrap_hue(h: f64) -> f64 {
    if !h.is_finite() {
        return 0.0;
    }
    (h % 360.0 + 360.0) % 360.0
}

/// Clamp `value` into `[min, max]`, mapping NaN to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() { min } else { value.clamp(min, max) }
}

fn clamp_percent(value: f64) -> f64 {
    clamp(value, 0.0, 100.0)
}
