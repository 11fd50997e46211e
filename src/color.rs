// src/color.rs

//! Color values as seen by surfaces, plus named colors for configuration.
//!
//! To the compositor a color is an opaque integer: it only ever compares a
//! source pixel against zero and passes `fg`/`bg` through to the destination.
//! What the bits mean is up to the destination's pixel format.

use serde::{Deserialize, Serialize};

use crate::format::PixelFormat;

/// A raw pixel value. Interpretation depends on the surface's format.
pub type Color = u32;

/// Standard ANSI named colors (indices 0-15).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum NamedColor {
    Black = 0,
    Red = 1,
    Green = 2,
    Yellow = 3,
    Blue = 4,
    Magenta = 5,
    Cyan = 6,
    White = 7,
    BrightBlack = 8,
    BrightRed = 9,
    BrightGreen = 10,
    BrightYellow = 11,
    BrightBlue = 12,
    BrightMagenta = 13,
    BrightCyan = 14,
    BrightWhite = 15,
}

impl NamedColor {
    /// sRGB components of this named color.
    pub fn to_rgb(self) -> (u8, u8, u8) {
        match self {
            NamedColor::Black => (0, 0, 0),
            NamedColor::Red => (205, 0, 0),
            NamedColor::Green => (0, 205, 0),
            NamedColor::Yellow => (205, 205, 0),
            NamedColor::Blue => (0, 0, 238),
            NamedColor::Magenta => (205, 0, 205),
            NamedColor::Cyan => (0, 205, 205),
            NamedColor::White => (229, 229, 229),
            NamedColor::BrightBlack => (127, 127, 127),
            NamedColor::BrightRed => (255, 0, 0),
            NamedColor::BrightGreen => (0, 255, 0),
            NamedColor::BrightYellow => (255, 255, 0),
            NamedColor::BrightBlue => (92, 92, 255),
            NamedColor::BrightMagenta => (255, 0, 255),
            NamedColor::BrightCyan => (0, 255, 255),
            NamedColor::BrightWhite => (255, 255, 255),
        }
    }
}

/// Packs 8-bit components into an RGB565 pixel value.
pub const fn rgb565(r: u8, g: u8, b: u8) -> Color {
    (((r as u32) & 0xf8) << 8) | (((g as u32) & 0xfc) << 3) | ((b as u32) >> 3)
}

/// A color as written in a configuration file: either a raw pixel value or a
/// named color that is resolved against the target format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorSpec {
    Raw(Color),
    Named(NamedColor),
}

impl ColorSpec {
    /// Resolves this color to a pixel value for `format`.
    ///
    /// Raw values are passed through unchanged. Named colors become an RGB565
    /// value on color surfaces and a gray level on grayscale and mono
    /// surfaces (any non-black color is "on" for mono).
    pub fn resolve(self, format: PixelFormat) -> Color {
        let named = match self {
            ColorSpec::Raw(value) => return value,
            ColorSpec::Named(named) => named,
        };
        let (r, g, b) = named.to_rgb();
        match format {
            PixelFormat::Rgb565 => rgb565(r, g, b),
            PixelFormat::MonoVlsb | PixelFormat::MonoHlsb | PixelFormat::MonoHmsb => {
                (named != NamedColor::Black) as Color
            }
            PixelFormat::Gs2Hmsb | PixelFormat::Gs4Hmsb | PixelFormat::Gs8 => {
                // Rec. 601 luma, scaled down to the format's depth.
                let luma = (299 * r as u32 + 587 * g as u32 + 114 * b as u32) / 1000;
                luma >> (8 - format.bits_per_pixel())
            }
        }
    }
}

impl Default for ColorSpec {
    fn default() -> Self {
        ColorSpec::Raw(0)
    }
}

impl From<NamedColor> for ColorSpec {
    fn from(named: NamedColor) -> Self {
        ColorSpec::Named(named)
    }
}
